//! Fixed-point helpers and the stableswap invariant solver.
//!
//! Every balance entering the solver is normalized to
//! [`POOL_PRECISION_DECIMALS`]. Intermediate products are carried in
//! 256-bit integers so nothing overflows before a division, and every
//! division truncates. Callers pick the rounding direction that protects the
//! pool around these primitives.
use ethnum::U256;

use crate::helpers::errors::StableSwapError;

/// Decimals every pooled balance is scaled to before entering the solver.
pub const POOL_PRECISION_DECIMALS: u8 = 18;
/// Amplification values are stored and interpolated multiplied by this.
pub const A_PRECISION: u128 = 100;
/// Hard ceiling on Newton iterations for both D and the missing balance.
pub const MAX_ITERATIONS: usize = 255;
/// Fee rates are expressed in parts of this denominator.
pub const FEE_DENOMINATOR: u128 = 10_000_000_000;

// Calculating the constant sum, sum of x_i.
pub fn constant_sum(reserves: &[u128]) -> Result<u128, StableSwapError> {
    reserves.iter().try_fold(0u128, |acc, &x| {
        acc.checked_add(x).ok_or(StableSwapError::MathOverflow)
    })
}

/// `10^(18 - decimals)`, the factor lifting a raw balance to pool precision.
pub fn precision_multiplier(decimals: u8) -> Result<u128, StableSwapError> {
    if decimals > POOL_PRECISION_DECIMALS {
        return Err(StableSwapError::InvalidDecimals);
    }
    10u128
        .checked_pow((POOL_PRECISION_DECIMALS - decimals) as u32)
        .ok_or(StableSwapError::MathOverflow)
}

#[inline(always)]
pub fn normalize(raw: u128, multiplier: u128) -> Result<u128, StableSwapError> {
    raw.checked_mul(multiplier).ok_or(StableSwapError::MathOverflow)
}

/// Back to native units, rounding down. Used for every amount paid out.
#[inline(always)]
pub fn denormalize(scaled: u128, multiplier: u128) -> Result<u128, StableSwapError> {
    scaled.checked_div(multiplier).ok_or(StableSwapError::MathOverflow)
}

/// Back to native units, rounding up. Used for amounts the caller owes.
pub fn denormalize_up(scaled: u128, multiplier: u128) -> Result<u128, StableSwapError> {
    let floor = denormalize(scaled, multiplier)?;
    if floor.checked_mul(multiplier).ok_or(StableSwapError::MathOverflow)? == scaled {
        Ok(floor)
    } else {
        floor.checked_add(1).ok_or(StableSwapError::MathOverflow)
    }
}

pub fn normalize_all<const N: usize>(
    raw: &[u128; N], multipliers: &[u128; N],
) -> Result<[u128; N], StableSwapError> {
    let mut out = [0u128; N];
    for ((o, &r), &m) in out.iter_mut().zip(raw.iter()).zip(multipliers.iter()) {
        *o = normalize(r, m)?;
    }
    Ok(out)
}

// Narrowing a 256-bit intermediate back to storage width.
#[inline(always)]
pub fn narrow(value: U256) -> Result<u128, StableSwapError> {
    if value > U256::from(u128::MAX) {
        return Err(StableSwapError::MathOverflow);
    }
    Ok(value.as_u128())
}

/// `a * b / c` rounding down, with a 256-bit product.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, StableSwapError> {
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(StableSwapError::MathOverflow)?;
    narrow(product.checked_div(U256::from(c)).ok_or(StableSwapError::MathOverflow)?)
}

/// `a * b / c` rounding up, with a 256-bit product.
pub fn mul_div_up(a: u128, b: u128, c: u128) -> Result<u128, StableSwapError> {
    if c == 0 {
        return Err(StableSwapError::MathOverflow);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(StableSwapError::MathOverflow)?;
    let divisor = U256::from(c);
    let mut quotient = product / divisor;
    if quotient * divisor != product {
        quotient = quotient.checked_add(U256::ONE).ok_or(StableSwapError::MathOverflow)?;
    }
    narrow(quotient)
}

#[inline(always)]
fn within_one(a: U256, b: U256) -> bool {
    if a > b { a - b <= U256::ONE } else { b - a <= U256::ONE }
}

// n^n for the token count.
fn n_pow_n(n: u128) -> Result<u128, StableSwapError> {
    let mut acc = 1u128;
    for _ in 0..n {
        acc = acc.checked_mul(n).ok_or(StableSwapError::MathOverflow)?;
    }
    Ok(acc)
}

// A * n^n, still scaled by A_PRECISION.
fn compute_ann(amp: u128, n: u128) -> Result<U256, StableSwapError> {
    if amp < A_PRECISION {
        return Err(StableSwapError::InvalidAmplification);
    }
    U256::from(amp)
        .checked_mul(U256::from(n_pow_n(n)?))
        .ok_or(StableSwapError::MathOverflow)
}

/// Solves for the invariant D of normalized balances `xp` at precise
/// amplification `amp`.
///
/// ```md
/// A * n^n * sum(x_i) + D = A * n^n * D + D^(n+1) / (n^n * prod(x_i))
/// ```
///
/// Newton iteration from `D_0 = sum(x_i)`:
///
/// ```md
/// D_P = D^(n+1) / (n^n * prod(x_i))
/// D   = (Ann * S + n * D_P) * D / ((Ann - 1) * D + (n + 1) * D_P)
/// ```
///
/// Stops once two successive values are within one unit. Exhausting
/// [`MAX_ITERATIONS`] is an error, never an approximate answer.
pub fn compute_d(xp: &[u128], amp: u128) -> Result<u128, StableSwapError> {
    compute_d_bounded(xp, amp, MAX_ITERATIONS)
}

pub(crate) fn compute_d_bounded(
    xp: &[u128], amp: u128, max_iterations: usize,
) -> Result<u128, StableSwapError> {
    if xp.is_empty() {
        return Err(StableSwapError::InvalidTokenCount);
    }
    let n = xp.len() as u128;
    let sum_x = constant_sum(xp)?;
    if sum_x == 0 {
        return Ok(0);
    }

    let ann = compute_ann(amp, n)?;
    let precision = U256::from(A_PRECISION);
    let n_u = U256::from(n);
    let sum = U256::from(sum_x);

    // Ann * S / A_PRECISION and (Ann - 1) are fixed across iterations.
    let ann_sum = ann
        .checked_mul(sum)
        .ok_or(StableSwapError::MathOverflow)?
        / precision;
    let ann_sub_one = ann
        .checked_sub(precision)
        .ok_or(StableSwapError::MathOverflow)?;

    let mut d = sum;
    for _ in 0..max_iterations {
        let mut d_p = d;
        for &x in xp {
            let denominator = U256::from(x)
                .checked_mul(n_u)
                .ok_or(StableSwapError::MathOverflow)?;
            d_p = d_p
                .checked_mul(d)
                .ok_or(StableSwapError::MathOverflow)?
                .checked_div(denominator)
                .ok_or(StableSwapError::MathOverflow)?;
        }
        let d_prev = d;

        let numerator = d_p
            .checked_mul(n_u)
            .and_then(|v| v.checked_add(ann_sum))
            .and_then(|v| v.checked_mul(d))
            .ok_or(StableSwapError::MathOverflow)?;
        let denominator = ann_sub_one
            .checked_mul(d)
            .map(|v| v / precision)
            .and_then(|v| v.checked_add(d_p.checked_mul(n_u + U256::ONE)?))
            .ok_or(StableSwapError::MathOverflow)?;
        d = numerator
            .checked_div(denominator)
            .ok_or(StableSwapError::MathOverflow)?;

        if within_one(d, d_prev) {
            return narrow(d);
        }
    }
    Err(StableSwapError::DidNotConverge)
}

/// Solves for the balance at `index` that keeps the invariant at `d`, all
/// other normalized balances in `xp` held fixed. `xp[index]` is ignored.
///
/// ```md
/// y^2 + (b - D) * y = c
/// b = S' + D / Ann
/// c = D^(n+1) / (n^n * P' * Ann)
/// ```
///
/// `S'` and `P'` are the sum and product of the other balances. Iterates
/// `y = (y^2 + c) / (2y + b - D)` from `y_0 = D` under the same convergence
/// contract as [`compute_d`].
pub fn compute_y_given_d(
    amp: u128, index: usize, xp: &[u128], d: u128,
) -> Result<u128, StableSwapError> {
    compute_y_given_d_bounded(amp, index, xp, d, MAX_ITERATIONS)
}

pub(crate) fn compute_y_given_d_bounded(
    amp: u128, index: usize, xp: &[u128], d: u128, max_iterations: usize,
) -> Result<u128, StableSwapError> {
    let n = xp.len();
    if index >= n {
        return Err(StableSwapError::InvalidIndex);
    }
    let ann = compute_ann(amp, n as u128)?;
    let precision = U256::from(A_PRECISION);
    let n_u = U256::from(n as u128);
    let d = U256::from(d);

    let mut c = d;
    let mut s = U256::ZERO;
    for (i, &x) in xp.iter().enumerate() {
        if i == index {
            continue;
        }
        let x = U256::from(x);
        s = s.checked_add(x).ok_or(StableSwapError::MathOverflow)?;
        c = c
            .checked_mul(d)
            .ok_or(StableSwapError::MathOverflow)?
            .checked_div(x.checked_mul(n_u).ok_or(StableSwapError::MathOverflow)?)
            .ok_or(StableSwapError::MathOverflow)?;
    }
    c = c
        .checked_mul(d)
        .and_then(|v| v.checked_mul(precision))
        .ok_or(StableSwapError::MathOverflow)?
        .checked_div(ann.checked_mul(n_u).ok_or(StableSwapError::MathOverflow)?)
        .ok_or(StableSwapError::MathOverflow)?;
    let b = d
        .checked_mul(precision)
        .and_then(|v| v.checked_div(ann))
        .and_then(|v| v.checked_add(s))
        .ok_or(StableSwapError::MathOverflow)?;

    let mut y = d;
    for _ in 0..max_iterations {
        let y_prev = y;
        let numerator = y
            .checked_mul(y)
            .and_then(|v| v.checked_add(c))
            .ok_or(StableSwapError::MathOverflow)?;
        let denominator = y
            .checked_mul(U256::new(2))
            .and_then(|v| v.checked_add(b))
            .and_then(|v| v.checked_sub(d))
            .ok_or(StableSwapError::MathOverflow)?;
        y = numerator
            .checked_div(denominator)
            .ok_or(StableSwapError::MathOverflow)?;
        if within_one(y, y_prev) {
            return narrow(y);
        }
    }
    Err(StableSwapError::DidNotConverge)
}
