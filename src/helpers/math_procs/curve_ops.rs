//! Curve operations for the pool: swaps, deposits and the three withdrawal
//! forms. Everything here is a pure quote over a borrowed balance snapshot;
//! the pool commits `balances_after` itself.
use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::numerical_ops::{
    compute_d, compute_y_given_d, denormalize, denormalize_up, mul_div,
    mul_div_up, normalize, normalize_all, FEE_DENOMINATOR,
};

/// Extra raw units an exact-output quote may add while settling against the
/// exact-input path.
const MAX_SETTLE_STEPS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapQuote<const N: usize> {
    pub amount_in: u128,
    pub amount_out: u128,
    // Both fees are in raw units of the output token.
    pub fee: u128,
    pub admin_fee: u128,
    pub balances_after: [u128; N],
}

/// Result of a deposit or withdrawal. `lp_amount` is minted for deposits and
/// burned for withdrawals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidityQuote<const N: usize> {
    pub amounts: [u128; N],
    pub lp_amount: u128,
    pub fees: [u128; N],
    pub admin_fees: [u128; N],
    pub balances_after: [u128; N],
}

impl<const N: usize> LiquidityQuote<N> {
    fn fee_free(amounts: [u128; N], lp_amount: u128, balances_after: [u128; N]) -> Self {
        Self { amounts, lp_amount, fees: [0; N], admin_fees: [0; N], balances_after }
    }
}

pub struct StableSwapCurve<'b, const N: usize> {
    pub balances: &'b [u128; N], // Raw balances, admin fees excluded.
    pub multipliers: &'b [u128; N],
    pub amp: u128, // Precise A.
    pub swap_fee: u128,
    pub admin_fee: u128,
}

impl<'b, const N: usize> StableSwapCurve<'b, N> {
    #[inline(always)]
    pub fn xp(&self) -> Result<[u128; N], StableSwapError> {
        normalize_all(self.balances, self.multipliers)
    }

    pub fn compute_d(&self) -> Result<u128, StableSwapError> {
        compute_d(&self.xp()?, self.amp)
    }

    /// Imbalance fee rate charged per token on uneven liquidity operations.
    #[inline(always)]
    pub fn fee_per_token(&self) -> u128 {
        self.swap_fee / (2 * (N as u128 - 1))
    }

    fn check_pair(&self, i: usize, j: usize) -> Result<(), StableSwapError> {
        if i >= N || j >= N {
            return Err(StableSwapError::InvalidIndex);
        }
        if i == j {
            return Err(StableSwapError::SameToken);
        }
        Ok(())
    }

    /// Output of token `j` for `dx` raw units of token `i`.
    pub fn swap_given_input(&self, i: usize, j: usize, dx: u128) -> Result<SwapQuote<N>, StableSwapError> {
        self.check_pair(i, j)?;
        if dx == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        let mut xp = self.xp()?;
        let d = compute_d(&xp, self.amp)?;

        let x_out_before = xp[j];
        xp[i] = xp[i]
            .checked_add(normalize(dx, self.multipliers[i])?)
            .ok_or(StableSwapError::MathOverflow)?;
        let y = compute_y_given_d(self.amp, j, &xp, d)?;

        // One unit held back in the pool's favour.
        let dy = x_out_before.saturating_sub(y).saturating_sub(1);
        let dy_fee = mul_div(dy, self.swap_fee, FEE_DENOMINATOR)?;
        let amount_out = denormalize(dy - dy_fee, self.multipliers[j])?;
        let fee = denormalize(dy_fee, self.multipliers[j])?;
        let admin_fee = denormalize(mul_div(dy_fee, self.admin_fee, FEE_DENOMINATOR)?, self.multipliers[j])?;

        let mut balances_after = *self.balances;
        balances_after[i] = balances_after[i]
            .checked_add(dx)
            .ok_or(StableSwapError::MathOverflow)?;
        balances_after[j] = balances_after[j]
            .checked_sub(amount_out + admin_fee)
            .ok_or(StableSwapError::InsufficientLiquidity)?;

        Ok(SwapQuote { amount_in: dx, amount_out, fee, admin_fee, balances_after })
    }

    /// Input of token `i` needed to receive exactly `dy` raw units of token `j`.
    ///
    /// The fee is grossed into the output target before solving, the input
    /// is rounded up, and the result is then checked against
    /// [`Self::swap_given_input`] so that paying the quoted input through
    /// the exact-input path never returns less than `dy`.
    pub fn swap_given_output(&self, i: usize, j: usize, dy: u128) -> Result<SwapQuote<N>, StableSwapError> {
        self.check_pair(i, j)?;
        if dy == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        let mut xp = self.xp()?;
        let d = compute_d(&xp, self.amp)?;

        let dy_norm = normalize(dy, self.multipliers[j])?;
        let fee_complement = FEE_DENOMINATOR - self.swap_fee;
        let gross = mul_div_up(dy_norm, FEE_DENOMINATOR, fee_complement)?;
        let x_in_before = xp[i];
        xp[j] = xp[j]
            .checked_sub(gross)
            .and_then(|v| v.checked_sub(1))
            .filter(|&v| v > 0)
            .ok_or(StableSwapError::InsufficientLiquidity)?;
        let x = compute_y_given_d(self.amp, i, &xp, d)?;
        let dx_norm = x.saturating_sub(x_in_before) + 1;
        let mut dx = denormalize_up(dx_norm, self.multipliers[i])?;

        let mut settled = false;
        for _ in 0..=MAX_SETTLE_STEPS {
            if self.swap_given_input(i, j, dx)?.amount_out >= dy {
                settled = true;
                break;
            }
            dx = dx.checked_add(1).ok_or(StableSwapError::MathOverflow)?;
        }
        if !settled {
            return Err(StableSwapError::DidNotConverge);
        }

        let fee_norm = gross - dy_norm;
        let fee = denormalize(fee_norm, self.multipliers[j])?;
        let admin_fee = denormalize(mul_div(fee_norm, self.admin_fee, FEE_DENOMINATOR)?, self.multipliers[j])?;

        let mut balances_after = *self.balances;
        balances_after[i] = balances_after[i]
            .checked_add(dx)
            .ok_or(StableSwapError::MathOverflow)?;
        balances_after[j] = balances_after[j]
            .checked_sub(dy + admin_fee)
            .ok_or(StableSwapError::InsufficientLiquidity)?;

        Ok(SwapQuote { amount_in: dx, amount_out: dy, fee, admin_fee, balances_after })
    }

    // Per-token imbalance fees between the ideal (proportional) balance and
    // the requested one. Returns (fees, admin fees, stored balances,
    // fee-adjusted balances used for D2).
    #[allow(clippy::type_complexity)]
    fn imbalance_fees(
        &self, new_balances: &[u128; N], d0: u128, d1: u128,
    ) -> Result<([u128; N], [u128; N], [u128; N], [u128; N]), StableSwapError> {
        let fee_rate = self.fee_per_token();
        let mut fees = [0u128; N];
        let mut admin_fees = [0u128; N];
        let mut stored = [0u128; N];
        let mut adjusted = [0u128; N];
        for k in 0..N {
            let ideal = mul_div(d1, self.balances[k], d0)?;
            let new = new_balances[k];
            let difference = if ideal > new { ideal - new } else { new - ideal };
            fees[k] = mul_div(fee_rate, difference, FEE_DENOMINATOR)?;
            admin_fees[k] = mul_div(fees[k], self.admin_fee, FEE_DENOMINATOR)?;
            stored[k] = new
                .checked_sub(admin_fees[k])
                .ok_or(StableSwapError::InsufficientLiquidity)?;
            adjusted[k] = new
                .checked_sub(fees[k])
                .ok_or(StableSwapError::InsufficientLiquidity)?;
        }
        Ok((fees, admin_fees, stored, adjusted))
    }

    /// LP to mint for depositing `amounts` into a pool with `lp_supply`
    /// shares outstanding. The first deposit mints D and must include every
    /// token.
    pub fn deposit_to_amm(&self, amounts: &[u128; N], lp_supply: u128) -> Result<LiquidityQuote<N>, StableSwapError> {
        if amounts.iter().all(|&a| a == 0) {
            return Err(StableSwapError::InvalidAmount);
        }
        if lp_supply == 0 && amounts.iter().any(|&a| a == 0) {
            return Err(StableSwapError::InvalidAmount);
        }

        let d0 = if lp_supply == 0 { 0 } else { self.compute_d()? };
        let mut new_balances = *self.balances;
        for (b, &a) in new_balances.iter_mut().zip(amounts.iter()) {
            *b = b.checked_add(a).ok_or(StableSwapError::MathOverflow)?;
        }
        let d1 = compute_d(&normalize_all(&new_balances, self.multipliers)?, self.amp)?;
        if d1 <= d0 {
            return Err(StableSwapError::InvalidAmount);
        }

        if lp_supply == 0 {
            return Ok(LiquidityQuote::fee_free(*amounts, d1, new_balances));
        }

        let (fees, admin_fees, stored, adjusted) = self.imbalance_fees(&new_balances, d0, d1)?;
        let d2 = compute_d(&normalize_all(&adjusted, self.multipliers)?, self.amp)?;
        let growth = d2.checked_sub(d0).ok_or(StableSwapError::InvalidAmount)?;
        let lp_amount = mul_div(growth, lp_supply, d0)?;

        Ok(LiquidityQuote { amounts: *amounts, lp_amount, fees, admin_fees, balances_after: stored })
    }

    /// Proportional payout for burning `lp_amount`. Carries no fee.
    pub fn withdraw_balanced(&self, lp_amount: u128, lp_supply: u128) -> Result<LiquidityQuote<N>, StableSwapError> {
        if lp_amount == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        if lp_amount > lp_supply {
            return Err(StableSwapError::InsufficientLiquidity);
        }
        let mut amounts = [0u128; N];
        let mut balances_after = *self.balances;
        for k in 0..N {
            amounts[k] = mul_div(self.balances[k], lp_amount, lp_supply)?;
            balances_after[k] -= amounts[k];
        }
        Ok(LiquidityQuote::fee_free(amounts, lp_amount, balances_after))
    }

    /// LP to burn for withdrawing exactly `amounts`.
    pub fn withdraw_imbalanced(&self, amounts: &[u128; N], lp_supply: u128) -> Result<LiquidityQuote<N>, StableSwapError> {
        if lp_supply == 0 {
            return Err(StableSwapError::InsufficientLiquidity);
        }
        if amounts.iter().all(|&a| a == 0) {
            return Err(StableSwapError::InvalidAmount);
        }
        let mut new_balances = *self.balances;
        for (b, &a) in new_balances.iter_mut().zip(amounts.iter()) {
            *b = b.checked_sub(a).ok_or(StableSwapError::InsufficientLiquidity)?;
        }

        let d0 = self.compute_d()?;
        let d1 = compute_d(&normalize_all(&new_balances, self.multipliers)?, self.amp)?;
        let (fees, admin_fees, stored, adjusted) = self.imbalance_fees(&new_balances, d0, d1)?;
        let d2 = compute_d(&normalize_all(&adjusted, self.multipliers)?, self.amp)?;

        let shrink = d0.checked_sub(d2).ok_or(StableSwapError::MathOverflow)?;
        let lp_amount = mul_div(shrink, lp_supply, d0)? + 1;
        if lp_amount > lp_supply {
            return Err(StableSwapError::InsufficientLiquidity);
        }

        Ok(LiquidityQuote { amounts: *amounts, lp_amount, fees, admin_fees, balances_after: stored })
    }

    /// Payout in token `index` alone for burning `lp_amount`.
    pub fn withdraw_one_token(
        &self, lp_amount: u128, index: usize, lp_supply: u128,
    ) -> Result<LiquidityQuote<N>, StableSwapError> {
        if index >= N {
            return Err(StableSwapError::InvalidIndex);
        }
        if lp_amount == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        let xp = self.xp()?;
        if lp_amount > lp_supply || lp_amount > xp[index] {
            return Err(StableSwapError::InsufficientLiquidity);
        }

        let d0 = compute_d(&xp, self.amp)?;
        let d1 = d0 - mul_div(lp_amount, d0, lp_supply)?;
        let new_y = compute_y_given_d(self.amp, index, &xp, d1)?;

        let fee_rate = self.fee_per_token();
        let mut xp_reduced = xp;
        for k in 0..N {
            let scaled = mul_div(xp[k], d1, d0)?;
            let expected = if k == index {
                scaled.checked_sub(new_y).ok_or(StableSwapError::MathOverflow)?
            } else {
                xp[k] - scaled
            };
            xp_reduced[k] -= mul_div(fee_rate, expected, FEE_DENOMINATOR)?;
        }

        let y_reduced = compute_y_given_d(self.amp, index, &xp_reduced, d1)?;
        let multiplier = self.multipliers[index];
        let dy = denormalize(
            xp_reduced[index].saturating_sub(y_reduced).saturating_sub(1),
            multiplier,
        )?;
        let fee = denormalize(xp[index].saturating_sub(new_y), multiplier)?.saturating_sub(dy);
        let admin_fee = mul_div(fee, self.admin_fee, FEE_DENOMINATOR)?;

        let mut amounts = [0u128; N];
        let mut fees = [0u128; N];
        let mut admin_fees = [0u128; N];
        amounts[index] = dy;
        fees[index] = fee;
        admin_fees[index] = admin_fee;
        let mut balances_after = *self.balances;
        balances_after[index] = balances_after[index]
            .checked_sub(dy + admin_fee)
            .ok_or(StableSwapError::InsufficientLiquidity)?;

        Ok(LiquidityQuote { amounts, lp_amount, fees, admin_fees, balances_after })
    }
}
