//! Pool state: the pooled tokens, LP supply and cap, fee parameters and the
//! amplification ramp. Instructions mutate a copy of this and commit it
//! only once every check and ledger effect has gone through.
use solana_address::Address;

use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::amp_ops::AmplificationRamp;
use crate::helpers::math_procs::curve_ops::{LiquidityQuote, StableSwapCurve, SwapQuote};
use crate::helpers::math_procs::numerical_ops::{mul_div, precision_multiplier, FEE_DENOMINATOR};

/// 1% of the swap amount.
pub const MAX_SWAP_FEE: u128 = 100_000_000;
/// All of the swap fee.
pub const MAX_ADMIN_FEE: u128 = FEE_DENOMINATOR;
/// Virtual price is reported with 18 decimals.
pub const VIRTUAL_PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoolState {
    #[default]
    Uninitialized = 0u8,
    Active = 1u8,
}
impl From<PoolState> for u8 {
    fn from(state: PoolState) -> Self {
        state as u8
    }
}

#[derive(Clone, Copy, Default)]
pub struct PooledToken {
    mint: [u8; 32],
    decimals: u8,
    multiplier: u128, // 10^(18 - decimals)
    balance: u128, // Raw units, admin fees excluded.
    admin_fees: u128, // Raw units owed to the admin.
}

impl PooledToken {
    #[inline(always)]
    pub fn mint(&self) -> Address { Address::new_from_array(self.mint) }
    #[inline(always)]
    pub fn decimals(&self) -> u8 { self.decimals }
    #[inline(always)]
    pub fn multiplier(&self) -> u128 { self.multiplier }
    #[inline(always)]
    pub fn balance(&self) -> u128 { self.balance }
    #[inline(always)]
    pub fn admin_fees(&self) -> u128 { self.admin_fees }
}

#[derive(Clone, Copy)]
pub struct Pool<const N: usize> {
    state: PoolState,
    tokens: [PooledToken; N], // Index order is swap order.
    lp_mint: [u8; 32], // Pool-share token.
    vault: [u8; 32], // Custody account holding every pooled token.
    lp_supply: u128,
    lp_cap: u128,
    swap_fee: u128,
    admin_fee: u128,
    ramp: AmplificationRamp,
}

impl<const N: usize> Default for Pool<N> {
    fn default() -> Self {
        Self {
            state: PoolState::Uninitialized,
            tokens: [PooledToken::default(); N],
            lp_mint: [0; 32],
            vault: [0; 32],
            lp_supply: 0,
            lp_cap: u128::MAX,
            swap_fee: 0,
            admin_fee: 0,
            ramp: AmplificationRamp::default(),
        }
    }
}

impl<const N: usize> Pool<N> {
    pub fn new() -> Self {
        Self::default()
    }

    // ====================== READING DATA ===========================
    #[inline(always)]
    pub fn state(&self) -> PoolState { self.state }
    #[inline(always)]
    pub fn tokens(&self) -> &[PooledToken; N] { &self.tokens }
    #[inline(always)]
    pub fn lp_mint(&self) -> Address { Address::new_from_array(self.lp_mint) }
    #[inline(always)]
    pub fn vault(&self) -> Address { Address::new_from_array(self.vault) }
    #[inline(always)]
    pub fn lp_supply(&self) -> u128 { self.lp_supply }
    #[inline(always)]
    pub fn lp_cap(&self) -> u128 { self.lp_cap }
    #[inline(always)]
    pub fn swap_fee(&self) -> u128 { self.swap_fee }
    #[inline(always)]
    pub fn admin_fee(&self) -> u128 { self.admin_fee }
    #[inline(always)]
    pub fn ramp(&self) -> &AmplificationRamp { &self.ramp }

    #[inline(always)]
    pub fn require_active(&self) -> Result<(), StableSwapError> {
        if self.state != PoolState::Active {
            return Err(StableSwapError::PoolNotActive);
        }
        Ok(())
    }

    pub fn token(&self, index: usize) -> Result<&PooledToken, StableSwapError> {
        self.tokens.get(index).ok_or(StableSwapError::InvalidIndex)
    }

    pub fn balances(&self) -> [u128; N] {
        let mut out = [0u128; N];
        for (o, t) in out.iter_mut().zip(self.tokens.iter()) {
            *o = t.balance;
        }
        out
    }

    pub fn multipliers(&self) -> [u128; N] {
        let mut out = [0u128; N];
        for (o, t) in out.iter_mut().zip(self.tokens.iter()) {
            *o = t.multiplier;
        }
        out
    }

    // Runs `f` against a curve over the current balances at A as of `now`.
    fn with_curve<T>(
        &self, now: i64,
        f: impl FnOnce(&StableSwapCurve<'_, N>) -> Result<T, StableSwapError>,
    ) -> Result<T, StableSwapError> {
        self.require_active()?;
        let balances = self.balances();
        let multipliers = self.multipliers();
        let curve = StableSwapCurve {
            balances: &balances,
            multipliers: &multipliers,
            amp: self.ramp.current_a_precise(now),
            swap_fee: self.swap_fee,
            admin_fee: self.admin_fee,
        };
        f(&curve)
    }

    // =========================== QUERIES ===========================
    pub fn get_a(&self, now: i64) -> u128 {
        self.ramp.current_a(now)
    }

    pub fn get_a_precise(&self, now: i64) -> u128 {
        self.ramp.current_a_precise(now)
    }

    pub fn get_d(&self, now: i64) -> Result<u128, StableSwapError> {
        self.with_curve(now, |curve| curve.compute_d())
    }

    /// D per LP share with 18 decimals; zero before the first deposit.
    pub fn get_virtual_price(&self, now: i64) -> Result<u128, StableSwapError> {
        if self.lp_supply == 0 {
            return Ok(0);
        }
        let d = self.get_d(now)?;
        mul_div(d, VIRTUAL_PRICE_PRECISION, self.lp_supply)
    }

    pub fn get_token_balance(&self, index: usize) -> Result<u128, StableSwapError> {
        Ok(self.token(index)?.balance)
    }

    pub fn get_admin_balance(&self, index: usize) -> Result<u128, StableSwapError> {
        Ok(self.token(index)?.admin_fees)
    }

    pub fn get_token_index(&self, mint: &Address) -> Result<usize, StableSwapError> {
        let key: &[u8] = mint.as_ref();
        self.tokens
            .iter()
            .position(|t| t.mint.as_slice() == key)
            .ok_or(StableSwapError::UnknownToken)
    }

    pub fn quote_swap(&self, i: usize, j: usize, dx: u128, now: i64) -> Result<SwapQuote<N>, StableSwapError> {
        self.with_curve(now, |curve| curve.swap_given_input(i, j, dx))
    }

    pub fn quote_swap_exact_out(&self, i: usize, j: usize, dy: u128, now: i64) -> Result<SwapQuote<N>, StableSwapError> {
        self.with_curve(now, |curve| curve.swap_given_output(i, j, dy))
    }

    pub fn quote_add_liquidity(&self, amounts: &[u128; N], now: i64) -> Result<LiquidityQuote<N>, StableSwapError> {
        self.with_curve(now, |curve| curve.deposit_to_amm(amounts, self.lp_supply))
    }

    pub fn quote_remove_liquidity(&self, lp_amount: u128) -> Result<LiquidityQuote<N>, StableSwapError> {
        // Proportional withdrawal never touches A.
        self.with_curve(0, |curve| curve.withdraw_balanced(lp_amount, self.lp_supply))
    }

    pub fn quote_remove_liquidity_imbalance(
        &self, amounts: &[u128; N], now: i64,
    ) -> Result<LiquidityQuote<N>, StableSwapError> {
        self.with_curve(now, |curve| curve.withdraw_imbalanced(amounts, self.lp_supply))
    }

    pub fn quote_remove_liquidity_one_token(
        &self, lp_amount: u128, index: usize, now: i64,
    ) -> Result<LiquidityQuote<N>, StableSwapError> {
        self.with_curve(now, |curve| curve.withdraw_one_token(lp_amount, index, self.lp_supply))
    }

    /// Output of token `j` for `dx` of token `i`.
    pub fn calculate_swap(&self, i: usize, j: usize, dx: u128, now: i64) -> Result<u128, StableSwapError> {
        Ok(self.quote_swap(i, j, dx, now)?.amount_out)
    }

    /// Input of token `i` required to receive exactly `dy` of token `j`.
    pub fn calculate_swap_exact_out(&self, i: usize, j: usize, dy: u128, now: i64) -> Result<u128, StableSwapError> {
        Ok(self.quote_swap_exact_out(i, j, dy, now)?.amount_in)
    }

    /// LP minted for `amounts`, imbalance fees included.
    pub fn calculate_add_liquidity(&self, amounts: &[u128; N], now: i64) -> Result<u128, StableSwapError> {
        Ok(self.quote_add_liquidity(amounts, now)?.lp_amount)
    }

    pub fn calculate_remove_liquidity(&self, lp_amount: u128) -> Result<[u128; N], StableSwapError> {
        Ok(self.quote_remove_liquidity(lp_amount)?.amounts)
    }

    pub fn calculate_remove_liquidity_one_token(
        &self, lp_amount: u128, index: usize, now: i64,
    ) -> Result<u128, StableSwapError> {
        Ok(self.quote_remove_liquidity_one_token(lp_amount, index, now)?.amounts[index])
    }

    /// LP burned to withdraw exactly `amounts`.
    pub fn calculate_remove_liquidity_imbalance(&self, amounts: &[u128; N], now: i64) -> Result<u128, StableSwapError> {
        Ok(self.quote_remove_liquidity_imbalance(amounts, now)?.lp_amount)
    }

    // =========================== WRITING DATA ====================
    #[inline(always)]
    pub fn set_inner(
        &mut self, mints: &[[u8; 32]; N], decimals: &[u8; N],
        a: u64, swap_fee: u128, admin_fee: u128,
        lp_mint: [u8; 32], vault: [u8; 32],
    ) -> Result<(), StableSwapError> {
        if self.state != PoolState::Uninitialized {
            return Err(StableSwapError::AlreadyInitialized);
        }
        if N < 2 {
            return Err(StableSwapError::InvalidTokenCount);
        }
        for (k, mint) in mints.iter().enumerate() {
            if mints[..k].contains(mint) {
                return Err(StableSwapError::DuplicateToken);
            }
        }

        let mut tokens = [PooledToken::default(); N];
        for ((token, &mint), &token_decimals) in tokens.iter_mut().zip(mints.iter()).zip(decimals.iter()) {
            token.mint = mint;
            token.decimals = token_decimals;
            token.multiplier = precision_multiplier(token_decimals)?;
        }
        let ramp = AmplificationRamp::new(a)?;

        self.set_swap_fee(swap_fee)?;
        self.set_admin_fee(admin_fee)?;
        self.tokens = tokens;
        self.ramp = ramp;
        self.lp_mint = lp_mint;
        self.vault = vault;
        self.lp_supply = 0;
        self.lp_cap = u128::MAX;
        self.state = PoolState::Active;
        Ok(())
    }

    #[inline(always)]
    pub fn set_swap_fee(&mut self, fee: u128) -> Result<(), StableSwapError> {
        if fee > MAX_SWAP_FEE {
            return Err(StableSwapError::FeeTooHigh);
        }
        self.swap_fee = fee;
        Ok(())
    }

    #[inline(always)]
    pub fn set_admin_fee(&mut self, fee: u128) -> Result<(), StableSwapError> {
        if fee > MAX_ADMIN_FEE {
            return Err(StableSwapError::FeeTooHigh);
        }
        self.admin_fee = fee;
        Ok(())
    }

    /// A cap below the current supply only blocks further mints.
    #[inline(always)]
    pub fn set_lp_cap(&mut self, cap: u128) {
        self.lp_cap = cap;
    }

    #[inline(always)]
    pub fn ramp_mut(&mut self) -> &mut AmplificationRamp {
        &mut self.ramp
    }

    /// Stores post-operation balances and credits accrued admin fees.
    pub fn commit_balances(
        &mut self, balances_after: &[u128; N], admin_fees: &[u128; N],
    ) -> Result<(), StableSwapError> {
        for ((token, &balance), &fee) in self.tokens.iter_mut().zip(balances_after.iter()).zip(admin_fees.iter()) {
            token.balance = balance;
            token.admin_fees = token.admin_fees.checked_add(fee).ok_or(StableSwapError::MathOverflow)?;
        }
        Ok(())
    }

    /// Records a swap; the admin fee is owed in the output token.
    pub fn commit_swap(&mut self, quote: &SwapQuote<N>, out_index: usize) -> Result<(), StableSwapError> {
        let mut admin_fees = [0u128; N];
        *admin_fees.get_mut(out_index).ok_or(StableSwapError::InvalidIndex)? = quote.admin_fee;
        self.commit_balances(&quote.balances_after, &admin_fees)
    }

    pub fn mint_lp(&mut self, amount: u128) -> Result<(), StableSwapError> {
        let supply = self.lp_supply.checked_add(amount).ok_or(StableSwapError::MathOverflow)?;
        if supply > self.lp_cap {
            return Err(StableSwapError::CapExceeded);
        }
        self.lp_supply = supply;
        Ok(())
    }

    pub fn burn_lp(&mut self, amount: u128) -> Result<(), StableSwapError> {
        self.lp_supply = self
            .lp_supply
            .checked_sub(amount)
            .ok_or(StableSwapError::InsufficientLiquidity)?;
        Ok(())
    }

    /// Zeroes every admin-fee balance and returns what was owed.
    pub fn take_admin_fees(&mut self) -> [u128; N] {
        let mut owed = [0u128; N];
        for (o, token) in owed.iter_mut().zip(self.tokens.iter_mut()) {
            *o = core::mem::take(&mut token.admin_fees);
        }
        owed
    }
}
