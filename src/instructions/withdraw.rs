//! Burning pool-share tokens for pooled tokens. Three forms: proportional
//! to the pool (no fee), an exact basket of tokens (imbalance fee, LP burn
//! bounded by the caller), or a single token (imbalance fee).
use pinocchio_log::log;

use crate::config::Pool;
use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::curve_ops::LiquidityQuote;
use crate::helpers::utils::{Deadline, InstructionReader, InvokeContext, TokenAccount};
use crate::instructions::InstructionOutcome;

// Burns the caller's LP and pays out the quoted amounts from the vault,
// committing the pool only after both sides went through.
fn settle_withdrawal<const N: usize>(
    pool: &mut Pool<N>, ctx: &mut InvokeContext, quote: &LiquidityQuote<N>,
) -> Result<(), StableSwapError> {
    let vault = pool.vault();
    let lp_mint = pool.lp_mint();
    TokenAccount::check_funds(&*ctx.ledger, &lp_mint, ctx.caller, quote.lp_amount)?;
    for (token, &amount) in pool.tokens().iter().zip(quote.amounts.iter()) {
        TokenAccount::check_funds(&*ctx.ledger, &token.mint(), &vault, amount)?;
    }

    let mut next = *pool;
    next.commit_balances(&quote.balances_after, &quote.admin_fees)?;
    next.burn_lp(quote.lp_amount)?;

    TokenAccount::burn_tokens(ctx.ledger, &lp_mint, ctx.caller, quote.lp_amount)?;
    for (token, &amount) in pool.tokens().iter().zip(quote.amounts.iter()) {
        TokenAccount::transfer_tokens(ctx.ledger, &token.mint(), &vault, ctx.caller, amount)?;
    }
    *pool = next;
    Ok(())
}

pub struct RemoveLiquidityInstructionData<const N: usize> {
    pub lp_amount: u128,
    pub min_amounts: [u128; N],
    pub deadline: i64,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for RemoveLiquidityInstructionData<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let lp_amount = reader.read_u128()?;
        let min_amounts = reader.read_u128_array::<N>()?;
        let deadline = reader.read_i64()?;
        reader.finish()?;

        if lp_amount == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        Ok(Self { lp_amount, min_amounts, deadline })
    }
}

pub struct RemoveLiquidity<const N: usize> {
    pub instruction_data: RemoveLiquidityInstructionData<N>,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for RemoveLiquidity<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = RemoveLiquidityInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl<const N: usize> RemoveLiquidity<N> {
    pub fn process(&self, pool: &mut Pool<N>, ctx: &mut InvokeContext) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let quote = pool.quote_remove_liquidity(self.instruction_data.lp_amount)?;
        // Check for slippage.
        for (&amount, &min) in quote.amounts.iter().zip(self.instruction_data.min_amounts.iter()) {
            if amount < min {
                return Err(StableSwapError::WithdrawalBelowMinimum);
            }
        }
        settle_withdrawal(pool, ctx, &quote)?;

        log!("RemoveLiquidity: burned {} supply {}", quote.lp_amount, pool.lp_supply());
        Ok(InstructionOutcome::LiquidityRemoved(quote))
    }
}

pub struct RemoveLiquidityImbalanceInstructionData<const N: usize> {
    pub amounts: [u128; N],
    pub max_burn_amount: u128,
    pub deadline: i64,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for RemoveLiquidityImbalanceInstructionData<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let amounts = reader.read_u128_array::<N>()?;
        let max_burn_amount = reader.read_u128()?;
        let deadline = reader.read_i64()?;
        reader.finish()?;

        Ok(Self { amounts, max_burn_amount, deadline })
    }
}

pub struct RemoveLiquidityImbalance<const N: usize> {
    pub instruction_data: RemoveLiquidityImbalanceInstructionData<N>,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for RemoveLiquidityImbalance<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = RemoveLiquidityImbalanceInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl<const N: usize> RemoveLiquidityImbalance<N> {
    pub fn process(&self, pool: &mut Pool<N>, ctx: &mut InvokeContext) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let quote = pool.quote_remove_liquidity_imbalance(&self.instruction_data.amounts, ctx.now)?;
        if quote.lp_amount > self.instruction_data.max_burn_amount {
            return Err(StableSwapError::BurnExceedsMaximum);
        }
        settle_withdrawal(pool, ctx, &quote)?;

        log!("RemoveLiquidityImbalance: burned {} supply {}", quote.lp_amount, pool.lp_supply());
        Ok(InstructionOutcome::LiquidityRemoved(quote))
    }
}

pub struct RemoveLiquidityOneTokenInstructionData {
    pub lp_amount: u128,
    pub token_index: u8,
    pub min_amount: u128,
    pub deadline: i64,
}

impl<'a> TryFrom<&'a [u8]> for RemoveLiquidityOneTokenInstructionData {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let lp_amount = reader.read_u128()?;
        let token_index = reader.read_u8()?;
        let min_amount = reader.read_u128()?;
        let deadline = reader.read_i64()?;
        reader.finish()?;

        if lp_amount == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        Ok(Self { lp_amount, token_index, min_amount, deadline })
    }
}

pub struct RemoveLiquidityOneToken {
    pub instruction_data: RemoveLiquidityOneTokenInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for RemoveLiquidityOneToken {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = RemoveLiquidityOneTokenInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl RemoveLiquidityOneToken {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let index = self.instruction_data.token_index as usize;
        let quote = pool.quote_remove_liquidity_one_token(self.instruction_data.lp_amount, index, ctx.now)?;
        if quote.amounts[index] < self.instruction_data.min_amount {
            return Err(StableSwapError::WithdrawalBelowMinimum);
        }
        settle_withdrawal(pool, ctx, &quote)?;

        log!("RemoveLiquidityOneToken: burned {} out {}", quote.lp_amount, quote.amounts[index]);
        Ok(InstructionOutcome::LiquidityRemoved(quote))
    }
}
