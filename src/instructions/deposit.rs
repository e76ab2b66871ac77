//! Deposit any mix of the pooled tokens and mint pool-share tokens for it.
//! Uneven deposits pay the imbalance fee; the first deposit must include
//! every token and mints LP one to one with the resulting D.
use pinocchio_log::log;

use crate::config::Pool;
use crate::helpers::errors::StableSwapError;
use crate::helpers::utils::{Deadline, InstructionReader, InvokeContext, TokenAccount};
use crate::instructions::InstructionOutcome;

pub struct AddLiquidityInstructionData<const N: usize> {
    pub amounts: [u128; N],
    pub min_mint_amount: u128,
    pub deadline: i64,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for AddLiquidityInstructionData<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let amounts = reader.read_u128_array::<N>()?;
        let min_mint_amount = reader.read_u128()?;
        let deadline = reader.read_i64()?;
        reader.finish()?;

        Ok(Self { amounts, min_mint_amount, deadline })
    }
}

pub struct AddLiquidity<const N: usize> {
    pub instruction_data: AddLiquidityInstructionData<N>,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for AddLiquidity<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = AddLiquidityInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl<const N: usize> AddLiquidity<N> {
    pub fn process(&self, pool: &mut Pool<N>, ctx: &mut InvokeContext) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let quote = pool.quote_add_liquidity(&self.instruction_data.amounts, ctx.now)?;
        if quote.lp_amount < self.instruction_data.min_mint_amount {
            return Err(StableSwapError::MintBelowMinimum);
        }

        let mut next = *pool;
        next.commit_balances(&quote.balances_after, &quote.admin_fees)?;
        next.mint_lp(quote.lp_amount)?;

        let vault = pool.vault();
        for (token, &amount) in pool.tokens().iter().zip(quote.amounts.iter()) {
            TokenAccount::check_funds(&*ctx.ledger, &token.mint(), ctx.caller, amount)?;
        }
        for (token, &amount) in pool.tokens().iter().zip(quote.amounts.iter()) {
            TokenAccount::transfer_tokens(ctx.ledger, &token.mint(), ctx.caller, &vault, amount)?;
        }
        TokenAccount::mint_tokens(ctx.ledger, &pool.lp_mint(), ctx.caller, quote.lp_amount)?;
        *pool = next;

        log!("AddLiquidity: minted {} supply {}", quote.lp_amount, next.lp_supply());
        Ok(InstructionOutcome::LiquidityAdded(quote))
    }
}
