//! Swapping one pooled token for another, either for an exact input amount
//! or to receive an exact output amount.
use pinocchio_log::log;

use crate::config::Pool;
use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::curve_ops::SwapQuote;
use crate::helpers::utils::{Deadline, InstructionReader, InvokeContext, TokenAccount};
use crate::instructions::InstructionOutcome;

pub struct SwapInstructionData {
    pub token_in: u8,
    pub token_out: u8,
    pub amount: u128, // dx for an exact-input swap, dy for an exact-output one.
    pub limit: u128, // Minimum dy, or maximum dx.
    pub deadline: i64,
}

impl<'a> TryFrom<&'a [u8]> for SwapInstructionData {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let token_in = reader.read_u8()?;
        let token_out = reader.read_u8()?;
        let amount = reader.read_u128()?;
        let limit = reader.read_u128()?;
        let deadline = reader.read_i64()?;
        reader.finish()?;

        if amount == 0 {
            return Err(StableSwapError::InvalidAmount);
        }
        Ok(Self { token_in, token_out, amount, limit, deadline })
    }
}

// Moves tokens for a quoted swap and commits it. Both legs are funded
// before either runs.
fn settle_swap<const N: usize>(
    pool: &mut Pool<N>, ctx: &mut InvokeContext, quote: &SwapQuote<N>, i: usize, j: usize,
) -> Result<(), StableSwapError> {
    let mint_in = pool.token(i)?.mint();
    let mint_out = pool.token(j)?.mint();
    let vault = pool.vault();

    TokenAccount::check_funds(&*ctx.ledger, &mint_in, ctx.caller, quote.amount_in)?;
    TokenAccount::check_funds(&*ctx.ledger, &mint_out, &vault, quote.amount_out)?;

    let mut next = *pool;
    next.commit_swap(quote, j)?;

    TokenAccount::transfer_tokens(ctx.ledger, &mint_in, ctx.caller, &vault, quote.amount_in)?;
    TokenAccount::transfer_tokens(ctx.ledger, &mint_out, &vault, ctx.caller, quote.amount_out)?;
    *pool = next;
    Ok(())
}

pub struct Swap {
    pub instruction_data: SwapInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for Swap {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = SwapInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl Swap {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let (i, j) = (self.instruction_data.token_in as usize, self.instruction_data.token_out as usize);
        let quote = pool.quote_swap(i, j, self.instruction_data.amount, ctx.now)?;
        // Check for slippage.
        if quote.amount_out < self.instruction_data.limit {
            return Err(StableSwapError::InsufficientOutput);
        }
        settle_swap(pool, ctx, &quote, i, j)?;

        log!("Swap: in {} out {} fee {}", quote.amount_in, quote.amount_out, quote.fee);
        Ok(InstructionOutcome::Swapped(quote))
    }
}

pub struct SwapExactOut {
    pub instruction_data: SwapInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for SwapExactOut {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = SwapInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl SwapExactOut {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        Deadline::check(self.instruction_data.deadline, ctx.now)?;

        let (i, j) = (self.instruction_data.token_in as usize, self.instruction_data.token_out as usize);
        let quote = pool.quote_swap_exact_out(i, j, self.instruction_data.amount, ctx.now)?;
        if quote.amount_in > self.instruction_data.limit {
            return Err(StableSwapError::ExcessiveInput);
        }
        settle_swap(pool, ctx, &quote, i, j)?;

        log!("SwapExactOut: in {} out {} fee {}", quote.amount_in, quote.amount_out, quote.fee);
        Ok(InstructionOutcome::Swapped(quote))
    }
}
