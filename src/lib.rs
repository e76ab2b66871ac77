//! Stableswap pool engine: the amplified invariant solver, the A ramp and
//! the liquidity accounting, driven through one-byte-discriminated
//! instructions against an in-memory pool.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod helpers;
pub mod instructions;

use helpers::errors::StableSwapError;
use helpers::utils::InvokeContext;
use instructions::{
    admin::{RampA, SetAdminFee, SetLpCap, SetSwapFee, StopRampA, WithdrawAdminFees},
    deposit::AddLiquidity,
    initialize::Initialize,
    swap::{Swap, SwapExactOut},
    withdraw::{RemoveLiquidity, RemoveLiquidityImbalance, RemoveLiquidityOneToken},
    InstructionOutcome, StableSwapInstruction,
};

pub use config::{Pool, PoolState, PooledToken};
pub use helpers::utils::{Authority, TokenLedger};

/// Decodes and runs one instruction. On error the pool is left exactly as it
/// was.
pub fn process_instruction<const N: usize>(
    pool: &mut Pool<N>,
    ctx: &mut InvokeContext,
    instruction_data: &[u8],
) -> Result<InstructionOutcome<N>, StableSwapError> {
    let (discriminator, data) = instruction_data
        .split_first()
        .ok_or(StableSwapError::InvalidInstructionData)?;

    match StableSwapInstruction::try_from(*discriminator)? {
        StableSwapInstruction::Initialize => Initialize::<N>::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::Swap => Swap::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::SwapExactOut => SwapExactOut::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::AddLiquidity => AddLiquidity::<N>::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::RemoveLiquidity => RemoveLiquidity::<N>::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::RemoveLiquidityImbalance => {
            RemoveLiquidityImbalance::<N>::try_from(data)?.process(pool, ctx)
        }
        StableSwapInstruction::RemoveLiquidityOneToken => {
            RemoveLiquidityOneToken::try_from(data)?.process(pool, ctx)
        }
        StableSwapInstruction::SetSwapFee => SetSwapFee::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::SetAdminFee => SetAdminFee::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::SetLpCap => SetLpCap::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::WithdrawAdminFees => WithdrawAdminFees::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::RampA => RampA::try_from(data)?.process(pool, ctx),
        StableSwapInstruction::StopRampA => StopRampA::try_from(data)?.process(pool, ctx),
    }
}

/// Host-program form of [`process_instruction`], surfacing failures as
/// `ProgramError::Custom`.
pub fn process_program_instruction<const N: usize>(
    pool: &mut Pool<N>,
    ctx: &mut InvokeContext,
    instruction_data: &[u8],
) -> pinocchio::ProgramResult {
    process_instruction(pool, ctx, instruction_data)?;
    Ok(())
}
