//! Exposes the instructions of the pool.
pub mod admin;
pub mod deposit;
pub mod initialize;
pub mod swap;
pub mod withdraw;

use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::curve_ops::{LiquidityQuote, SwapQuote};

/// One-byte discriminator leading every instruction payload.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StableSwapInstruction {
    Initialize = 0,
    Swap = 1,
    SwapExactOut = 2,
    AddLiquidity = 3,
    RemoveLiquidity = 4,
    RemoveLiquidityImbalance = 5,
    RemoveLiquidityOneToken = 6,
    SetSwapFee = 7,
    SetAdminFee = 8,
    SetLpCap = 9,
    WithdrawAdminFees = 10,
    RampA = 11,
    StopRampA = 12,
}

impl TryFrom<u8> for StableSwapInstruction {
    type Error = StableSwapError;
    fn try_from(discriminator: u8) -> Result<Self, Self::Error> {
        Ok(match discriminator {
            0 => Self::Initialize,
            1 => Self::Swap,
            2 => Self::SwapExactOut,
            3 => Self::AddLiquidity,
            4 => Self::RemoveLiquidity,
            5 => Self::RemoveLiquidityImbalance,
            6 => Self::RemoveLiquidityOneToken,
            7 => Self::SetSwapFee,
            8 => Self::SetAdminFee,
            9 => Self::SetLpCap,
            10 => Self::WithdrawAdminFees,
            11 => Self::RampA,
            12 => Self::StopRampA,
            _ => return Err(StableSwapError::InvalidInstructionData),
        })
    }
}

impl From<StableSwapInstruction> for u8 {
    fn from(ix: StableSwapInstruction) -> Self {
        ix as u8
    }
}

/// What a successful instruction did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionOutcome<const N: usize> {
    Initialized,
    Swapped(SwapQuote<N>),
    LiquidityAdded(LiquidityQuote<N>),
    LiquidityRemoved(LiquidityQuote<N>),
    AdminFeesWithdrawn([u128; N]),
    ParametersUpdated,
}
