//! Admin instructions: fee rates, LP cap, admin-fee withdrawal and the
//! amplification ramp. Every one of them requires an authorized caller.
use pinocchio_log::log;

use crate::config::Pool;
use crate::helpers::errors::StableSwapError;
use crate::helpers::utils::{InstructionReader, InvokeContext, SignerAccount, TokenAccount};
use crate::instructions::InstructionOutcome;

// Payload of the setters that take one rate or cap.
pub struct SetValueInstructionData {
    pub value: u128,
}

impl<'a> TryFrom<&'a [u8]> for SetValueInstructionData {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let value = reader.read_u128()?;
        reader.finish()?;
        Ok(Self { value })
    }
}

pub struct SetSwapFee {
    pub instruction_data: SetValueInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for SetSwapFee {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        Ok(Self { instruction_data: SetValueInstructionData::try_from(data)? })
    }
}

impl SetSwapFee {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;
        pool.set_swap_fee(self.instruction_data.value)?;
        log!("SetSwapFee: {}", self.instruction_data.value);
        Ok(InstructionOutcome::ParametersUpdated)
    }
}

pub struct SetAdminFee {
    pub instruction_data: SetValueInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for SetAdminFee {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        Ok(Self { instruction_data: SetValueInstructionData::try_from(data)? })
    }
}

impl SetAdminFee {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;
        pool.set_admin_fee(self.instruction_data.value)?;
        log!("SetAdminFee: {}", self.instruction_data.value);
        Ok(InstructionOutcome::ParametersUpdated)
    }
}

pub struct SetLpCap {
    pub instruction_data: SetValueInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for SetLpCap {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        Ok(Self { instruction_data: SetValueInstructionData::try_from(data)? })
    }
}

impl SetLpCap {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;
        pool.set_lp_cap(self.instruction_data.value);
        log!("SetLpCap: {}", self.instruction_data.value);
        Ok(InstructionOutcome::ParametersUpdated)
    }
}

/// Sends every accrued admin fee from the vault to the caller. Calling it
/// with nothing accrued moves nothing.
pub struct WithdrawAdminFees;

impl<'a> TryFrom<&'a [u8]> for WithdrawAdminFees {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        InstructionReader::new(data).finish()?;
        Ok(Self)
    }
}

impl WithdrawAdminFees {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;

        let vault = pool.vault();
        let mut next = *pool;
        let owed = next.take_admin_fees();
        for (token, &amount) in pool.tokens().iter().zip(owed.iter()) {
            TokenAccount::check_funds(&*ctx.ledger, &token.mint(), &vault, amount)?;
        }
        for (token, &amount) in pool.tokens().iter().zip(owed.iter()) {
            TokenAccount::transfer_tokens(ctx.ledger, &token.mint(), &vault, ctx.caller, amount)?;
            log!("WithdrawAdminFees: {}", amount);
        }
        *pool = next;
        Ok(InstructionOutcome::AdminFeesWithdrawn(owed))
    }
}

pub struct RampAInstructionData {
    pub future_a: u64,
    pub future_time: i64,
}

impl<'a> TryFrom<&'a [u8]> for RampAInstructionData {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let future_a = reader.read_u64()?;
        let future_time = reader.read_i64()?;
        reader.finish()?;
        Ok(Self { future_a, future_time })
    }
}

pub struct RampA {
    pub instruction_data: RampAInstructionData,
}

impl<'a> TryFrom<&'a [u8]> for RampA {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        Ok(Self { instruction_data: RampAInstructionData::try_from(data)? })
    }
}

impl RampA {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;
        pool.ramp_mut().ramp_to(self.instruction_data.future_a, self.instruction_data.future_time, ctx.now)?;
        log!("RampA: to {} at {}", self.instruction_data.future_a, self.instruction_data.future_time);
        Ok(InstructionOutcome::ParametersUpdated)
    }
}

pub struct StopRampA;

impl<'a> TryFrom<&'a [u8]> for StopRampA {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        InstructionReader::new(data).finish()?;
        Ok(Self)
    }
}

impl StopRampA {
    pub fn process<const N: usize>(
        &self, pool: &mut Pool<N>, ctx: &mut InvokeContext,
    ) -> Result<InstructionOutcome<N>, StableSwapError> {
        pool.require_active()?;
        SignerAccount::check(ctx)?;
        pool.ramp_mut().stop_ramp(ctx.now)?;
        log!("StopRampA: a {}", pool.get_a_precise(ctx.now));
        Ok(InstructionOutcome::ParametersUpdated)
    }
}
