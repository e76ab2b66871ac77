//! Initializes the pool: registers the pooled token mints and their
//! decimals, the pool-share mint and the custody vault, the starting A and
//! both fee rates. The pool moves from uninitialized to active exactly once.
use pinocchio_log::log;

use crate::config::Pool;
use crate::helpers::errors::StableSwapError;
use crate::helpers::utils::{InstructionReader, InvokeContext, SignerAccount};
use crate::instructions::InstructionOutcome;

pub struct InitializeInstructionData<const N: usize> {
    pub mints: [[u8; 32]; N], // Pooled token mints, in swap-index order.
    pub decimals: [u8; N], // Native decimals of each pooled token.
    pub a: u64, // Starting amplification, unscaled.
    pub swap_fee: u128, // Parts of 1e10.
    pub admin_fee: u128, // Share of the swap fee kept for the admin, parts of 1e10.
    pub lp_mint: [u8; 32],
    pub vault: [u8; 32],
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for InitializeInstructionData<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let mut reader = InstructionReader::new(data);
        let mints = reader.read_address_array::<N>()?;
        let decimals = reader.read_u8_array::<N>()?;
        let a = reader.read_u64()?;
        let swap_fee = reader.read_u128()?;
        let admin_fee = reader.read_u128()?;
        let lp_mint = reader.read_address()?;
        let vault = reader.read_address()?;
        reader.finish()?;

        Ok(Self { mints, decimals, a, swap_fee, admin_fee, lp_mint, vault })
    }
}

pub struct Initialize<const N: usize> {
    pub instruction_data: InitializeInstructionData<N>,
}

impl<'a, const N: usize> TryFrom<&'a [u8]> for Initialize<N> {
    type Error = StableSwapError;
    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let instruction_data = InitializeInstructionData::try_from(data)?;
        Ok(Self { instruction_data })
    }
}

impl<const N: usize> Initialize<N> {
    pub fn process(&self, pool: &mut Pool<N>, ctx: &mut InvokeContext) -> Result<InstructionOutcome<N>, StableSwapError> {
        SignerAccount::check(ctx)?;

        let data = &self.instruction_data;
        let mut next = *pool;
        next.set_inner(
            &data.mints, &data.decimals, data.a,
            data.swap_fee, data.admin_fee, data.lp_mint, data.vault,
        )?;
        *pool = next;

        log!("Initialize: tokens {} a {} fee {}", N, data.a, data.swap_fee);
        Ok(InstructionOutcome::Initialized)
    }
}
