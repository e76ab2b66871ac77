//! Collaborator seams and instruction helpers.
//! The pool never moves tokens itself: custody goes through a `TokenLedger`
//! and admin gating through an `Authority`, both supplied per call.
use solana_address::Address;

use crate::helpers::errors::StableSwapError;

/// Fungible balances for every pooled token and the pool-share token.
pub trait TokenLedger {
    fn balance_of(&self, mint: &Address, owner: &Address) -> u128;
    fn transfer(&mut self, mint: &Address, from: &Address, to: &Address, amount: u128) -> Result<(), StableSwapError>;
    fn mint_to(&mut self, mint: &Address, to: &Address, amount: u128) -> Result<(), StableSwapError>;
    fn burn(&mut self, mint: &Address, from: &Address, amount: u128) -> Result<(), StableSwapError>;
}

/// Decides who may run admin instructions.
pub trait Authority {
    fn is_authorized(&self, caller: &Address) -> bool;
}

// A single owner.
impl Authority for Address {
    fn is_authorized(&self, caller: &Address) -> bool {
        self == caller
    }
}

/// Everything an instruction needs from outside the pool. `now` is the only
/// clock the engine sees.
pub struct InvokeContext<'a> {
    pub caller: &'a Address,
    pub now: i64,
    pub ledger: &'a mut dyn TokenLedger,
    pub authority: &'a dyn Authority,
}

// Signer checks for admin instructions.
pub struct SignerAccount;
impl SignerAccount {
    /// Confirm the caller passes the authority gate.
    pub fn check(ctx: &InvokeContext) -> Result<(), StableSwapError> {
        if !ctx.authority.is_authorized(ctx.caller) {
            return Err(StableSwapError::Unauthorized);
        }
        Ok(())
    }
}

pub struct Deadline;
impl Deadline {
    /// Operations run up to and including `deadline`.
    #[inline(always)]
    pub fn check(deadline: i64, now: i64) -> Result<(), StableSwapError> {
        if now > deadline {
            return Err(StableSwapError::Expired);
        }
        Ok(())
    }
}

// TOKEN OPERATIONS. Balances are checked up front so that no effect runs
// unless every transfer of the instruction can go through.
pub struct TokenAccount;
impl TokenAccount {
    pub fn check_funds(
        ledger: &dyn TokenLedger, mint: &Address, owner: &Address, amount: u128,
    ) -> Result<(), StableSwapError> {
        if ledger.balance_of(mint, owner) < amount {
            return Err(StableSwapError::InsufficientBalance);
        }
        Ok(())
    }

    pub fn transfer_tokens(
        ledger: &mut dyn TokenLedger, mint: &Address,
        from: &Address, to: &Address, amount: u128,
    ) -> Result<(), StableSwapError> {
        if amount == 0 {
            return Ok(());
        }
        ledger.transfer(mint, from, to, amount)
    }

    pub fn mint_tokens(
        ledger: &mut dyn TokenLedger, mint: &Address, to: &Address, amount: u128,
    ) -> Result<(), StableSwapError> {
        if amount == 0 {
            return Ok(());
        }
        ledger.mint_to(mint, to, amount)
    }

    pub fn burn_tokens(
        ledger: &mut dyn TokenLedger, mint: &Address, from: &Address, amount: u128,
    ) -> Result<(), StableSwapError> {
        if amount == 0 {
            return Ok(());
        }
        ledger.burn(mint, from, amount)
    }
}

/// Little-endian cursor over an instruction payload.
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take<const L: usize>(&mut self) -> Result<[u8; L], StableSwapError> {
        let end = self.offset.checked_add(L).ok_or(StableSwapError::InvalidInstructionData)?;
        let bytes: [u8; L] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(StableSwapError::InvalidInstructionData)?;
        self.offset = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, StableSwapError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_u64(&mut self) -> Result<u64, StableSwapError> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, StableSwapError> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, StableSwapError> {
        Ok(u128::from_le_bytes(self.take()?))
    }

    pub fn read_address(&mut self) -> Result<[u8; 32], StableSwapError> {
        self.take()
    }

    pub fn read_u8_array<const N: usize>(&mut self) -> Result<[u8; N], StableSwapError> {
        self.take()
    }

    pub fn read_u128_array<const N: usize>(&mut self) -> Result<[u128; N], StableSwapError> {
        let mut out = [0u128; N];
        for v in out.iter_mut() {
            *v = self.read_u128()?;
        }
        Ok(out)
    }

    pub fn read_address_array<const N: usize>(&mut self) -> Result<[[u8; 32]; N], StableSwapError> {
        let mut out = [[0u8; 32]; N];
        for v in out.iter_mut() {
            *v = self.read_address()?;
        }
        Ok(out)
    }

    /// Rejects trailing bytes.
    pub fn finish(self) -> Result<(), StableSwapError> {
        if self.offset != self.data.len() {
            return Err(StableSwapError::InvalidInstructionData);
        }
        Ok(())
    }
}
