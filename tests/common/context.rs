//! This is a shared context across tests.
use std::collections::BTreeMap;

use solana_address::Address;
use stableswap_engine::config::Pool;
use stableswap_engine::helpers::errors::StableSwapError;
use stableswap_engine::helpers::utils::{InvokeContext, TokenLedger};
use stableswap_engine::instructions::InstructionOutcome;
use stableswap_engine::process_instruction;

pub type Key = [u8; 32];

pub const OWNER: Key = [0xA1; 32];
pub const ALICE: Key = [0xB2; 32];
pub const BOB: Key = [0xC3; 32];
pub const CAROL: Key = [0xD4; 32];

pub const DAI: Key = [0x01; 32];
pub const USDC: Key = [0x02; 32];
pub const USDT: Key = [0x03; 32];
pub const LP_MINT: Key = [0x0F; 32];
pub const VAULT: Key = [0xEE; 32];

pub fn address(key: Key) -> Address {
    Address::new_from_array(key)
}

fn key(address: &Address) -> Key {
    let mut out = [0u8; 32];
    out.copy_from_slice(address.as_ref());
    out
}

/// In-memory token balances keyed by (mint, owner), plus per-mint supply.
#[derive(Default, Clone)]
pub struct MemoryLedger {
    balances: BTreeMap<(Key, Key), u128>,
    supply: BTreeMap<Key, u128>,
}

impl MemoryLedger {
    pub fn balance(&self, mint: Key, owner: Key) -> u128 {
        self.balances.get(&(mint, owner)).copied().unwrap_or(0)
    }

    pub fn supply(&self, mint: Key) -> u128 {
        self.supply.get(&mint).copied().unwrap_or(0)
    }

    pub fn fund(&mut self, mint: Key, owner: Key, amount: u128) {
        *self.balances.entry((mint, owner)).or_insert(0) += amount;
        *self.supply.entry(mint).or_insert(0) += amount;
    }
}

impl TokenLedger for MemoryLedger {
    fn balance_of(&self, mint: &Address, owner: &Address) -> u128 {
        self.balance(key(mint), key(owner))
    }

    fn transfer(&mut self, mint: &Address, from: &Address, to: &Address, amount: u128) -> Result<(), StableSwapError> {
        let (mint, from, to) = (key(mint), key(from), key(to));
        let source = self.balances.entry((mint, from)).or_insert(0);
        *source = source.checked_sub(amount).ok_or(StableSwapError::InsufficientBalance)?;
        *self.balances.entry((mint, to)).or_insert(0) += amount;
        Ok(())
    }

    fn mint_to(&mut self, mint: &Address, to: &Address, amount: u128) -> Result<(), StableSwapError> {
        self.fund(key(mint), key(to), amount);
        Ok(())
    }

    fn burn(&mut self, mint: &Address, from: &Address, amount: u128) -> Result<(), StableSwapError> {
        let (mint, from) = (key(mint), key(from));
        let holder = self.balances.entry((mint, from)).or_insert(0);
        *holder = holder.checked_sub(amount).ok_or(StableSwapError::InsufficientBalance)?;
        *self.supply.entry(mint).or_insert(0) -= amount;
        Ok(())
    }
}

pub struct PoolTestContext {
    pub pool: Pool<3>,
    pub ledger: MemoryLedger,
    pub owner: Address,
    pub now: i64,
}

impl PoolTestContext {
    pub fn new(now: i64) -> Self {
        Self {
            pool: Pool::new(),
            ledger: MemoryLedger::default(),
            owner: address(OWNER),
            now,
        }
    }

    /// Runs one instruction as `caller` at the context's current time.
    pub fn invoke(&mut self, caller: Key, data: &[u8]) -> Result<InstructionOutcome<3>, StableSwapError> {
        let caller = address(caller);
        let mut ctx = InvokeContext {
            caller: &caller,
            now: self.now,
            ledger: &mut self.ledger,
            authority: &self.owner,
        };
        process_instruction(&mut self.pool, &mut ctx, data)
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }
}
