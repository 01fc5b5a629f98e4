//! Holder balances and reward checkpoints.
//!
//! The core never touches account storage directly; it goes through
//! `LedgerStore` and `CheckpointStore`. On-chain the stores are backed by
//! holder PDAs, off-chain by `MemoryLedger`.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use crate::{error::TaxTokenError, state::HolderCheckpoint};

pub trait LedgerStore {
    /// Balance of `owner`, zero for unknown holders.
    fn balance(&self, owner: &Pubkey) -> u64;

    fn credit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError>;

    /// Fails with `InsufficientBalance` and leaves the balance untouched on shortfall.
    fn debit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError>;
}

pub trait CheckpointStore {
    /// Checkpoint of `owner`, the default (zeroed) checkpoint for unknown holders.
    fn checkpoint(&self, owner: &Pubkey) -> HolderCheckpoint;

    fn store_checkpoint(
        &mut self,
        owner: &Pubkey,
        checkpoint: HolderCheckpoint,
    ) -> Result<(), TaxTokenError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolderEntry {
    pub balance: u64,
    pub checkpoint: HolderCheckpoint,
}

/// In-memory ledger. Entries are created lazily on first credit or sync.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    holders: BTreeMap<Pubkey, HolderEntry>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self, owner: &Pubkey) -> Option<&HolderEntry> {
        self.holders.get(owner)
    }

    pub fn holders(&self) -> impl Iterator<Item = (&Pubkey, &HolderEntry)> {
        self.holders.iter()
    }

    /// Sum of all holder balances.
    pub fn total_balance(&self) -> Result<u64, TaxTokenError> {
        self.holders.values().try_fold(0u64, |acc, entry| {
            acc.checked_add(entry.balance)
                .ok_or(TaxTokenError::ArithmeticOverflow)
        })
    }
}

impl LedgerStore for MemoryLedger {
    fn balance(&self, owner: &Pubkey) -> u64 {
        self.holders.get(owner).map_or(0, |entry| entry.balance)
    }

    fn credit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError> {
        let entry = self.holders.entry(*owner).or_default();
        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        Ok(())
    }

    fn debit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError> {
        let current = self.balance(owner);
        if current < amount {
            return Err(TaxTokenError::InsufficientBalance);
        }
        if amount > 0 {
            self.holders.entry(*owner).or_default().balance = current - amount;
        }
        Ok(())
    }
}

impl CheckpointStore for MemoryLedger {
    fn checkpoint(&self, owner: &Pubkey) -> HolderCheckpoint {
        self.holders
            .get(owner)
            .map(|entry| entry.checkpoint)
            .unwrap_or_default()
    }

    fn store_checkpoint(
        &mut self,
        owner: &Pubkey,
        checkpoint: HolderCheckpoint,
    ) -> Result<(), TaxTokenError> {
        self.holders.entry(*owner).or_default().checkpoint = checkpoint;
        Ok(())
    }
}
