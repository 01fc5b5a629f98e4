//! In-memory tax token.
//!
//! Wires the config, ledger, tax, swap and distribution modules together the
//! same way the program instructions do, without any account plumbing.
//! Used for off-chain simulation and as the harness for property tests.

use std::collections::BTreeMap;

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    config::{self, InitializeParams},
    distribution,
    error::TaxTokenError,
    events::{RewardClaimed, TaxTokenEvent, TaxVaultSwept, TransferWithTax},
    ledger::{CheckpointStore, LedgerStore, MemoryLedger},
    state::{RewardPool, TokenConfig},
    swap::{self, SwapOracle},
    tax,
};

pub struct TaxToken<O, L = MemoryLedger> {
    config: Option<TokenConfig>,
    pool: RewardPool,
    ledger: L,
    oracle: O,
    payouts: BTreeMap<Pubkey, u64>,
    events: Vec<TaxTokenEvent>,
}

impl<O: SwapOracle> TaxToken<O, MemoryLedger> {
    pub fn new(oracle: O) -> Self {
        Self::with_ledger(oracle, MemoryLedger::new())
    }

    /// `sum(balances) + tax vault + units sold by sweeps == total supply`.
    pub fn supply_invariant_holds(&self) -> Result<bool, TaxTokenError> {
        let config = self.config()?;
        let accounted = self
            .ledger
            .total_balance()?
            .checked_add(self.pool.tax_vault)
            .and_then(|sum| sum.checked_add(self.pool.total_swapped_in))
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        Ok(accounted == config.total_supply)
    }
}

impl<O, L> TaxToken<O, L>
where
    O: SwapOracle,
    L: LedgerStore + CheckpointStore,
{
    pub fn with_ledger(oracle: O, ledger: L) -> Self {
        Self {
            config: None,
            pool: RewardPool::default(),
            ledger,
            oracle,
            payouts: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Creates the config, empty vaults, and credits the initial supply to `authority`.
    pub fn initialize(
        &mut self,
        mint: Pubkey,
        authority: Pubkey,
        params: InitializeParams,
        now: i64,
    ) -> Result<&TokenConfig, TaxTokenError> {
        if self.config.is_some() {
            return Err(TaxTokenError::AlreadyInitialized);
        }
        let config = params.into_config(mint, authority, 0)?;
        if config.total_supply > 0 {
            self.ledger.credit(&authority, config.total_supply)?;
        }
        msg!(
            "Initialized {} ({}) with supply {} and {} bps tax",
            config.name,
            config.symbol,
            config.total_supply,
            config.tax_rate_bps
        );
        self.pool = RewardPool::new(mint, 0, now);
        Ok(self.config.insert(config))
    }

    pub fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        amount: u64,
    ) -> Result<TransferWithTax, TaxTokenError> {
        let config = self.config.as_ref().ok_or(TaxTokenError::NotInitialized)?;
        let event = tax::transfer(&mut self.ledger, &mut self.pool, config, from, to, amount)?;
        self.record(event.clone().into());
        Ok(event)
    }

    pub fn sweep_tax_vault(
        &mut self,
        caller: &Pubkey,
        min_amount_out: u64,
        now: i64,
    ) -> Result<TaxVaultSwept, TaxTokenError> {
        let config = self.config.as_ref().ok_or(TaxTokenError::NotInitialized)?;
        let event = swap::sweep_tax_vault(
            &mut self.pool,
            config,
            &mut self.oracle,
            caller,
            min_amount_out,
            now,
        )?;
        self.record(event.clone().into());
        Ok(event)
    }

    pub fn claim(&mut self, owner: &Pubkey) -> Result<RewardClaimed, TaxTokenError> {
        if self.config.is_none() {
            return Err(TaxTokenError::NotInitialized);
        }
        let payouts = &mut self.payouts;
        let event = distribution::claim(&mut self.ledger, &mut self.pool, owner, |amount| {
            let paid = payouts.entry(*owner).or_default();
            *paid = paid
                .checked_add(amount)
                .ok_or(TaxTokenError::ArithmeticOverflow)?;
            Ok(())
        })?;
        self.record(event.clone().into());
        Ok(event)
    }

    pub fn update_tax_rate(
        &mut self,
        signer: &Pubkey,
        tax_rate_bps: u16,
    ) -> Result<(), TaxTokenError> {
        let config = self.config.as_mut().ok_or(TaxTokenError::NotInitialized)?;
        config::update_tax_rate(config, signer, tax_rate_bps)
    }

    pub fn set_paused(&mut self, signer: &Pubkey, paused: bool) -> Result<(), TaxTokenError> {
        let config = self.config.as_mut().ok_or(TaxTokenError::NotInitialized)?;
        config::set_paused(config, signer, paused)
    }

    pub fn config(&self) -> Result<&TokenConfig, TaxTokenError> {
        self.config.as_ref().ok_or(TaxTokenError::NotInitialized)
    }

    pub fn pool(&self) -> &RewardPool {
        &self.pool
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn balance(&self, owner: &Pubkey) -> u64 {
        self.ledger.balance(owner)
    }

    /// Reward claimable by `owner` right now.
    pub fn pending_reward(&self, owner: &Pubkey) -> Result<u64, TaxTokenError> {
        self.pool
            .accumulator
            .pending_reward(self.ledger.checkpoint(owner), self.ledger.balance(owner))
    }

    /// Total reference currency paid to `owner` by claims.
    pub fn paid_out(&self, owner: &Pubkey) -> u64 {
        self.payouts.get(owner).copied().unwrap_or(0)
    }

    pub fn circulating_supply(&self) -> Result<u64, TaxTokenError> {
        self.pool.circulating_supply(self.config()?.total_supply)
    }

    pub fn events(&self) -> &[TaxTokenEvent] {
        &self.events
    }

    fn record(&mut self, event: TaxTokenEvent) {
        event.emit();
        self.events.push(event);
    }
}
