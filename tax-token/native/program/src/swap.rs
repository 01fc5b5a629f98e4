//! Tax vault sweeps.
//!
//! A sweep sells the whole tax vault to an external venue and deposits the
//! proceeds as holder rewards. The venue is opaque: anything implementing
//! `SwapOracle`. A latch (`SwapState`) allows one sweep at a time.

use solana_program::{msg, pubkey::Pubkey};
use thiserror::Error;

use crate::{
    accumulator::DepositOutcome,
    config::ConfigStore,
    error::TaxTokenError,
    events::TaxVaultSwept,
    state::{RewardAccumulator, RewardPool, SwapRate, SwapState, SweepPolicy},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub amount_in: u64,
    pub min_amount_out: u64,
    /// Unix timestamp after which the venue must refuse the swap
    pub deadline: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SwapFailure {
    #[error("slippage exceeded: quoted {quoted}, minimum {minimum}")]
    SlippageExceeded { quoted: u64, minimum: u64 },
    #[error("venue liquidity unavailable")]
    LiquidityUnavailable,
    #[error("swap deadline passed")]
    Timeout,
}

/// External exchange venue. A failed swap must have no effects.
pub trait SwapOracle {
    /// Counterparty reported in sweep events. It never receives a ledger balance.
    fn venue(&self) -> Pubkey;

    /// Sells `request.amount_in` tokens, returning the reference-currency output.
    fn swap(&mut self, request: &SwapRequest) -> Result<u64, SwapFailure>;
}

impl SwapRate {
    /// Output for `amount_in` tokens at this rate, `None` if it does not fit in u64.
    pub fn quote(&self, amount_in: u64) -> Option<u64> {
        if self.units_per_quote == 0 {
            return None;
        }
        let out = (amount_in as u128).checked_mul(self.lamports_per_unit as u128)?
            / self.units_per_quote as u128;
        u64::try_from(out).ok()
    }
}

/// Venue quoting a fixed rate out of a finite liquidity balance.
#[derive(Clone, Debug)]
pub struct FixedRateOracle {
    pub venue: Pubkey,
    pub rate: SwapRate,
    pub liquidity: u64,
}

impl FixedRateOracle {
    pub fn new(venue: Pubkey, rate: SwapRate, liquidity: u64) -> Self {
        Self {
            venue,
            rate,
            liquidity,
        }
    }
}

impl SwapOracle for FixedRateOracle {
    fn venue(&self) -> Pubkey {
        self.venue
    }

    fn swap(&mut self, request: &SwapRequest) -> Result<u64, SwapFailure> {
        let quoted = self
            .rate
            .quote(request.amount_in)
            .ok_or(SwapFailure::LiquidityUnavailable)?;
        if quoted < request.min_amount_out {
            return Err(SwapFailure::SlippageExceeded {
                quoted,
                minimum: request.min_amount_out,
            });
        }
        self.liquidity = self
            .liquidity
            .checked_sub(quoted)
            .ok_or(SwapFailure::LiquidityUnavailable)?;
        Ok(quoted)
    }
}

impl SwapState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SwapState::Idle)
    }

    /// `Idle -> Swapping`. Fails while another swap holds the latch.
    pub fn begin(&mut self, amount_in: u64) -> Result<(), TaxTokenError> {
        if !self.is_idle() {
            return Err(TaxTokenError::SwapInProgress);
        }
        *self = SwapState::Swapping { amount_in };
        Ok(())
    }

    /// Returns to `Idle`, yielding the amount recorded on entry.
    pub fn release(&mut self) -> u64 {
        let amount_in = match *self {
            SwapState::Swapping { amount_in } => amount_in,
            SwapState::Idle => 0,
        };
        *self = SwapState::Idle;
        amount_in
    }
}

pub fn ensure_sweep_due(
    policy: SweepPolicy,
    pool: &RewardPool,
    now: i64,
) -> Result<(), TaxTokenError> {
    let due = match policy {
        SweepPolicy::Unrestricted => true,
        SweepPolicy::Threshold { min_tax_vault } => pool.tax_vault >= min_tax_vault,
        SweepPolicy::Interval { min_secs } => now >= pool.last_sweep_ts.saturating_add(min_secs),
    };
    if !due {
        return Err(TaxTokenError::SweepNotDue);
    }
    Ok(())
}

/// Swaps the entire tax vault through `oracle` and deposits the proceeds as rewards.
///
/// Sold units are out of circulation afterwards: they stay counted in
/// `total_swapped_in` and never accrue rewards.
///
/// On oracle failure the vaults are untouched, the latch is released and
/// `SwapFailed` is returned. Retrying is left to the caller.
pub fn sweep_tax_vault<C, O>(
    pool: &mut RewardPool,
    config: &C,
    oracle: &mut O,
    caller: &Pubkey,
    min_amount_out: u64,
    now: i64,
) -> Result<TaxVaultSwept, TaxTokenError>
where
    C: ConfigStore,
    O: SwapOracle,
{
    if !config.permissionless_sweep() && *caller != config.authority() {
        return Err(TaxTokenError::Unauthorized);
    }
    if !pool.swap_state.is_idle() {
        return Err(TaxTokenError::SwapInProgress);
    }
    let amount_in = pool.tax_vault;
    if amount_in == 0 {
        return Err(TaxTokenError::NothingToSwap);
    }
    ensure_sweep_due(config.sweep_policy(), pool, now)?;

    let venue = oracle.venue();
    // sold units leave circulation, and the vault is emptied by this sweep
    let total_swapped_in = pool
        .total_swapped_in
        .checked_add(amount_in)
        .ok_or(TaxTokenError::ArithmeticOverflow)?;
    let circulating_supply = config
        .total_supply()
        .checked_sub(total_swapped_in)
        .ok_or(TaxTokenError::ArithmeticOverflow)?;

    pool.swap_state.begin(amount_in)?;
    msg!("Swapping {} tax units through venue {}", amount_in, venue);

    let request = SwapRequest {
        amount_in,
        min_amount_out,
        deadline: now.saturating_add(config.swap_timeout_secs()),
    };
    let amount_out = match oracle.swap(&request) {
        Ok(amount_out) => amount_out,
        Err(failure) => {
            pool.swap_state.release();
            msg!("Swap of {} tax units failed: {}", amount_in, failure);
            return Err(TaxTokenError::SwapFailed);
        }
    };

    let settled = settle_proceeds(pool, amount_out, circulating_supply);
    let (reward_vault, accumulator, outcome) = match settled {
        Ok(settled) => settled,
        Err(err) => {
            pool.swap_state.release();
            return Err(err);
        }
    };

    pool.tax_vault = 0;
    pool.reward_vault = reward_vault;
    pool.accumulator = accumulator;
    pool.total_swapped_in = total_swapped_in;
    pool.total_rewards_deposited = pool.total_rewards_deposited.saturating_add(amount_out);
    pool.last_sweep_ts = now;
    pool.swap_state.release();

    let distributed = matches!(outcome, DepositOutcome::Distributed { .. });
    if !distributed {
        msg!("Circulating supply is zero, holding {} reward units back", amount_out);
    }
    msg!("Swept {} tax units for {} reward units", amount_in, amount_out);

    Ok(TaxVaultSwept {
        venue,
        amount_in,
        amount_out,
        reward_per_unit: pool.accumulator.index(),
        distributed,
    })
}

fn settle_proceeds(
    pool: &RewardPool,
    amount_out: u64,
    circulating_supply: u64,
) -> Result<(u64, RewardAccumulator, DepositOutcome), TaxTokenError> {
    let reward_vault = pool
        .reward_vault
        .checked_add(amount_out)
        .ok_or(TaxTokenError::ArithmeticOverflow)?;
    let mut accumulator = pool.accumulator;
    let outcome = accumulator.on_reward_deposit(amount_out, circulating_supply)?;
    Ok((reward_vault, accumulator, outcome))
}
