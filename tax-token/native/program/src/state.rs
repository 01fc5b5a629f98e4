use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::TaxTokenError;

/// When a tax vault sweep may start.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepPolicy {
    /// Any non-empty vault may be swept.
    Unrestricted,
    /// The vault must hold at least `min_tax_vault` raw units.
    Threshold { min_tax_vault: u64 },
    /// At least `min_secs` must have passed since the last sweep.
    Interval { min_secs: i64 },
}

/// Fixed quote used by the on-chain swap reserve: `lamports_per_unit` lamports
/// for every `units_per_quote` raw token units.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRate {
    pub lamports_per_unit: u64,
    pub units_per_quote: u64,
}

/// Token configuration PDA
/// Seeds: ["token_config", mint]
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenConfig {
    pub is_initialized: bool,
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Tax charged on each transfer, in basis points
    pub tax_rate_bps: u16,
    /// Total minted supply in raw units
    pub total_supply: u64,
    pub tax_self_transfers: bool,
    pub paused: bool,
    pub sweep_policy: SweepPolicy,
    pub permissionless_sweep: bool,
    pub swap_rate: SwapRate,
    pub swap_timeout_secs: i64,
    pub bump: u8,
}

impl TokenConfig {
    // 1 + 32 + 32 + (4 + 32) + (4 + 10) + 1 + 2 + 8 + 1 + 1 + 9 + 1 + 16 + 8 + 1
    pub const LEN: usize = 163;
    pub const SEED: &'static [u8] = b"token_config";

    pub const MAX_NAME_LEN: usize = 32;
    pub const MAX_SYMBOL_LEN: usize = 10;

    /// 100% in basis points
    pub const MAX_TAX_RATE_BPS: u16 = 10_000;

    /// Default tax: 5% (500 basis points)
    pub const DEFAULT_TAX_RATE_BPS: u16 = 500;

    /// Default whole-token supply minted to the authority: 1B tokens
    pub const DEFAULT_SUPPLY_TOKENS: u64 = 1_000_000_000;

    /// Default sweep cadence: 5 minutes
    pub const DEFAULT_SWEEP_INTERVAL_SECS: i64 = 300;

    /// Default swap rate: 1 lamport per 1000 raw units
    pub const DEFAULT_SWAP_RATE: SwapRate = SwapRate {
        lamports_per_unit: 1,
        units_per_quote: 1_000,
    };

    pub const DEFAULT_SWAP_TIMEOUT_SECS: i64 = 60;
}

/// Per-holder reward checkpoint.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolderCheckpoint {
    /// Accumulator index at the last sync
    pub last_accumulator_value: u128,
    /// Whole reward units accrued and not yet claimed
    pub unclaimed_reward: u64,
    /// Scaled fraction of a reward unit carried between syncs
    pub reward_dust: u64,
}

impl HolderCheckpoint {
    pub const LEN: usize = 16 + 8 + 8;
}

/// Global reward-per-unit index, scaled by `accumulator::REWARD_SCALE`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardAccumulator {
    pub cumulative_reward_per_unit: u128,
    /// Scaled remainder of the last index division, folded into the next deposit
    pub remainder: u128,
    /// Rewards received while circulating supply was zero
    pub undistributed: u64,
}

impl RewardAccumulator {
    pub const LEN: usize = 16 + 16 + 8;
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwapState {
    #[default]
    Idle,
    Swapping { amount_in: u64 },
}

impl SwapState {
    pub const LEN: usize = 1 + 8;
}

/// Reward pool PDA. Holds both vault balances, the accumulator and the swap latch.
/// Seeds: ["reward_pool", mint]
///
/// The account's lamports above its rent-exempt minimum back `reward_vault`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardPool {
    pub is_initialized: bool,
    pub mint: Pubkey,
    /// Token units collected as tax, awaiting a sweep
    pub tax_vault: u64,
    /// Reference currency awaiting claims
    pub reward_vault: u64,
    pub accumulator: RewardAccumulator,
    pub swap_state: SwapState,
    pub last_sweep_ts: i64,
    pub total_tax_collected: u64,
    /// Tax units sold by sweeps. They are out of circulation for good.
    pub total_swapped_in: u64,
    pub total_rewards_deposited: u64,
    pub total_rewards_claimed: u64,
    pub bump: u8,
}

impl RewardPool {
    // 1 + 32 + 8 + 8 + 40 + 9 + 8 + 8 + 8 + 8 + 8 + 1
    pub const LEN: usize = 139;
    pub const SEED: &'static [u8] = b"reward_pool";

    pub fn new(mint: Pubkey, bump: u8, now: i64) -> Self {
        Self {
            is_initialized: true,
            mint,
            last_sweep_ts: now,
            bump,
            ..Self::default()
        }
    }

    /// Units held by holders: minted, minus sold by sweeps, minus the tax vault.
    pub fn circulating_supply(&self, total_supply: u64) -> Result<u64, TaxTokenError> {
        total_supply
            .checked_sub(self.total_swapped_in)
            .and_then(|held| held.checked_sub(self.tax_vault))
            .ok_or(TaxTokenError::ArithmeticOverflow)
    }
}

/// Holder PDA: balance plus reward checkpoint.
/// Seeds: ["holder", mint, owner]
///
/// The swap reserve PDA reuses the layout for its mint and bump; it never
/// holds a token balance.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct HolderAccount {
    pub is_initialized: bool,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub balance: u64,
    pub checkpoint: HolderCheckpoint,
    pub bump: u8,
}

impl HolderAccount {
    // 1 + 32 + 32 + 8 + 32 + 1
    pub const LEN: usize = 106;
    pub const SEED: &'static [u8] = b"holder";
    pub const RESERVE_SEED: &'static [u8] = b"swap_reserve";

    pub fn new(mint: Pubkey, owner: Pubkey, bump: u8) -> Self {
        Self {
            is_initialized: true,
            mint,
            owner,
            bump,
            ..Self::default()
        }
    }
}

/// Reads a borsh value from the front of an account buffer, ignoring trailing padding.
pub fn load<T: BorshDeserialize>(data: &[u8]) -> Result<T, TaxTokenError> {
    T::deserialize(&mut &data[..]).map_err(|_| TaxTokenError::SerializationError)
}

/// Writes a borsh value to the front of an account buffer.
pub fn store<T: BorshSerialize>(value: &T, data: &mut [u8]) -> Result<(), TaxTokenError> {
    value
        .serialize(&mut &mut data[..])
        .map_err(|_| TaxTokenError::SerializationError)
}
