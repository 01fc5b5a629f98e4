//! Reward claims.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::TaxTokenError,
    events::RewardClaimed,
    ledger::{CheckpointStore, LedgerStore},
    state::RewardPool,
};

/// Pays `owner` everything accrued up to the current accumulator index.
///
/// `pay` moves the reference currency to the owner. It runs after every
/// check passed and before any state is written; if it fails nothing changes.
pub fn claim<S, F>(
    store: &mut S,
    pool: &mut RewardPool,
    owner: &Pubkey,
    pay: F,
) -> Result<RewardClaimed, TaxTokenError>
where
    S: LedgerStore + CheckpointStore,
    F: FnOnce(u64) -> Result<(), TaxTokenError>,
{
    let balance = store.balance(owner);
    let mut checkpoint = pool.accumulator.sync(store.checkpoint(owner), balance)?;
    let amount = checkpoint.unclaimed_reward;
    if amount == 0 {
        return Err(TaxTokenError::NothingToClaim);
    }
    let reward_vault = match pool.reward_vault.checked_sub(amount) {
        Some(remaining) => remaining,
        None => {
            msg!(
                "Claim of {} exceeds reward vault balance {}",
                amount,
                pool.reward_vault
            );
            return Err(TaxTokenError::InsufficientVaultBalance.report());
        }
    };

    pay(amount)?;

    checkpoint.unclaimed_reward = 0;
    store.store_checkpoint(owner, checkpoint)?;
    pool.reward_vault = reward_vault;
    pool.total_rewards_claimed = pool.total_rewards_claimed.saturating_add(amount);

    msg!("Claimed {} reward units for {}", amount, owner);
    Ok(RewardClaimed {
        owner: *owner,
        amount,
    })
}
