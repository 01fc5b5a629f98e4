//! Reward-per-unit accumulator.
//!
//! Every reward deposit raises a global index by `amount * REWARD_SCALE /
//! circulating_supply`. A holder's accrual since their last sync is
//! `(index - checkpoint) * balance / REWARD_SCALE`, so no operation ever
//! iterates holders. Checkpoints must be synced with the balance a holder had
//! *before* any mutation that changes it.
//!
//! Truncation is contained on both sides: the division remainder of each
//! deposit is folded into the next one, and each checkpoint carries the
//! sub-unit fraction of its last sync (`reward_dust`).

use crate::{
    error::TaxTokenError,
    state::{HolderCheckpoint, RewardAccumulator},
};

/// Fixed-point scale of the accumulator index.
pub const REWARD_SCALE: u128 = 1 << 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepositOutcome {
    /// The index advanced; `amount` includes rewards held back from earlier
    /// zero-supply deposits.
    Distributed { amount: u64, per_unit_increase: u128 },
    /// Circulating supply was zero; the reward waits for the next deposit.
    Deferred { undistributed: u64 },
}

impl RewardAccumulator {
    pub fn index(&self) -> u128 {
        self.cumulative_reward_per_unit
    }

    /// Records `amount` reward units arriving in the reward vault.
    ///
    /// `circulating_supply` excludes vault-held tokens, which never accrue.
    pub fn on_reward_deposit(
        &mut self,
        amount: u64,
        circulating_supply: u64,
    ) -> Result<DepositOutcome, TaxTokenError> {
        if circulating_supply == 0 {
            let undistributed = self
                .undistributed
                .checked_add(amount)
                .ok_or(TaxTokenError::ArithmeticOverflow)?;
            self.undistributed = undistributed;
            return Ok(DepositOutcome::Deferred { undistributed });
        }

        let pending = amount
            .checked_add(self.undistributed)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        let numerator = (pending as u128)
            .checked_mul(REWARD_SCALE)
            .and_then(|scaled| scaled.checked_add(self.remainder))
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        let supply = circulating_supply as u128;
        let per_unit_increase = numerator / supply;
        let index = self
            .cumulative_reward_per_unit
            .checked_add(per_unit_increase)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;

        self.cumulative_reward_per_unit = index;
        self.remainder = numerator % supply;
        self.undistributed = 0;

        Ok(DepositOutcome::Distributed {
            amount: pending,
            per_unit_increase,
        })
    }

    /// Settles everything `balance` earned since `checkpoint` was last synced.
    ///
    /// Pure: the caller decides when to persist the returned checkpoint.
    pub fn sync(
        &self,
        checkpoint: HolderCheckpoint,
        balance: u64,
    ) -> Result<HolderCheckpoint, TaxTokenError> {
        let delta = self
            .cumulative_reward_per_unit
            .checked_sub(checkpoint.last_accumulator_value)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        let scaled = delta
            .checked_mul(balance as u128)
            .and_then(|owed| owed.checked_add(checkpoint.reward_dust as u128))
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        let owed =
            u64::try_from(scaled / REWARD_SCALE).map_err(|_| TaxTokenError::ArithmeticOverflow)?;
        let unclaimed_reward = checkpoint
            .unclaimed_reward
            .checked_add(owed)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;

        Ok(HolderCheckpoint {
            last_accumulator_value: self.cumulative_reward_per_unit,
            unclaimed_reward,
            // always below REWARD_SCALE == 2^64
            reward_dust: (scaled % REWARD_SCALE) as u64,
        })
    }

    /// Claimable amount for a holder without touching their checkpoint.
    pub fn pending_reward(
        &self,
        checkpoint: HolderCheckpoint,
        balance: u64,
    ) -> Result<u64, TaxTokenError> {
        Ok(self.sync(checkpoint, balance)?.unclaimed_reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_is_split_proportionally() {
        let mut acc = RewardAccumulator::default();
        let outcome = acc.on_reward_deposit(4_000, 400).unwrap();
        assert!(matches!(outcome, DepositOutcome::Distributed { amount: 4_000, .. }));

        let a = acc.sync(HolderCheckpoint::default(), 100).unwrap();
        let b = acc.sync(HolderCheckpoint::default(), 300).unwrap();
        assert_eq!(a.unclaimed_reward, 1_000);
        assert_eq!(b.unclaimed_reward, 3_000);
        assert_eq!(a.last_accumulator_value, acc.index());
    }

    #[test]
    fn sync_is_idempotent_without_new_deposits() {
        let mut acc = RewardAccumulator::default();
        acc.on_reward_deposit(10, 3).unwrap();

        let once = acc.sync(HolderCheckpoint::default(), 1).unwrap();
        let twice = acc.sync(once, 1).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.unclaimed_reward, 3);
    }

    #[test]
    fn zero_supply_deposit_is_deferred_then_distributed() {
        let mut acc = RewardAccumulator::default();
        assert_eq!(
            acc.on_reward_deposit(500, 0).unwrap(),
            DepositOutcome::Deferred { undistributed: 500 }
        );
        assert_eq!(acc.index(), 0);

        let outcome = acc.on_reward_deposit(100, 200).unwrap();
        assert!(matches!(outcome, DepositOutcome::Distributed { amount: 600, .. }));
        assert_eq!(acc.undistributed, 0);

        let holder = acc.sync(HolderCheckpoint::default(), 200).unwrap();
        assert_eq!(holder.unclaimed_reward, 600);
    }

    #[test]
    fn many_tiny_deposits_lose_at_most_one_unit() {
        // 10% holder of a 1e18 supply, 10_000 one-unit deposits: exact share is 1_000.
        let supply = 1_000_000_000_000_000_000u64;
        let small = supply / 10;
        let large = supply - small;

        let mut acc = RewardAccumulator::default();
        let mut synced_each_time = HolderCheckpoint::default();
        for _ in 0..10_000 {
            acc.on_reward_deposit(1, supply).unwrap();
            synced_each_time = acc.sync(synced_each_time, small).unwrap();
        }
        let synced_once = acc.sync(HolderCheckpoint::default(), small).unwrap();
        let whale = acc.sync(HolderCheckpoint::default(), large).unwrap();

        assert_eq!(synced_each_time.unclaimed_reward, synced_once.unclaimed_reward);
        assert!(1_000 - synced_once.unclaimed_reward <= 1);
        assert!(9_000 - whale.unclaimed_reward <= 1);
        assert!(synced_once.unclaimed_reward + whale.unclaimed_reward <= 10_000);
    }

    #[test]
    fn uneven_supply_never_over_attributes() {
        // 7 units over 3 holders of 1 each, deposited one unit at a time.
        let mut acc = RewardAccumulator::default();
        for _ in 0..7 {
            acc.on_reward_deposit(1, 3).unwrap();
        }
        let each = acc.sync(HolderCheckpoint::default(), 1).unwrap();
        assert_eq!(each.unclaimed_reward, 2);
        assert!(3 * each.unclaimed_reward <= 7);
    }

    #[test]
    fn pending_reward_does_not_advance_checkpoint() {
        let mut acc = RewardAccumulator::default();
        acc.on_reward_deposit(50, 50).unwrap();
        let checkpoint = HolderCheckpoint::default();
        assert_eq!(acc.pending_reward(checkpoint, 10).unwrap(), 10);
        assert_eq!(checkpoint.last_accumulator_value, 0);
    }
}
