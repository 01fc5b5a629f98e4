//! Transfer taxation.

use solana_program::{msg, pubkey::Pubkey};

use crate::{
    config::{ConfigStore, validate_tax_rate},
    error::TaxTokenError,
    events::TransferWithTax,
    ledger::{CheckpointStore, LedgerStore},
    state::RewardPool,
};

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Gross amount split into tax and the net amount the recipient receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaxSplit {
    pub gross: u64,
    pub tax: u64,
    pub net: u64,
}

impl TaxSplit {
    /// `tax = floor(amount * tax_rate_bps / 10000)`, computed in u128.
    pub fn compute(amount: u64, tax_rate_bps: u16) -> Result<Self, TaxTokenError> {
        if amount == 0 {
            return Err(TaxTokenError::InvalidAmount);
        }
        validate_tax_rate(tax_rate_bps)?;

        let tax = (amount as u128)
            .checked_mul(tax_rate_bps as u128)
            .ok_or(TaxTokenError::ArithmeticOverflow)?
            / BPS_DENOMINATOR;
        let tax = u64::try_from(tax).map_err(|_| TaxTokenError::ArithmeticOverflow)?;
        let net = amount
            .checked_sub(tax)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;

        Ok(Self {
            gross: amount,
            tax,
            net,
        })
    }
}

/// Moves `amount` from `from` to `to`, diverting the tax share into the pool's tax vault.
///
/// Both parties are synced against the accumulator with their pre-transfer
/// balances. Every check runs before the first write.
pub fn transfer<S, C>(
    store: &mut S,
    pool: &mut RewardPool,
    config: &C,
    from: &Pubkey,
    to: &Pubkey,
    amount: u64,
) -> Result<TransferWithTax, TaxTokenError>
where
    S: LedgerStore + CheckpointStore,
    C: ConfigStore,
{
    if config.is_paused() {
        return Err(TaxTokenError::TransfersPaused);
    }

    let self_transfer = from == to;
    let tax_rate_bps = if self_transfer && !config.tax_self_transfers() {
        0
    } else {
        config.tax_rate_bps()
    };
    let split = TaxSplit::compute(amount, tax_rate_bps)?;

    let from_balance = store.balance(from);
    if from_balance < amount {
        return Err(TaxTokenError::InsufficientBalance);
    }

    let from_checkpoint = pool
        .accumulator
        .sync(store.checkpoint(from), from_balance)?;
    let to_checkpoint = if self_transfer {
        None
    } else {
        let to_balance = store.balance(to);
        to_balance
            .checked_add(split.net)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        Some(pool.accumulator.sync(store.checkpoint(to), to_balance)?)
    };
    let tax_vault = pool
        .tax_vault
        .checked_add(split.tax)
        .ok_or(TaxTokenError::ArithmeticOverflow)?;

    store.store_checkpoint(from, from_checkpoint)?;
    if let Some(checkpoint) = to_checkpoint {
        store.store_checkpoint(to, checkpoint)?;
    }
    if self_transfer {
        store.debit(from, split.tax)?;
    } else {
        store.debit(from, split.gross)?;
        store.credit(to, split.net)?;
    }
    pool.tax_vault = tax_vault;
    pool.total_tax_collected = pool.total_tax_collected.saturating_add(split.tax);

    msg!(
        "Transferred {} ({} net, {} tax) from {} to {}",
        split.gross,
        split.net,
        split.tax,
        from,
        to
    );

    Ok(TransferWithTax {
        from: *from,
        to: *to,
        gross: split.gross,
        tax: split.tax,
        net: split.net,
    })
}
