use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

use super::shared::{load_config, load_holder, load_pool, require_signer, save, HolderSet};
use crate::{error::TaxTokenError, events::TaxTokenEvent, tax};

/// Accounts:
/// [signer sender]
/// [readonly config]
/// [writable reward pool]
/// [writable sender holder]
/// [writable recipient holder]
pub fn transfer(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let sender = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let from_account = next_account_info(account_info_iter)?;
    let to_account = next_account_info(account_info_iter)?;

    require_signer(sender)?;
    let config = load_config(program_id, config_account)?;
    let mut pool = load_pool(program_id, pool_account, &config)?;

    let from_holder = load_holder(program_id, from_account, &config)?;
    if from_holder.owner != *sender.key {
        return Err(TaxTokenError::InvalidHolderAccount.into());
    }
    let to_holder = load_holder(program_id, to_account, &config)?;
    let recipient = to_holder.owner;

    let mut holders = HolderSet::new();
    holders.insert(from_account, from_holder);
    holders.insert(to_account, to_holder);

    let event = tax::transfer(&mut holders, &mut pool, &config, sender.key, &recipient, amount)?;

    holders.commit()?;
    save(&pool, pool_account)?;
    TaxTokenEvent::from(event).emit();
    Ok(())
}
