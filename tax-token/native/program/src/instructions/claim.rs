use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

use super::shared::{
    load_config, load_holder, load_pool, move_lamports, require_signer, require_writable, save,
    HolderSet,
};
use crate::{distribution, error::TaxTokenError, events::TaxTokenEvent};

/// Accounts:
/// [signer, writable owner]
/// [readonly config]
/// [writable reward pool]
/// [writable owner holder]
pub fn claim(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let owner = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let holder_account = next_account_info(account_info_iter)?;

    require_signer(owner)?;
    require_writable(owner)?;
    let config = load_config(program_id, config_account)?;
    let mut pool = load_pool(program_id, pool_account, &config)?;
    let holder = load_holder(program_id, holder_account, &config)?;
    if holder.owner != *owner.key {
        return Err(TaxTokenError::InvalidHolderAccount.into());
    }

    let mut holders = HolderSet::new();
    holders.insert(holder_account, holder);

    let event = distribution::claim(&mut holders, &mut pool, owner.key, |amount| {
        move_lamports(pool_account, owner, amount)
    })?;

    holders.commit()?;
    save(&pool, pool_account)?;
    TaxTokenEvent::from(event).emit();
    Ok(())
}
