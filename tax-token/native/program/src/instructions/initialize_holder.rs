use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

use super::shared::{create_pda_account, load_config, require_signer, require_writable, save};
use crate::{error::TaxTokenError, state::HolderAccount};

/// Accounts:
/// [signer, writable payer]
/// [readonly owner]
/// [readonly config]
/// [writable holder]
/// [readonly system program]
pub fn initialize_holder(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let payer = next_account_info(account_info_iter)?;
    let owner = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;
    let holder_account = next_account_info(account_info_iter)?;
    let system_prog = next_account_info(account_info_iter)?;

    require_signer(payer)?;
    require_writable(holder_account)?;
    let config = load_config(program_id, config_account)?;

    let seeds: &[&[u8]] = &[HolderAccount::SEED, config.mint.as_ref(), owner.key.as_ref()];
    let (holder_pda, holder_bump) = Pubkey::find_program_address(seeds, program_id);
    if holder_pda != *holder_account.key {
        return Err(TaxTokenError::InvalidPda.into());
    }

    msg!("Creating holder account for {}", owner.key);
    create_pda_account(
        program_id,
        payer,
        holder_account,
        system_prog,
        HolderAccount::LEN,
        seeds,
        holder_bump,
    )?;
    save(
        &HolderAccount::new(config.mint, *owner.key, holder_bump),
        holder_account,
    )?;

    Ok(())
}
