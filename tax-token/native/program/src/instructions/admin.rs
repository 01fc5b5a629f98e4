use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

use super::shared::{load_config, require_signer, require_writable, save};
use crate::config;

/// Accounts:
/// [signer authority]
/// [writable config]
pub fn update_tax_rate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    tax_rate_bps: u16,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let authority = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;

    require_signer(authority)?;
    require_writable(config_account)?;
    let mut token_config = load_config(program_id, config_account)?;
    config::update_tax_rate(&mut token_config, authority.key, tax_rate_bps)?;
    save(&token_config, config_account)?;
    Ok(())
}

/// Accounts:
/// [signer authority]
/// [writable config]
pub fn set_paused(program_id: &Pubkey, accounts: &[AccountInfo], paused: bool) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let authority = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;

    require_signer(authority)?;
    require_writable(config_account)?;
    let mut token_config = load_config(program_id, config_account)?;
    config::set_paused(&mut token_config, authority.key, paused)?;
    save(&token_config, config_account)?;
    Ok(())
}
