use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
    sysvar::{Sysvar, clock::Clock},
};

use super::shared::{create_pda_account, require_signer, require_writable, save};
use crate::{
    config::InitializeParams,
    error::TaxTokenError,
    state::{HolderAccount, RewardPool, TokenConfig},
};

/// Accounts:
/// [signer, writable authority]
/// [readonly mint]
/// [writable config]
/// [writable reward pool]
/// [writable swap reserve]
/// [writable authority holder]
/// [readonly system program]
pub fn initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    params: InitializeParams,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let authority = next_account_info(account_info_iter)?;
    let mint = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let reserve_account = next_account_info(account_info_iter)?;
    let holder_account = next_account_info(account_info_iter)?;
    let system_prog = next_account_info(account_info_iter)?;

    require_signer(authority)?;
    for account in [config_account, pool_account, reserve_account, holder_account] {
        require_writable(account)?;
    }

    let config_seeds: &[&[u8]] = &[TokenConfig::SEED, mint.key.as_ref()];
    let pool_seeds: &[&[u8]] = &[RewardPool::SEED, mint.key.as_ref()];
    let reserve_seeds: &[&[u8]] = &[HolderAccount::RESERVE_SEED, mint.key.as_ref()];
    let holder_seeds: &[&[u8]] = &[HolderAccount::SEED, mint.key.as_ref(), authority.key.as_ref()];

    let mut bumps = [0u8; 4];
    for (i, (account, seeds)) in [
        (config_account, config_seeds),
        (pool_account, pool_seeds),
        (reserve_account, reserve_seeds),
        (holder_account, holder_seeds),
    ]
    .into_iter()
    .enumerate()
    {
        let (pda, bump) = Pubkey::find_program_address(seeds, program_id);
        if pda != *account.key {
            return Err(TaxTokenError::InvalidPda.into());
        }
        bumps[i] = bump;
    }
    let [config_bump, pool_bump, reserve_bump, holder_bump] = bumps;

    // Validate before paying for any account
    let config = params.into_config(*mint.key, *authority.key, config_bump)?;
    let now = Clock::get()?.unix_timestamp;

    msg!("Creating config, reward pool and swap reserve for mint {}", mint.key);
    create_pda_account(
        program_id,
        authority,
        config_account,
        system_prog,
        TokenConfig::LEN,
        config_seeds,
        config_bump,
    )?;
    create_pda_account(
        program_id,
        authority,
        pool_account,
        system_prog,
        RewardPool::LEN,
        pool_seeds,
        pool_bump,
    )?;
    create_pda_account(
        program_id,
        authority,
        reserve_account,
        system_prog,
        HolderAccount::LEN,
        reserve_seeds,
        reserve_bump,
    )?;
    create_pda_account(
        program_id,
        authority,
        holder_account,
        system_prog,
        HolderAccount::LEN,
        holder_seeds,
        holder_bump,
    )?;

    let mut authority_holder = HolderAccount::new(*mint.key, *authority.key, holder_bump);
    authority_holder.balance = config.total_supply;

    save(&RewardPool::new(*mint.key, pool_bump, now), pool_account)?;
    save(
        &HolderAccount::new(*mint.key, *reserve_account.key, reserve_bump),
        reserve_account,
    )?;
    save(&authority_holder, holder_account)?;
    save(&config, config_account)?;

    msg!(
        "Initialized {} ({}) with supply {} and {} bps tax",
        config.name,
        config.symbol,
        config.total_supply,
        config.tax_rate_bps
    );
    Ok(())
}
