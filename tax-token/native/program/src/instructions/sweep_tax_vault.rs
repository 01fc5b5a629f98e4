use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    pubkey::Pubkey,
    rent::Rent,
    sysvar::{Sysvar, clock::Clock},
};

use super::shared::{load_config, load_pool, load_reserve, move_lamports, require_signer, save};
use crate::{
    events::TaxTokenEvent,
    state::{HolderAccount, SwapRate},
    swap::{self, SwapFailure, SwapOracle, SwapRequest},
};

/// Venue backed by the swap reserve PDA.
///
/// Tax units are sold at the configured rate for the lamports the reserve
/// holds above its rent-exempt floor. The proceeds move straight into the
/// reward pool account.
///
/// The swap settles in the same instruction that builds the request, and
/// `swap_timeout_secs` is never negative, so a request made by a sweep never
/// times out here. The deadline check only rejects requests built with a past
/// deadline. The timeout matters for venues that settle later.
pub struct ReserveOracle<'a, 'info> {
    reserve: &'a AccountInfo<'info>,
    pool: &'a AccountInfo<'info>,
    rate: SwapRate,
    rent_floor: u64,
    now: i64,
}

impl<'a, 'info> ReserveOracle<'a, 'info> {
    pub fn new(
        reserve: &'a AccountInfo<'info>,
        pool: &'a AccountInfo<'info>,
        rate: SwapRate,
        rent_floor: u64,
        now: i64,
    ) -> Self {
        Self {
            reserve,
            pool,
            rate,
            rent_floor,
            now,
        }
    }

    /// Lamports the reserve can pay out without dropping below rent exemption.
    pub fn liquidity(&self) -> u64 {
        self.reserve.lamports().saturating_sub(self.rent_floor)
    }
}

impl SwapOracle for ReserveOracle<'_, '_> {
    fn venue(&self) -> Pubkey {
        *self.reserve.key
    }

    fn swap(&mut self, request: &SwapRequest) -> Result<u64, SwapFailure> {
        if self.now > request.deadline {
            return Err(SwapFailure::Timeout);
        }
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
        if quoted > self.liquidity() {
            return Err(SwapFailure::LiquidityUnavailable);
        }
        move_lamports(self.reserve, self.pool, quoted)
            .map_err(|_| SwapFailure::LiquidityUnavailable)?;
        Ok(quoted)
    }
}

/// Accounts:
/// [signer caller]
/// [readonly config]
/// [writable reward pool]
/// [writable swap reserve]
pub fn sweep_tax_vault(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    min_amount_out: u64,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let caller = next_account_info(account_info_iter)?;
    let config_account = next_account_info(account_info_iter)?;
    let pool_account = next_account_info(account_info_iter)?;
    let reserve_account = next_account_info(account_info_iter)?;

    require_signer(caller)?;
    let config = load_config(program_id, config_account)?;
    let mut pool = load_pool(program_id, pool_account, &config)?;
    load_reserve(program_id, reserve_account, &config)?;

    let now = Clock::get()?.unix_timestamp;
    let rent_floor = Rent::get()?.minimum_balance(HolderAccount::LEN);
    let mut oracle = ReserveOracle::new(
        reserve_account,
        pool_account,
        config.swap_rate,
        rent_floor,
        now,
    );

    let event = swap::sweep_tax_vault(
        &mut pool,
        &config,
        &mut oracle,
        caller.key,
        min_amount_out,
        now,
    )?;

    save(&pool, pool_account)?;
    TaxTokenEvent::from(event).emit();
    Ok(())
}
