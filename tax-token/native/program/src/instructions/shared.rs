use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::Instruction,
    program::invoke_signed,
    pubkey::Pubkey,
    rent::Rent,
    sysvar::Sysvar,
};
use solana_system_interface::instruction;

use crate::{
    error::TaxTokenError,
    ledger::{CheckpointStore, LedgerStore},
    state::{self, HolderAccount, HolderCheckpoint, RewardPool, TokenConfig},
};

pub fn require_signer(account: &AccountInfo) -> Result<(), TaxTokenError> {
    if !account.is_signer {
        return Err(TaxTokenError::NotSigner);
    }
    Ok(())
}

pub fn require_writable(account: &AccountInfo) -> Result<(), TaxTokenError> {
    if !account.is_writable {
        return Err(TaxTokenError::NotWritable);
    }
    Ok(())
}

pub fn require_program_owned(
    program_id: &Pubkey,
    account: &AccountInfo,
) -> Result<(), TaxTokenError> {
    if account.owner != program_id {
        return Err(TaxTokenError::InvalidAccountOwner);
    }
    Ok(())
}

/// Checks `account` sits at the address derived from `seeds` plus the stored `bump`.
pub fn require_pda(
    program_id: &Pubkey,
    account: &AccountInfo,
    seeds: &[&[u8]],
    bump: u8,
) -> Result<(), TaxTokenError> {
    let bump_seed = [bump];
    let mut signer_seeds = seeds.to_vec();
    signer_seeds.push(&bump_seed);
    let expected = Pubkey::create_program_address(&signer_seeds, program_id)
        .map_err(|_| TaxTokenError::InvalidPda)?;
    if expected != *account.key {
        return Err(TaxTokenError::InvalidPda);
    }
    Ok(())
}

/// System instructions that turn `target` into a rent-exempt account of `space`
/// bytes owned by `owner`.
///
/// Anyone can send lamports to a PDA address before it exists, and
/// `create_account` refuses a funded target. A funded target is topped up,
/// allocated and assigned instead.
pub fn account_creation_instructions(
    payer: &Pubkey,
    target: &Pubkey,
    current_lamports: u64,
    rent_minimum: u64,
    space: usize,
    owner: &Pubkey,
) -> Vec<Instruction> {
    if current_lamports == 0 {
        return vec![instruction::create_account(
            payer,
            target,
            rent_minimum,
            space as u64,
            owner,
        )];
    }
    let mut steps = Vec::with_capacity(3);
    let shortfall = rent_minimum.saturating_sub(current_lamports);
    if shortfall > 0 {
        steps.push(instruction::transfer(payer, target, shortfall));
    }
    steps.push(instruction::allocate(target, space as u64));
    steps.push(instruction::assign(target, owner));
    steps
}

/// Creates a rent-exempt, program-owned PDA. Fails if the account already holds data.
pub fn create_pda_account<'info>(
    program_id: &Pubkey,
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    seeds: &[&[u8]],
    bump: u8,
) -> ProgramResult {
    if !target.data_is_empty() {
        return Err(TaxTokenError::AlreadyInitialized.into());
    }
    let rent_minimum = Rent::get()?.minimum_balance(space);

    let bump_seed = [bump];
    let mut signer_seeds = seeds.to_vec();
    signer_seeds.push(&bump_seed);
    for step in account_creation_instructions(
        payer.key,
        target.key,
        target.lamports(),
        rent_minimum,
        space,
        program_id,
    ) {
        invoke_signed(
            &step,
            &[payer.clone(), target.clone(), system_program.clone()],
            &[signer_seeds.as_slice()],
        )?;
    }
    Ok(())
}

pub fn load_config(
    program_id: &Pubkey,
    account: &AccountInfo,
) -> Result<TokenConfig, TaxTokenError> {
    require_program_owned(program_id, account)?;
    let config: TokenConfig = read(account)?;
    if !config.is_initialized {
        return Err(TaxTokenError::NotInitialized);
    }
    require_pda(program_id, account, &[TokenConfig::SEED, config.mint.as_ref()], config.bump)?;
    Ok(config)
}

pub fn load_pool(
    program_id: &Pubkey,
    account: &AccountInfo,
    config: &TokenConfig,
) -> Result<RewardPool, TaxTokenError> {
    require_program_owned(program_id, account)?;
    require_writable(account)?;
    let pool: RewardPool = read(account)?;
    if !pool.is_initialized || pool.mint != config.mint {
        return Err(TaxTokenError::NotInitialized);
    }
    require_pda(program_id, account, &[RewardPool::SEED, config.mint.as_ref()], pool.bump)?;
    Ok(pool)
}

/// Loads a holder PDA of `config.mint`.
pub fn load_holder(
    program_id: &Pubkey,
    account: &AccountInfo,
    config: &TokenConfig,
) -> Result<HolderAccount, TaxTokenError> {
    require_program_owned(program_id, account)?;
    require_writable(account)?;
    let holder: HolderAccount = read(account)?;
    if !holder.is_initialized || holder.mint != config.mint {
        return Err(TaxTokenError::InvalidHolderAccount);
    }
    require_pda(
        program_id,
        account,
        &[HolderAccount::SEED, config.mint.as_ref(), holder.owner.as_ref()],
        holder.bump,
    )?;
    Ok(holder)
}

/// Checks the swap reserve PDA of `config.mint`. It holds lamports, never tokens.
pub fn load_reserve(
    program_id: &Pubkey,
    account: &AccountInfo,
    config: &TokenConfig,
) -> Result<(), TaxTokenError> {
    require_program_owned(program_id, account)?;
    require_writable(account)?;
    let reserve: HolderAccount = read(account)?;
    if !reserve.is_initialized || reserve.mint != config.mint || reserve.owner != *account.key {
        return Err(TaxTokenError::InvalidHolderAccount);
    }
    require_pda(
        program_id,
        account,
        &[HolderAccount::RESERVE_SEED, config.mint.as_ref()],
        reserve.bump,
    )
}

pub fn read<T: borsh::BorshDeserialize>(account: &AccountInfo) -> Result<T, TaxTokenError> {
    let data = account
        .try_borrow_data()
        .map_err(|_| TaxTokenError::AccountBorrowFailed)?;
    state::load(&data)
}

pub fn save<T: borsh::BorshSerialize>(value: &T, account: &AccountInfo) -> Result<(), TaxTokenError> {
    let mut data = account
        .try_borrow_mut_data()
        .map_err(|_| TaxTokenError::AccountBorrowFailed)?;
    state::store(value, &mut data)
}

/// Moves lamports between accounts. `from` must be owned by this program.
///
/// Callers check balances first, so a shortfall here means the books and the
/// lamports disagree.
pub fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<(), TaxTokenError> {
    let from_lamports = from
        .lamports()
        .checked_sub(amount)
        .ok_or_else(|| TaxTokenError::InsufficientVaultBalance.report())?;
    let to_lamports = to
        .lamports()
        .checked_add(amount)
        .ok_or(TaxTokenError::ArithmeticOverflow)?;
    **from
        .try_borrow_mut_lamports()
        .map_err(|_| TaxTokenError::AccountBorrowFailed)? = from_lamports;
    **to
        .try_borrow_mut_lamports()
        .map_err(|_| TaxTokenError::AccountBorrowFailed)? = to_lamports;
    Ok(())
}

/// Holder PDAs touched by one instruction, exposed to the core as a ledger.
///
/// Values are edited in memory and only written back by `commit`.
#[derive(Default)]
pub struct HolderSet<'a, 'info> {
    entries: Vec<(&'a AccountInfo<'info>, HolderAccount)>,
}

impl<'a, 'info> HolderSet<'a, 'info> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds a holder unless an account with the same address is already present.
    pub fn insert(&mut self, account: &'a AccountInfo<'info>, holder: HolderAccount) {
        if self.entries.iter().all(|(info, _)| info.key != account.key) {
            self.entries.push((account, holder));
        }
    }

    pub fn commit(&self) -> Result<(), TaxTokenError> {
        for (account, holder) in &self.entries {
            save(holder, account)?;
        }
        Ok(())
    }

    fn find(&self, owner: &Pubkey) -> Option<&HolderAccount> {
        self.entries
            .iter()
            .map(|(_, holder)| holder)
            .find(|holder| holder.owner == *owner)
    }

    fn find_mut(&mut self, owner: &Pubkey) -> Result<&mut HolderAccount, TaxTokenError> {
        self.entries
            .iter_mut()
            .map(|(_, holder)| holder)
            .find(|holder| holder.owner == *owner)
            .ok_or(TaxTokenError::InvalidHolderAccount)
    }
}

impl LedgerStore for HolderSet<'_, '_> {
    fn balance(&self, owner: &Pubkey) -> u64 {
        self.find(owner).map_or(0, |holder| holder.balance)
    }

    fn credit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError> {
        let holder = self.find_mut(owner)?;
        holder.balance = holder
            .balance
            .checked_add(amount)
            .ok_or(TaxTokenError::ArithmeticOverflow)?;
        Ok(())
    }

    fn debit(&mut self, owner: &Pubkey, amount: u64) -> Result<(), TaxTokenError> {
        let holder = self.find_mut(owner)?;
        holder.balance = holder
            .balance
            .checked_sub(amount)
            .ok_or(TaxTokenError::InsufficientBalance)?;
        Ok(())
    }
}

impl CheckpointStore for HolderSet<'_, '_> {
    fn checkpoint(&self, owner: &Pubkey) -> HolderCheckpoint {
        self.find(owner)
            .map(|holder| holder.checkpoint)
            .unwrap_or_default()
    }

    fn store_checkpoint(
        &mut self,
        owner: &Pubkey,
        checkpoint: HolderCheckpoint,
    ) -> Result<(), TaxTokenError> {
        self.find_mut(owner)?.checkpoint = checkpoint;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_address_is_created_in_one_step() {
        let (payer, target, owner) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let steps = account_creation_instructions(&payer, &target, 0, 1_000, 106, &owner);
        assert_eq!(steps, vec![instruction::create_account(&payer, &target, 1_000, 106, &owner)]);
    }

    #[test]
    fn prefunded_address_is_topped_up_allocated_and_assigned() {
        let (payer, target, owner) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let steps = account_creation_instructions(&payer, &target, 1, 1_000, 106, &owner);
        assert_eq!(
            steps,
            vec![
                instruction::transfer(&payer, &target, 999),
                instruction::allocate(&target, 106),
                instruction::assign(&target, &owner),
            ]
        );

        let rich = account_creation_instructions(&payer, &target, 5_000, 1_000, 106, &owner);
        assert_eq!(
            rich,
            vec![instruction::allocate(&target, 106), instruction::assign(&target, &owner)]
        );
    }
}
