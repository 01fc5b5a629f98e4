use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::{config::InitializeParams, error::TaxTokenError, instructions};

#[derive(Debug, BorshSerialize, BorshDeserialize)]
pub enum TaxTokenInstruction {
    /// Accounts:
    /// 0. `[signer, writable]` Authority (payer, receives the initial supply)
    /// 1. `[]` Mint identity
    /// 2. `[writable]` TokenConfig PDA
    /// 3. `[writable]` RewardPool PDA
    /// 4. `[writable]` Swap reserve PDA
    /// 5. `[writable]` Authority's holder PDA
    /// 6. `[]` System program
    Initialize(InitializeParams),
    /// Accounts:
    /// 0. `[signer, writable]` Payer
    /// 1. `[]` Holder owner
    /// 2. `[]` TokenConfig PDA
    /// 3. `[writable]` Holder PDA
    /// 4. `[]` System program
    InitializeHolder,
    /// Accounts:
    /// 0. `[signer]` Sender
    /// 1. `[]` TokenConfig PDA
    /// 2. `[writable]` RewardPool PDA
    /// 3. `[writable]` Sender's holder PDA
    /// 4. `[writable]` Recipient's holder PDA
    Transfer { amount: u64 },
    /// Accounts:
    /// 0. `[signer]` Caller
    /// 1. `[]` TokenConfig PDA
    /// 2. `[writable]` RewardPool PDA
    /// 3. `[writable]` Swap reserve PDA
    SweepTaxVault { min_amount_out: u64 },
    /// Accounts:
    /// 0. `[signer, writable]` Holder owner (receives the lamports)
    /// 1. `[]` TokenConfig PDA
    /// 2. `[writable]` RewardPool PDA
    /// 3. `[writable]` Owner's holder PDA
    Claim,
    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` TokenConfig PDA
    UpdateTaxRate { tax_rate_bps: u16 },
    /// Accounts:
    /// 0. `[signer]` Authority
    /// 1. `[writable]` TokenConfig PDA
    SetPaused { paused: bool },
}

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instr = TaxTokenInstruction::try_from_slice(instruction_data)
        .map_err(|_| TaxTokenError::InvalidInstruction)?;

    match instr {
        TaxTokenInstruction::Initialize(params) => {
            msg!("Instruction: Initialize");
            instructions::initialize(program_id, accounts, params)
        }
        TaxTokenInstruction::InitializeHolder => {
            msg!("Instruction: InitializeHolder");
            instructions::initialize_holder(program_id, accounts)
        }
        TaxTokenInstruction::Transfer { amount } => {
            msg!("Instruction: Transfer");
            instructions::transfer(program_id, accounts, amount)
        }
        TaxTokenInstruction::SweepTaxVault { min_amount_out } => {
            msg!("Instruction: SweepTaxVault");
            instructions::sweep_tax_vault(program_id, accounts, min_amount_out)
        }
        TaxTokenInstruction::Claim => {
            msg!("Instruction: Claim");
            instructions::claim(program_id, accounts)
        }
        TaxTokenInstruction::UpdateTaxRate { tax_rate_bps } => {
            msg!("Instruction: UpdateTaxRate");
            instructions::update_tax_rate(program_id, accounts, tax_rate_bps)
        }
        TaxTokenInstruction::SetPaused { paused } => {
            msg!("Instruction: SetPaused");
            instructions::set_paused(program_id, accounts, paused)
        }
    }
}
