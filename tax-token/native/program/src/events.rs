use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum TaxTokenEvent {
    TransferWithTax(TransferWithTax),
    TaxVaultSwept(TaxVaultSwept),
    RewardClaimed(RewardClaimed),
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferWithTax {
    pub from: Pubkey,
    pub to: Pubkey,
    pub gross: u64,
    pub tax: u64,
    pub net: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TaxVaultSwept {
    pub venue: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    /// Accumulator index after the deposit
    pub reward_per_unit: u128,
    /// False when circulating supply was zero and the proceeds were held back
    pub distributed: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardClaimed {
    pub owner: Pubkey,
    pub amount: u64,
}

impl TaxTokenEvent {
    /// Writes the borsh-encoded event to the program log.
    pub fn emit(&self) {
        match borsh::to_vec(self) {
            Ok(bytes) => sol_log_data(&[bytes.as_slice()]),
            Err(_) => msg!("Failed to encode event {:?}", self),
        }
    }
}

impl From<TransferWithTax> for TaxTokenEvent {
    fn from(event: TransferWithTax) -> Self {
        TaxTokenEvent::TransferWithTax(event)
    }
}

impl From<TaxVaultSwept> for TaxTokenEvent {
    fn from(event: TaxVaultSwept) -> Self {
        TaxTokenEvent::TaxVaultSwept(event)
    }
}

impl From<RewardClaimed> for TaxTokenEvent {
    fn from(event: RewardClaimed) -> Self {
        TaxTokenEvent::RewardClaimed(event)
    }
}
