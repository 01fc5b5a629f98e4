use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::{msg, program_error::ProgramError};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error, FromPrimitive)]
pub enum TaxTokenError {
    #[error("Amount must be greater than zero")]
    InvalidAmount = 0,
    #[error("Insufficient holder balance")]
    InsufficientBalance = 1,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 2,
    #[error("A tax vault swap is already in progress")]
    SwapInProgress = 3,
    #[error("Tax vault is empty")]
    NothingToSwap = 4,
    #[error("Swap venue rejected the swap")]
    SwapFailed = 5,
    #[error("No rewards to claim")]
    NothingToClaim = 6,
    #[error("Reward vault cannot cover an accrued claim")]
    InsufficientVaultBalance = 7,
    #[error("Token config is already initialized")]
    AlreadyInitialized = 8,
    #[error("Token config is not initialized")]
    NotInitialized = 9,
    #[error("Signer is not the config authority")]
    Unauthorized = 10,
    #[error("Tax rate exceeds 10000 basis points")]
    InvalidTaxRate = 11,
    #[error("Token name or symbol too long")]
    InvalidMetadata = 12,
    #[error("Transfers are paused")]
    TransfersPaused = 13,
    #[error("Sweep policy not yet satisfied")]
    SweepNotDue = 14,
    #[error("Invalid instruction")]
    InvalidInstruction = 15,
    #[error("Missing required signer")]
    NotSigner = 16,
    #[error("Account not writable")]
    NotWritable = 17,
    #[error("Account not owned by this program")]
    InvalidAccountOwner = 18,
    #[error("Account does not match its derived address")]
    InvalidPda = 19,
    #[error("Holder account does not belong to this owner or mint")]
    InvalidHolderAccount = 20,
    #[error("Failed to (de)serialize account data")]
    SerializationError = 21,
    #[error("Account lamports already borrowed")]
    AccountBorrowFailed = 22,
    #[error("Sweep interval and swap timeout must not be negative")]
    InvalidInterval = 23,
}

/// How loudly an error should be reported.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Expected, recoverable error returned straight to the caller.
    User,
    /// The accounting invariants are broken. Never expected in a correct ledger.
    InvariantViolation,
}

impl TaxTokenError {
    pub fn severity(&self) -> Severity {
        match self {
            TaxTokenError::InsufficientVaultBalance => Severity::InvariantViolation,
            _ => Severity::User,
        }
    }

    /// Logs invariant violations with their own prefix and hands the error back.
    pub fn report(self) -> Self {
        if self.severity() == Severity::InvariantViolation {
            msg!("INVARIANT VIOLATION: {}", self);
        }
        self
    }

    /// Recovers the typed error from a `ProgramError::Custom` code.
    pub fn from_program_error(err: &ProgramError) -> Option<Self> {
        match err {
            ProgramError::Custom(code) => Self::from_u32(*code),
            _ => None,
        }
    }
}

impl From<TaxTokenError> for ProgramError {
    fn from(e: TaxTokenError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
