//! Tax Token Program
//!
//! Fee-bearing token ledger: every transfer diverts a tax share into a vault,
//! the vault is periodically swapped for lamports, and the proceeds are
//! claimable by holders in proportion to their balances.
//!
//! The accounting core (`accumulator`, `tax`, `swap`, `distribution`) is
//! independent of account storage; `instructions` adapts it to program
//! accounts and `engine` runs it in memory.

pub mod accumulator;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod processor;
pub mod state;
pub mod swap;
pub mod tax;

#[cfg(not(feature = "no-entrypoint"))]
use {crate::processor::process_instruction, solana_program::entrypoint};

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

solana_program::declare_id!("41j967tLtJ35wsLr5BwLtWvqWqQGmUsBMeX8twWPrqid");
