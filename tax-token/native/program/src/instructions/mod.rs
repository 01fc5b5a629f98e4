pub mod admin;
pub mod claim;
pub mod initialize;
pub mod initialize_holder;
pub mod shared;
pub mod sweep_tax_vault;
pub mod transfer;

pub use admin::{set_paused, update_tax_rate};
pub use claim::claim;
pub use initialize::initialize;
pub use initialize_holder::initialize_holder;
pub use sweep_tax_vault::sweep_tax_vault;
pub use transfer::transfer;
