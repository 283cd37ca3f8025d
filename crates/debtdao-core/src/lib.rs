//! # Debt DAO Pool - Accounting Engine
//!
//! Ledger of an ERC4626-style lending pool that deploys deposits into Debt
//! DAO credit lines and nested vaults. It provides:
//!
//! - Fixed-point share pricing over vested assets
//! - A fee engine settling every fee in pool shares
//! - Linear vesting of realized profit
//! - A credit ledger with permissionless interest collection and impairment
//! - Two-phase role handover for the owner and revenue recipient
//!
//! Collaborators (credit lines, vaults, flash borrowers) are reached through
//! the traits in [`interfaces`]. Every call carries an explicit
//! [`CallContext`]; the pool reads no ambient caller or clock.

// Re-export all modules
pub mod config;
pub mod constants;
pub mod errors;
pub mod interfaces;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod types;
pub mod unit_of_work;

// Re-export commonly used items
pub use config::PoolConfig;
pub use constants::*;
pub use errors::{PoolError, PoolResult};
pub use ethnum::U256;
pub use interfaces::{CreditLine, Erc4626Vault, ExternalError, ExternalResult, FlashBorrower};
pub use pool::{LossAbsorption, Pool};
pub use types::*;
