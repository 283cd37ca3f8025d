//! # Ledger Components
//!
//! Leaf accounting rules operating on an explicit `PoolState`. The pool
//! orchestrator composes them into caller-facing operations.

pub mod credit;
pub mod fees;
pub mod roles;
pub mod shares;
pub mod vesting;

pub use credit::{Deployment, Recovery};
pub use fees::{assess_fee, charge_fee, FeeAssessment, FeeCharge, FeeReceipt, FeeReceiver, Settlement};
pub use roles::Role;
pub use vesting::{unlock_profits, vested_amount};
