//! # Core Types
//!
//! Value types shared by the ledger, its collaborators and its clients.

pub mod address;
pub mod context;
pub mod credit;
pub mod events;
pub mod fees;
pub mod serde_helpers;
pub mod state;

pub use address::*;
pub use context::*;
pub use credit::*;
pub use events::*;
pub use fees::*;
pub use state::*;
