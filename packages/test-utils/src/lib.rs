//! Shared fixtures for Debt DAO pool tests

pub mod constants;
pub mod helpers;
pub mod mocks;

use debtdao_core::Address;
use rand::Rng;
use tracing_subscriber::EnvFilter;

pub use constants::*;
pub use helpers::TestEnv;
pub use mocks::{MockFlashBorrower, MockLine, MockVault, Repayment};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Random non-zero address
pub fn generate_address() -> Address {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes[..]);
    bytes[0] |= 0x80;
    Address::new(bytes)
}

/// Deterministic address for named test actors
pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}
