//! # Protocol Constants
//!
//! Fundamental constants for the Debt DAO pool including:
//! - Fixed-point scales for share price and vesting
//! - Fee structure parameters and caps
//! - Pool defaults applied at construction

use ethnum::U256;

// ============================================================================
// Fixed-Point Constants
// ============================================================================

/// Scale of the share price: 1e18 == one asset per share
pub const PRICE_DECIMALS: U256 = U256::new(1_000_000_000_000_000_000);

/// Scale of the per-second vesting rate: 1e18 == 100% per second
pub const VESTING_RATE_COEFFICIENT: U256 = U256::new(1_000_000_000_000_000_000);

/// Sentinel meaning "everything available" for claims and credit reductions
pub const MAX_UINT: U256 = U256::MAX;

// ============================================================================
// Fee Constants
// ============================================================================

/// Basis points denominator (10,000 = 100%)
pub const FEE_COEFFICIENT: u16 = 10_000;

/// Cap for every fee other than performance and snitch (2%)
pub const MAX_PITTANCE_FEE: u16 = 200;

/// Cap for the performance fee (100%)
pub const MAX_PERFORMANCE_FEE: u16 = FEE_COEFFICIENT;

/// Bounty paid to whoever realizes a loss on an insolvent position (5%)
pub const SNITCH_FEE: u16 = 500;

// ============================================================================
// Pool Defaults
// ============================================================================

/// Default share of locked profit released per second (~0.0046%)
pub const DEFAULT_VESTING_RATE: U256 = U256::new(46_000_000_000_000);

/// Default minimum deposit (no floor)
pub const DEFAULT_MIN_DEPOSIT: U256 = U256::ZERO;

/// Default deposit ceiling (unbounded)
pub const DEFAULT_MAX_ASSETS: U256 = U256::MAX;

/// Default share token decimals, matching the underlying asset
pub const DEFAULT_DECIMALS: u8 = 18;

/// Human readable contract name
pub const CONTRACT_NAME: &str = "Debt DAO Pool";

/// Accounting API version
pub const API_VERSION: &str = "0.0.001";

// ============================================================================
// Credit Line Constants
// ============================================================================

/// Interest rate denominator used by credit lines: bps * seconds per year.
/// Interest over `t` seconds is `floor(amount * rate_bps * t / INTEREST_RATE_COEFFICIENT)`
pub const INTEREST_RATE_COEFFICIENT: U256 = U256::new(315_576_000_000);

/// Seconds in a Julian year (365.25 days)
pub const ONE_YEAR_IN_SECONDS: u64 = 31_557_600;
