//! # Core Error Types
//!
//! Every pool operation is all-or-nothing: any of these errors aborts the call
//! and leaves the pool state exactly as it was before the call.

use thiserror::Error;

use crate::interfaces::ExternalError;

/// Pool ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // ========================================================================
    // Math Errors
    // ========================================================================
    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    /// Caller does not hold the role. Renders as `not owner` / `not rev_recipient`
    #[error("not {0}")]
    NotRole(&'static str),

    /// Caller is not the pending holder of the role
    #[error("not pending {0}")]
    NotPendingRole(&'static str),

    #[error("insufficient allowance: {allowance} < {required}")]
    InsufficientAllowance { allowance: String, required: String },

    // ========================================================================
    // Bounds Errors
    // ========================================================================
    #[error("{fee_type} fee {fee_bps} bps exceeds cap of {max_bps} bps")]
    FeeTooHigh {
        fee_type: &'static str,
        fee_bps: u16,
        max_bps: u16,
    },

    #[error("snitch fee is immutable")]
    ImmutableFee,

    #[error("deposit below minimum: {amount} < {min}")]
    BelowMinDeposit { amount: String, min: String },

    #[error("deposit exceeds max assets: {total} > {max}")]
    ExceedsMaxAssets { total: String, max: String },

    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: String, available: String },

    #[error("insufficient shares: requested {requested}, balance {balance}")]
    InsufficientShares { requested: String, balance: String },

    #[error("amount exceeds position: requested {requested}, available {available}")]
    ExceedsPosition { requested: String, available: String },

    #[error("amount exceeds claimable revenue: requested {requested}, claimable {claimable}")]
    ExceedsClaimable { requested: String, claimable: String },

    #[error("vesting rate {0} exceeds coefficient")]
    VestingRateTooHigh(String),

    #[error("operation would mint or burn zero shares")]
    ZeroShares,

    #[error("operation would move zero assets")]
    ZeroAssets,

    #[error("flash loan not repaid: owed {owed}, repaid {repaid}")]
    FlashLoanNotRepaid { owed: String, repaid: String },

    // ========================================================================
    // State Errors
    // ========================================================================
    #[error("null pending {0}")]
    NullPendingRole(&'static str),

    #[error("invalid receiver")]
    InvalidReceiver,

    #[error("non-revenue token")]
    NonRevenueToken,

    #[error("unsupported token")]
    UnsupportedToken,

    #[error("line not insolvent")]
    LineNotInsolvent,

    #[error("line already impaired")]
    AlreadyImpaired,

    #[error("no principal loss to impair")]
    NoLoss,

    #[error("no interest to collect")]
    NothingToCollect,

    #[error("position not owned by pool")]
    NotLender,

    #[error("position denominated in foreign token")]
    ForeignToken,

    #[error("no investment in vault")]
    NoInvestment,

    #[error("vault asset does not match pool asset")]
    VaultAssetMismatch,

    // ========================================================================
    // Collaborator and Configuration Errors
    // ========================================================================
    #[error("external call failed: {0}")]
    External(#[from] ExternalError),

    #[error("invalid config parameter '{name}': got {value}, expected {expected}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("config io error: {0}")]
    ConfigIo(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),
}

/// Result type using pool errors
pub type PoolResult<T> = Result<T, PoolError>;

// Helper functions for creating specific errors
impl PoolError {
    pub fn insufficient_liquidity(requested: impl ToString, available: impl ToString) -> Self {
        Self::InsufficientLiquidity {
            requested: requested.to_string(),
            available: available.to_string(),
        }
    }

    pub fn insufficient_shares(requested: impl ToString, balance: impl ToString) -> Self {
        Self::InsufficientShares {
            requested: requested.to_string(),
            balance: balance.to_string(),
        }
    }

    pub fn exceeds_position(requested: impl ToString, available: impl ToString) -> Self {
        Self::ExceedsPosition {
            requested: requested.to_string(),
            available: available.to_string(),
        }
    }

    pub fn invalid_config(name: &'static str, value: impl ToString, expected: impl ToString) -> Self {
        Self::InvalidConfig {
            name,
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Whether the error is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotRole(_) | Self::NotPendingRole(_) | Self::InsufficientAllowance { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_errors_render_revert_strings() {
        assert_eq!(PoolError::NotRole("owner").to_string(), "not owner");
        assert_eq!(
            PoolError::NotPendingRole("rev_recipient").to_string(),
            "not pending rev_recipient"
        );
        assert_eq!(PoolError::NonRevenueToken.to_string(), "non-revenue token");
    }

    #[test]
    fn test_error_creation() {
        let err = PoolError::insufficient_liquidity(10u64, 5u64);
        assert_eq!(
            err.to_string(),
            "insufficient liquidity: requested 10, available 5"
        );
        assert!(!err.is_authorization());
        assert!(PoolError::NotRole("owner").is_authorization());
    }

    #[test]
    fn test_external_errors_convert() {
        let err: PoolError = ExternalError::Reverted("position not found".into()).into();
        assert_eq!(
            err.to_string(),
            "external call failed: reverted: position not found"
        );
    }
}
