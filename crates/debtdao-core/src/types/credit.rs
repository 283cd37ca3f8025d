//! Credit line value types
//!
//! Positions are owned by the external credit line; the pool only reads them.

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::errors::PoolResult;
use crate::math::{safe_add, safe_sub};
use crate::types::address::Address;
use crate::types::serde_helpers::u256_dec;

/// Lifecycle status of a credit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    #[default]
    Uninitialized,
    Active,
    Liquidatable,
    Repaid,
    Insolvent,
}

/// Lender position on a credit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditPosition {
    /// Total lent into the position, drawn or not
    #[serde(with = "u256_dec")]
    pub deposit: U256,
    /// Amount currently drawn by the borrower
    #[serde(with = "u256_dec")]
    pub principal: U256,
    #[serde(with = "u256_dec")]
    pub interest_accrued: U256,
    /// Interest paid by the borrower and not yet withdrawn by the lender
    #[serde(with = "u256_dec")]
    pub interest_repaid: U256,
    pub decimals: u8,
    pub token: Address,
    pub lender: Address,
    pub is_open: bool,
}

impl CreditPosition {
    /// Lent funds the borrower has not drawn
    pub fn undrawn(&self) -> PoolResult<U256> {
        safe_sub(self.deposit, self.principal)
    }

    /// Everything the lender can pull out right now
    pub fn withdrawable(&self) -> PoolResult<U256> {
        safe_add(self.undrawn()?, self.interest_repaid)
    }
}

/// Interest rates on a position in bps per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rates {
    /// Rate on drawn principal
    pub drate: u128,
    /// Facility rate on undrawn deposit
    pub frate: u128,
    pub last_accrued: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawable() {
        let p = CreditPosition {
            deposit: U256::new(100),
            principal: U256::new(40),
            interest_repaid: U256::new(7),
            ..Default::default()
        };
        assert_eq!(p.undrawn().unwrap(), U256::new(60));
        assert_eq!(p.withdrawable().unwrap(), U256::new(67));
    }

    #[test]
    fn test_over_drawn_position_fails() {
        let p = CreditPosition {
            deposit: U256::new(10),
            principal: U256::new(11),
            ..Default::default()
        };
        assert!(p.undrawn().is_err());
    }
}
