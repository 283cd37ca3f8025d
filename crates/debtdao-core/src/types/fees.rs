//! # Fee Types
//!
//! Revenue streams the pool charges and the per-pool fee schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PERFORMANCE_FEE, MAX_PITTANCE_FEE, SNITCH_FEE};
use crate::errors::{PoolError, PoolResult};

/// Revenue stream a fee is charged on.
///
/// Discriminants are the stream's index. On the event log a fee type is
/// written as the bit flag `1 << index` (see [`FeeType::flag`]) so that a set
/// of fee types can be filtered with a single mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FeeType {
    Performance = 0,
    Deposit = 1,
    Withdraw = 2,
    Flash = 3,
    Collector = 4,
    Referral = 5,
    Snitch = 6,
}

impl FeeType {
    /// Every fee type in index order
    pub const ALL: [FeeType; 7] = [
        FeeType::Performance,
        FeeType::Deposit,
        FeeType::Withdraw,
        FeeType::Flash,
        FeeType::Collector,
        FeeType::Referral,
        FeeType::Snitch,
    ];

    /// Fee types capped at `MAX_PITTANCE_FEE`
    pub const PITTANCE: [FeeType; 5] = [
        FeeType::Deposit,
        FeeType::Withdraw,
        FeeType::Flash,
        FeeType::Collector,
        FeeType::Referral,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Bit flag `2^index` used in event records
    pub const fn flag(self) -> u8 {
        1 << (self as u8)
    }

    /// Inverse of [`FeeType::flag`]. Only single-bit flags decode
    pub fn from_flag(flag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.flag() == flag)
    }

    pub const fn name(self) -> &'static str {
        match self {
            FeeType::Performance => "performance",
            FeeType::Deposit => "deposit",
            FeeType::Withdraw => "withdraw",
            FeeType::Flash => "flash",
            FeeType::Collector => "collector",
            FeeType::Referral => "referral",
            FeeType::Snitch => "snitch",
        }
    }

    /// Highest rate the owner may set, or `None` if the rate is immutable
    pub const fn max_bps(self) -> Option<u16> {
        match self {
            FeeType::Performance => Some(MAX_PERFORMANCE_FEE),
            FeeType::Snitch => None,
            _ => Some(MAX_PITTANCE_FEE),
        }
    }

    pub const fn is_pittance(self) -> bool {
        !matches!(self, FeeType::Performance | FeeType::Snitch)
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owner-configurable fee rates in basis points. Snitch is a protocol constant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub performance: u16,
    pub deposit: u16,
    pub withdraw: u16,
    pub flash: u16,
    pub collector: u16,
    pub referral: u16,
}

impl FeeSchedule {
    /// Current rate for a fee type
    pub fn get(&self, fee_type: FeeType) -> u16 {
        match fee_type {
            FeeType::Performance => self.performance,
            FeeType::Deposit => self.deposit,
            FeeType::Withdraw => self.withdraw,
            FeeType::Flash => self.flash,
            FeeType::Collector => self.collector,
            FeeType::Referral => self.referral,
            FeeType::Snitch => SNITCH_FEE,
        }
    }

    /// Set a rate after checking it against the fee type's cap
    pub fn set(&mut self, fee_type: FeeType, fee_bps: u16) -> PoolResult<()> {
        Self::check(fee_type, fee_bps)?;
        let slot = match fee_type {
            FeeType::Performance => &mut self.performance,
            FeeType::Deposit => &mut self.deposit,
            FeeType::Withdraw => &mut self.withdraw,
            FeeType::Flash => &mut self.flash,
            FeeType::Collector => &mut self.collector,
            FeeType::Referral => &mut self.referral,
            FeeType::Snitch => return Err(PoolError::ImmutableFee),
        };
        *slot = fee_bps;
        Ok(())
    }

    /// Validate a candidate rate for a fee type
    pub fn check(fee_type: FeeType, fee_bps: u16) -> PoolResult<()> {
        let max_bps = fee_type.max_bps().ok_or(PoolError::ImmutableFee)?;
        if fee_bps > max_bps {
            return Err(PoolError::FeeTooHigh {
                fee_type: fee_type.name(),
                fee_bps,
                max_bps,
            });
        }
        Ok(())
    }

    /// Validate every configured rate
    pub fn validate(&self) -> PoolResult<()> {
        for fee_type in FeeType::ALL.into_iter().filter(|t| *t != FeeType::Snitch) {
            Self::check(fee_type, self.get(fee_type))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_flags_are_exponential() {
        let flags: Vec<u8> = FeeType::ALL.iter().map(|t| t.flag()).collect();
        assert_eq!(flags, vec![1, 2, 4, 8, 16, 32, 64]);
        for t in FeeType::ALL {
            assert_eq!(FeeType::from_flag(t.flag()), Some(t));
        }
        assert_eq!(FeeType::from_flag(3), None);
        assert_eq!(FeeType::from_flag(0), None);
    }

    #[test]
    fn test_caps() {
        let mut fees = FeeSchedule::default();
        for t in FeeType::PITTANCE {
            assert!(fees.set(t, MAX_PITTANCE_FEE).is_ok());
            assert!(matches!(
                fees.set(t, MAX_PITTANCE_FEE + 1),
                Err(PoolError::FeeTooHigh { .. })
            ));
            assert_eq!(fees.get(t), MAX_PITTANCE_FEE);
        }
        assert!(fees.set(FeeType::Performance, MAX_PERFORMANCE_FEE).is_ok());
        assert!(fees.set(FeeType::Performance, MAX_PERFORMANCE_FEE + 1).is_err());
        assert_eq!(fees.set(FeeType::Snitch, 1), Err(PoolError::ImmutableFee));
        assert_eq!(fees.get(FeeType::Snitch), SNITCH_FEE);
    }

    #[test]
    fn test_validate_schedule() {
        let ok = FeeSchedule { performance: 10_000, deposit: 200, ..Default::default() };
        assert!(ok.validate().is_ok());
        let bad = FeeSchedule { withdraw: 201, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
