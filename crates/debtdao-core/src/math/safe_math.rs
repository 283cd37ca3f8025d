//! # Safe Math Operations
//!
//! Overflow-checked arithmetic for ledger counters. Nothing in the pool wraps:
//! every add/sub/mul goes through one of these helpers.

use ethnum::U256;

use crate::constants::FEE_COEFFICIENT;
use crate::errors::{PoolError, PoolResult};
use crate::math::big_int::mul_div_down;

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        #[doc = concat!("Checked `", stringify!($checked_method), "` on `", stringify!($type), "`")]
        pub fn $fn_name(a: $type, b: $type) -> PoolResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };

    // Division operations with zero check
    (div, $fn_name:ident, $type:ty) => {
        /// Safe division with zero check
        pub fn $fn_name(a: $type, b: $type) -> PoolResult<$type> {
            if b == <$type>::from(0u8) {
                return Err(PoolError::DivisionByZero);
            }
            Ok(a / b)
        }
    };
}

// 256-bit ledger arithmetic
safe_arith!(safe_add, U256, checked_add, PoolError::MathOverflow);
safe_arith!(safe_sub, U256, checked_sub, PoolError::MathUnderflow);
safe_arith!(safe_mul, U256, checked_mul, PoolError::MathOverflow);
safe_arith!(div, safe_div, U256);

// Timestamps
safe_arith!(safe_add_u64, u64, checked_add, PoolError::MathOverflow);
safe_arith!(safe_sub_u64, u64, checked_sub, PoolError::MathUnderflow);

/// `floor(value * bps / FEE_COEFFICIENT)`
pub fn apply_bps(value: U256, bps: u16) -> PoolResult<U256> {
    mul_div_down(value, U256::new(bps as u128), U256::new(FEE_COEFFICIENT as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_ops() {
        assert_eq!(safe_add(U256::new(1), U256::new(2)).unwrap(), U256::new(3));
        assert_eq!(safe_add(U256::MAX, U256::ONE), Err(PoolError::MathOverflow));
        assert_eq!(safe_sub(U256::ZERO, U256::ONE), Err(PoolError::MathUnderflow));
        assert_eq!(safe_mul(U256::MAX, U256::new(2)), Err(PoolError::MathOverflow));
        assert_eq!(safe_div(U256::ONE, U256::ZERO), Err(PoolError::DivisionByZero));
        assert_eq!(safe_div(U256::new(7), U256::new(2)).unwrap(), U256::new(3));
        assert_eq!(safe_sub_u64(1, 2), Err(PoolError::MathUnderflow));
    }

    #[test]
    fn test_apply_bps_floors() {
        assert_eq!(apply_bps(U256::new(10_000), 200).unwrap(), U256::new(200));
        assert_eq!(apply_bps(U256::new(49), 200).unwrap(), U256::ZERO);
        assert_eq!(apply_bps(U256::new(99), 5_000).unwrap(), U256::new(49));
        assert_eq!(apply_bps(U256::MAX, FEE_COEFFICIENT).unwrap(), U256::MAX);
    }
}
