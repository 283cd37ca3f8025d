//! Big integer operations for high-precision math
//!
//! Asset and share amounts are full 256-bit integers. This module provides the
//! mul_div primitive every conversion is built on, so that intermediate
//! products never silently wrap.

use ethnum::U256;

use crate::errors::{PoolError, PoolResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Multiply two U256 values and divide by a third with specified rounding.
///
/// When `a * b` fits in 256 bits the product is divided directly. Otherwise the
/// quotient is split as `(a / d) * b + (a % d) * b / d`, which is exact and
/// only fails when the true result (or the remainder term) exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> PoolResult<U256> {
    if denominator == U256::ZERO {
        return Err(PoolError::DivisionByZero);
    }

    let (quotient, has_remainder) = match a.checked_mul(b) {
        Some(product) => (product / denominator, product % denominator != U256::ZERO),
        None => {
            let whole = a / denominator;
            let rest = a % denominator;
            let rest_product = rest.checked_mul(b).ok_or(PoolError::MathOverflow)?;
            let quotient = whole
                .checked_mul(b)
                .and_then(|q| q.checked_add(rest_product / denominator))
                .ok_or(PoolError::MathOverflow)?;
            (quotient, rest_product % denominator != U256::ZERO)
        }
    };

    if rounding == Rounding::Up && has_remainder {
        return quotient.checked_add(U256::ONE).ok_or(PoolError::MathOverflow);
    }

    Ok(quotient)
}

/// Floor of `a * b / denominator`
pub fn mul_div_down(a: U256, b: U256, denominator: U256) -> PoolResult<U256> {
    mul_div(a, b, denominator, Rounding::Down)
}

/// Convert a 256-bit value to u128, failing if it does not fit
pub fn to_u128(value: U256) -> PoolResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(PoolError::MathOverflow);
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_basic() {
        let r = mul_div(U256::new(10), U256::new(3), U256::new(4), Rounding::Down).unwrap();
        assert_eq!(r, U256::new(7));
        let r = mul_div(U256::new(10), U256::new(3), U256::new(4), Rounding::Up).unwrap();
        assert_eq!(r, U256::new(8));
        let r = mul_div(U256::new(12), U256::new(3), U256::new(4), Rounding::Up).unwrap();
        assert_eq!(r, U256::new(9));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(U256::ONE, U256::ONE, U256::ZERO, Rounding::Down),
            Err(PoolError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_wide_product() {
        // MAX * 1e17 / 1e18 overflows the direct product but not the result
        let e18 = U256::new(1_000_000_000_000_000_000);
        let e17 = U256::new(100_000_000_000_000_000);
        let r = mul_div_down(U256::MAX, e17, e18).unwrap();
        assert_eq!(r, U256::MAX / U256::new(10));
    }

    #[test]
    fn test_mul_div_result_overflow() {
        assert_eq!(
            mul_div_down(U256::MAX, U256::new(2), U256::ONE),
            Err(PoolError::MathOverflow)
        );
    }

    #[test]
    fn test_to_u128() {
        assert_eq!(to_u128(U256::new(42)).unwrap(), 42);
        assert!(to_u128(U256::MAX).is_err());
    }
}
