//! Serde adapters for 256-bit amounts
//!
//! Amounts are written as decimal strings so they survive JSON and TOML,
//! neither of which has a native 256-bit integer.

/// `U256` as a decimal string
pub mod u256_dec {
    use ethnum::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_amount(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a decimal amount, accepting `"max"` for `U256::MAX`
pub fn parse_amount(s: &str) -> Result<ethnum::U256, String> {
    let trimmed = s.trim().replace('_', "");
    if trimmed.eq_ignore_ascii_case("max") {
        return Ok(ethnum::U256::MAX);
    }
    ethnum::U256::from_str_radix(&trimmed, 10).map_err(|e| format!("invalid amount '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethnum::U256;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("max").unwrap(), U256::MAX);
        assert_eq!(parse_amount("1_000").unwrap(), U256::new(1000));
        assert_eq!(
            parse_amount("115792089237316195423570985008687907853269984665640564039457584007913129639935")
                .unwrap(),
            U256::MAX
        );
        assert!(parse_amount("ten").is_err());
    }
}
