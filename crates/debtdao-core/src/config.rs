//! Pool configuration
//!
//! Loaded from TOML. Amounts are decimal strings, `"max"` allowed.

use std::fs;

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{PoolError, PoolResult};
use crate::types::serde_helpers::u256_dec;
use crate::types::{Address, FeeSchedule};

/// Pool configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Share token name
    pub name: String,

    /// Share token symbol
    pub symbol: String,

    /// Share token decimals
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Initial owner. Also the initial revenue recipient
    pub owner: Address,

    /// Underlying asset the pool accepts
    pub asset: Address,

    /// Smallest accepted deposit, in assets
    #[serde(with = "u256_dec", default = "default_min_deposit")]
    pub min_deposit: U256,

    /// Deposit ceiling on `total_assets`. `"max"` for unbounded
    #[serde(with = "u256_dec", default = "default_max_assets")]
    pub max_assets: U256,

    /// Share of locked profit released per second, scaled by 1e18
    #[serde(with = "u256_dec", default = "default_vesting_rate")]
    pub vesting_rate: U256,

    /// Initial fee rates in bps
    #[serde(default)]
    pub fees: FeeSchedule,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

fn default_min_deposit() -> U256 {
    DEFAULT_MIN_DEPOSIT
}

fn default_max_assets() -> U256 {
    DEFAULT_MAX_ASSETS
}

fn default_vesting_rate() -> U256 {
    DEFAULT_VESTING_RATE
}

impl PoolConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> PoolResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PoolError::ConfigIo(format!("Failed to read config file {}: {}", path, e)))?;

        Self::from_toml_str(&content)
            .map_err(|e| match e {
                PoolError::ConfigParse(msg) => PoolError::ConfigParse(format!("{}: {}", path, msg)),
                other => other,
            })
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> PoolResult<Self> {
        let config: PoolConfig = toml::from_str(content)
            .map_err(|e| PoolError::ConfigParse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml_string(&self) -> PoolResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PoolError::ConfigParse(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> PoolResult<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content)
            .map_err(|e| PoolError::ConfigIo(format!("Failed to write config file {}: {}", path, e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> PoolResult<()> {
        if self.name.is_empty() {
            return Err(PoolError::invalid_config("name", "empty", "non-empty string"));
        }

        if self.symbol.is_empty() {
            return Err(PoolError::invalid_config("symbol", "empty", "non-empty string"));
        }

        if self.owner.is_zero() {
            return Err(PoolError::invalid_config("owner", self.owner, "non-zero address"));
        }

        if self.asset.is_zero() {
            return Err(PoolError::invalid_config("asset", self.asset, "non-zero address"));
        }

        if self.vesting_rate > VESTING_RATE_COEFFICIENT {
            return Err(PoolError::invalid_config(
                "vesting_rate",
                self.vesting_rate,
                format!("at most {}", VESTING_RATE_COEFFICIENT),
            ));
        }

        if self.min_deposit > self.max_assets {
            return Err(PoolError::invalid_config(
                "min_deposit",
                self.min_deposit,
                format!("at most max_assets ({})", self.max_assets),
            ));
        }

        self.fees.validate()?;

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: CONTRACT_NAME.to_string(),
            symbol: "DDP".to_string(),
            decimals: DEFAULT_DECIMALS,
            owner: Address::ZERO,
            asset: Address::ZERO,
            min_deposit: DEFAULT_MIN_DEPOSIT,
            max_assets: DEFAULT_MAX_ASSETS,
            vesting_rate: DEFAULT_VESTING_RATE,
            fees: FeeSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
name = "Debt DAO Pool"
symbol = "KIBA"
owner = "0x0000000000000000000000000000000000000001"
asset = "0x0000000000000000000000000000000000000002"
max_assets = "max"
min_deposit = "1000"

[fees]
performance = 1000
deposit = 50
collector = 200
"#;

    #[test]
    fn test_parse_example() {
        let config = PoolConfig::from_toml_str(EXAMPLE).unwrap();
        assert_eq!(config.symbol, "KIBA");
        assert_eq!(config.decimals, 18);
        assert_eq!(config.owner, Address::from_low_u64_be(1));
        assert_eq!(config.max_assets, U256::MAX);
        assert_eq!(config.min_deposit, U256::new(1000));
        assert_eq!(config.vesting_rate, DEFAULT_VESTING_RATE);
        assert_eq!(config.fees.performance, 1000);
        assert_eq!(config.fees.withdraw, 0);
    }

    #[test]
    fn test_rejects_pittance_fee_above_cap() {
        let content = EXAMPLE.replace("deposit = 50", "deposit = 201");
        assert!(matches!(
            PoolConfig::from_toml_str(&content),
            Err(PoolError::FeeTooHigh { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_owner() {
        let config = PoolConfig {
            asset: Address::from_low_u64_be(2),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfig { name: "owner", .. })
        ));
    }

    #[test]
    fn test_rejects_fast_vesting() {
        let config = PoolConfig {
            owner: Address::from_low_u64_be(1),
            asset: Address::from_low_u64_be(2),
            vesting_rate: VESTING_RATE_COEFFICIENT + U256::ONE,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PoolConfig::from_toml_str(EXAMPLE).unwrap();
        let encoded = config.to_toml_string().unwrap();
        assert_eq!(PoolConfig::from_toml_str(&encoded).unwrap(), config);
    }

    #[test]
    fn test_save_and_load() {
        let config = PoolConfig::from_toml_str(EXAMPLE).unwrap();
        let path = std::env::temp_dir().join(format!("debtdao-pool-{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();
        config.save(&path).unwrap();
        assert_eq!(PoolConfig::load(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(PoolConfig::load(&path), Err(PoolError::ConfigIo(_))));
    }
}
