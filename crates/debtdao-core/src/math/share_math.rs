//! Price and share conversion
//!
//! Share price is the value of one share in assets, scaled by `PRICE_DECIMALS`.
//! Conversions floor, except assets owed to the pool which round up. A price of zero is a valid terminal state (the pool
//! was wiped out) and converts every amount to zero.

use ethnum::U256;

use crate::constants::PRICE_DECIMALS;
use crate::errors::PoolResult;
use crate::math::big_int::{mul_div, mul_div_down, Rounding};

/// Share price for `assets` backing `supply` shares.
///
/// An empty pool prices at par. A supply of zero is treated as one share so
/// assets left behind by the last redeemer stay priced instead of dividing by zero.
pub fn price(assets: U256, supply: U256) -> PoolResult<U256> {
    if assets == U256::ZERO {
        return Ok(PRICE_DECIMALS);
    }
    mul_div_down(assets, PRICE_DECIMALS, supply.max(U256::ONE))
}

/// Shares worth `assets` at `price`
pub fn to_shares(assets: U256, price: U256) -> PoolResult<U256> {
    if price == U256::ZERO {
        return Ok(U256::ZERO);
    }
    mul_div_down(assets, PRICE_DECIMALS, price)
}

/// Assets backing `shares` at `price`
pub fn to_assets(shares: U256, price: U256) -> PoolResult<U256> {
    if price == U256::ZERO {
        return Ok(U256::ZERO);
    }
    mul_div_down(shares, price, PRICE_DECIMALS)
}

/// Assets a caller must pay in for `shares` at `price`, rounded up
pub fn to_assets_up(shares: U256, price: U256) -> PoolResult<U256> {
    if price == U256::ZERO {
        return Ok(U256::ZERO);
    }
    mul_div(shares, price, PRICE_DECIMALS, Rounding::Up)
}
