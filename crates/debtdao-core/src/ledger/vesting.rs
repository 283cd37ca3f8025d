//! Profit vesting
//!
//! Realized profit is locked when it enters the pool and released linearly:
//! each second `vesting_rate / 1e18` of the locked balance at the last report
//! becomes part of the share price.

use ethnum::U256;
use tracing::trace;

use crate::constants::VESTING_RATE_COEFFICIENT;
use crate::errors::{PoolError, PoolResult};
use crate::math::{mul_div_down, safe_add, safe_mul, safe_sub};
use crate::types::PoolState;

/// Profit released from `locked` after `elapsed` seconds at `rate`
pub fn vested_amount(locked: U256, elapsed: u64, rate: U256) -> PoolResult<U256> {
    if locked == U256::ZERO || elapsed == 0 || rate == U256::ZERO {
        return Ok(U256::ZERO);
    }
    let progress = safe_mul(U256::new(elapsed as u128), rate)?;
    if progress >= VESTING_RATE_COEFFICIENT {
        return Ok(locked);
    }
    mul_div_down(locked, progress, VESTING_RATE_COEFFICIENT)
}

/// Release vested profit as of `now`. Moves `last_report` to `now`, never backwards
pub fn unlock_profits(state: &mut PoolState, now: u64) -> PoolResult<U256> {
    let elapsed = now.saturating_sub(state.last_report);
    let vested = vested_amount(state.locked_profit, elapsed, state.vesting_rate)?;
    state.locked_profit = safe_sub(state.locked_profit, vested)?;
    state.last_report = now.max(state.last_report);
    if vested > U256::ZERO {
        trace!(%vested, locked = %state.locked_profit, elapsed, "unlocked profit");
    }
    Ok(vested)
}

/// Lock newly realized profit. Counts toward `total_assets` immediately
pub fn lock_profit(state: &mut PoolState, profit: U256) -> PoolResult<()> {
    state.total_assets = safe_add(state.total_assets, profit)?;
    state.locked_profit = safe_add(state.locked_profit, profit)?;
    Ok(())
}

pub fn set_vesting_rate(state: &mut PoolState, rate: U256) -> PoolResult<()> {
    if rate > VESTING_RATE_COEFFICIENT {
        return Err(PoolError::VestingRateTooHigh(rate.to_string()));
    }
    state.vesting_rate = rate;
    Ok(())
}
