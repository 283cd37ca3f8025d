//! Deployed capital book
//!
//! Tracks principal the pool has sent to credit positions and vaults.
//! `total_deployed` always equals the sum of the credit book and vault
//! investments.

use ethnum::U256;

use crate::errors::{PoolError, PoolResult};
use crate::ledger::vesting::lock_profit;
use crate::math::{safe_add, safe_sub};
use crate::types::{Address, CreditKey, PoolState};

/// Where deployed principal sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Credit(CreditKey),
    Vault(Address),
}

/// Principal coming back from a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Recovery {
    /// Released from the book
    pub principal: U256,
    /// Recovered beyond the book, realized as locked profit
    pub excess: U256,
}

/// Fail unless `amount` liquid assets are available
pub fn ensure_liquid(state: &PoolState, amount: U256) -> PoolResult<()> {
    let liquid = state.liquid_assets()?;
    if amount > liquid {
        return Err(PoolError::insufficient_liquidity(amount, liquid));
    }
    Ok(())
}

/// Principal recorded against a deployment
pub fn booked(state: &PoolState, deployment: Deployment) -> U256 {
    match deployment {
        Deployment::Credit((line, id)) => state.credit_book(line, id),
        Deployment::Vault(vault) => state.vault_investment(vault),
    }
}

fn set_booked(state: &mut PoolState, deployment: Deployment, amount: U256) {
    match deployment {
        Deployment::Credit(key) => {
            if amount == U256::ZERO {
                state.credit_book.remove(&key);
            } else {
                state.credit_book.insert(key, amount);
            }
        }
        Deployment::Vault(vault) => {
            if amount == U256::ZERO {
                state.vault_investments.remove(&vault);
            } else {
                state.vault_investments.insert(vault, amount);
            }
        }
    }
}

/// Move liquid assets into a deployment
pub fn deploy(state: &mut PoolState, deployment: Deployment, amount: U256) -> PoolResult<()> {
    ensure_liquid(state, amount)?;
    let book = safe_add(booked(state, deployment), amount)?;
    state.total_deployed = safe_add(state.total_deployed, amount)?;
    set_booked(state, deployment, book);
    Ok(())
}

/// Bring `amount` of principal back. Anything beyond the book is profit
pub fn recover(state: &mut PoolState, deployment: Deployment, amount: U256) -> PoolResult<Recovery> {
    let book = booked(state, deployment);
    let principal = amount.min(book);
    let excess = amount - principal;

    set_booked(state, deployment, book - principal);
    state.total_deployed = safe_sub(state.total_deployed, principal)?;
    if excess > U256::ZERO {
        lock_profit(state, excess)?;
    }
    Ok(Recovery { principal, excess })
}

/// Remove a deployment from the book entirely, returning its principal.
/// The caller accounts for the asset side of the write-off
pub fn write_off(state: &mut PoolState, deployment: Deployment) -> PoolResult<U256> {
    let book = booked(state, deployment);
    set_booked(state, deployment, U256::ZERO);
    state.total_deployed = safe_sub(state.total_deployed, book)?;
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionId;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn funded_state(assets: u128) -> PoolState {
        let mut s = PoolState::new(addr(100), addr(101), addr(1), 0);
        s.total_assets = U256::new(assets);
        s
    }

    fn position() -> Deployment {
        Deployment::Credit((addr(50), PositionId::new([7u8; 32])))
    }

    #[test]
    fn test_deploy_requires_liquidity() {
        let mut s = funded_state(1_000);
        deploy(&mut s, position(), U256::new(600)).unwrap();
        assert_eq!(s.total_deployed, U256::new(600));
        assert!(matches!(
            deploy(&mut s, Deployment::Vault(addr(60)), U256::new(401)),
            Err(PoolError::InsufficientLiquidity { .. })
        ));
        deploy(&mut s, Deployment::Vault(addr(60)), U256::new(400)).unwrap();
        assert_eq!(s.liquid_assets().unwrap(), U256::ZERO);
    }

    #[test]
    fn test_recover_beyond_book_locks_profit() {
        let mut s = funded_state(1_000);
        deploy(&mut s, position(), U256::new(500)).unwrap();
        let r = recover(&mut s, position(), U256::new(300)).unwrap();
        assert_eq!(r, Recovery { principal: U256::new(300), excess: U256::ZERO });
        let r = recover(&mut s, position(), U256::new(250)).unwrap();
        assert_eq!(r, Recovery { principal: U256::new(200), excess: U256::new(50) });
        assert_eq!(s.total_deployed, U256::ZERO);
        assert_eq!(s.total_assets, U256::new(1_050));
        assert_eq!(s.locked_profit, U256::new(50));
        assert!(s.credit_book.is_empty());
    }

    #[test]
    fn test_write_off() {
        let mut s = funded_state(1_000);
        deploy(&mut s, position(), U256::new(500)).unwrap();
        assert_eq!(write_off(&mut s, position()).unwrap(), U256::new(500));
        assert_eq!(s.total_deployed, U256::ZERO);
        assert_eq!(booked(&s, position()), U256::ZERO);
        // assets untouched until the caller realizes the loss
        assert_eq!(s.total_assets, U256::new(1_000));
    }
}
