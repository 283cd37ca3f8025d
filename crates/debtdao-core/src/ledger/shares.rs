//! Share balances
//!
//! Mint, burn and move pool shares. `total_supply` always equals the sum of
//! all balances, including the fee shares held by the pool itself.

use ethnum::U256;

use crate::errors::{PoolError, PoolResult};
use crate::math::{safe_add, safe_sub};
use crate::types::{Address, PoolState};

pub fn mint(state: &mut PoolState, to: Address, shares: U256) -> PoolResult<()> {
    if shares == U256::ZERO {
        return Ok(());
    }
    if to.is_zero() {
        return Err(PoolError::InvalidReceiver);
    }
    state.total_supply = safe_add(state.total_supply, shares)?;
    let balance = safe_add(state.balance_of(to), shares)?;
    state.balances.insert(to, balance);
    Ok(())
}

pub fn burn(state: &mut PoolState, from: Address, shares: U256) -> PoolResult<()> {
    if shares == U256::ZERO {
        return Ok(());
    }
    let balance = state.balance_of(from);
    if balance < shares {
        return Err(PoolError::insufficient_shares(shares, balance));
    }
    set_balance(state, from, balance - shares);
    state.total_supply = safe_sub(state.total_supply, shares)?;
    Ok(())
}

pub fn transfer(state: &mut PoolState, from: Address, to: Address, shares: U256) -> PoolResult<()> {
    if to.is_zero() {
        return Err(PoolError::InvalidReceiver);
    }
    let from_balance = state.balance_of(from);
    if from_balance < shares {
        return Err(PoolError::insufficient_shares(shares, from_balance));
    }
    if from == to || shares == U256::ZERO {
        return Ok(());
    }
    set_balance(state, from, from_balance - shares);
    let to_balance = safe_add(state.balance_of(to), shares)?;
    state.balances.insert(to, to_balance);
    Ok(())
}

pub fn approve(state: &mut PoolState, owner: Address, spender: Address, shares: U256) {
    if shares == U256::ZERO {
        state.allowances.remove(&(owner, spender));
    } else {
        state.allowances.insert((owner, spender), shares);
    }
}

/// Consume allowance for `spender` acting on `owner`'s shares.
/// Owners spend their own shares freely and a `U256::MAX` allowance never decreases
pub fn spend_allowance(state: &mut PoolState, owner: Address, spender: Address, shares: U256) -> PoolResult<()> {
    if owner == spender {
        return Ok(());
    }
    let allowance = state.allowance(owner, spender);
    if allowance == U256::MAX {
        return Ok(());
    }
    if allowance < shares {
        return Err(PoolError::InsufficientAllowance {
            allowance: allowance.to_string(),
            required: shares.to_string(),
        });
    }
    approve(state, owner, spender, allowance - shares);
    Ok(())
}

fn set_balance(state: &mut PoolState, owner: Address, balance: U256) {
    if balance == U256::ZERO {
        state.balances.remove(&owner);
    } else {
        state.balances.insert(owner, balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn state() -> PoolState {
        PoolState::new(addr(100), addr(101), addr(1), 0)
    }

    fn supply_matches_balances(s: &PoolState) -> bool {
        s.balances.values().fold(U256::ZERO, |acc, b| acc + *b) == s.total_supply
    }

    #[test]
    fn test_mint_burn_transfer() {
        let mut s = state();
        mint(&mut s, addr(2), U256::new(100)).unwrap();
        transfer(&mut s, addr(2), addr(3), U256::new(40)).unwrap();
        burn(&mut s, addr(3), U256::new(10)).unwrap();
        assert_eq!(s.balance_of(addr(2)), U256::new(60));
        assert_eq!(s.balance_of(addr(3)), U256::new(30));
        assert_eq!(s.total_supply, U256::new(90));
        assert!(supply_matches_balances(&s));
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let mut s = state();
        mint(&mut s, addr(2), U256::new(5)).unwrap();
        assert!(matches!(
            burn(&mut s, addr(2), U256::new(6)),
            Err(PoolError::InsufficientShares { .. })
        ));
        assert!(transfer(&mut s, addr(2), addr(3), U256::new(6)).is_err());
    }

    #[test]
    fn test_mint_to_zero_fails() {
        let mut s = state();
        assert_eq!(mint(&mut s, Address::ZERO, U256::ONE), Err(PoolError::InvalidReceiver));
    }

    #[test]
    fn test_allowance() {
        let mut s = state();
        approve(&mut s, addr(2), addr(3), U256::new(10));
        spend_allowance(&mut s, addr(2), addr(3), U256::new(4)).unwrap();
        assert_eq!(s.allowance(addr(2), addr(3)), U256::new(6));
        assert!(spend_allowance(&mut s, addr(2), addr(3), U256::new(7)).is_err());

        approve(&mut s, addr(2), addr(4), U256::MAX);
        spend_allowance(&mut s, addr(2), addr(4), U256::new(1_000)).unwrap();
        assert_eq!(s.allowance(addr(2), addr(4)), U256::MAX);

        // owner needs no allowance
        spend_allowance(&mut s, addr(2), addr(2), U256::MAX).unwrap();
    }
}
