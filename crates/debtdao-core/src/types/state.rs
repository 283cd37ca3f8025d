//! Pool ledger state
//!
//! A single plain value holding every counter the pool owns. Operations work on
//! a pending copy of it (see `unit_of_work`), so it must stay cheap to clone
//! and comparable for equality.

use std::collections::BTreeMap;

use ethnum::U256;

use crate::errors::PoolResult;
use crate::math::{price, safe_sub};
use crate::types::address::{Address, PositionId};
use crate::types::fees::FeeSchedule;

/// Key of a credit position in the pool's book: (line, position id)
pub type CreditKey = (Address, PositionId);

/// Complete state of one pool instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    // ========================================================================
    // Identity
    // ========================================================================
    /// Address of the pool itself. Also the address of its share token
    pub address: Address,
    /// Underlying asset
    pub asset: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    // ========================================================================
    // Asset Accounting
    // ========================================================================
    /// Liquid + deployed + locked profit, in asset units
    pub total_assets: U256,
    /// Outstanding shares
    pub total_supply: U256,
    /// Assets invested in credit lines and vaults
    pub total_deployed: U256,
    /// Realized profit not yet released into the share price
    pub locked_profit: U256,
    /// Last time vesting was reconciled
    pub last_report: u64,
    /// Share of locked profit released per second, scaled by 1e18
    pub vesting_rate: U256,

    // ========================================================================
    // Configuration
    // ========================================================================
    pub fees: FeeSchedule,
    pub max_assets: U256,
    pub min_deposit: U256,

    // ========================================================================
    // Roles
    // ========================================================================
    pub owner: Address,
    pub pending_owner: Address,
    pub rev_recipient: Address,
    pub pending_rev_recipient: Address,

    // ========================================================================
    // Share Token
    // ========================================================================
    /// Share balances. Accrued fees are the balance held by `address`
    pub balances: BTreeMap<Address, U256>,
    /// (owner, spender) -> shares
    pub allowances: BTreeMap<(Address, Address), U256>,

    // ========================================================================
    // Investments
    // ========================================================================
    /// Principal deployed per credit position
    pub credit_book: BTreeMap<CreditKey, U256>,
    /// Unrecovered principal loss per impaired line
    pub impairments: BTreeMap<Address, U256>,
    /// Principal deployed per vault
    pub vault_investments: BTreeMap<Address, U256>,
}

impl PoolState {
    /// Fresh, empty pool state
    pub fn new(address: Address, asset: Address, owner: Address, now: u64) -> Self {
        use crate::constants::*;
        Self {
            address,
            asset,
            name: CONTRACT_NAME.to_string(),
            symbol: String::new(),
            decimals: DEFAULT_DECIMALS,
            total_assets: U256::ZERO,
            total_supply: U256::ZERO,
            total_deployed: U256::ZERO,
            locked_profit: U256::ZERO,
            last_report: now,
            vesting_rate: DEFAULT_VESTING_RATE,
            fees: FeeSchedule::default(),
            max_assets: DEFAULT_MAX_ASSETS,
            min_deposit: DEFAULT_MIN_DEPOSIT,
            owner,
            pending_owner: Address::ZERO,
            rev_recipient: owner,
            pending_rev_recipient: Address::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            credit_book: BTreeMap::new(),
            impairments: BTreeMap::new(),
            vault_investments: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Fee shares held by the pool on behalf of `rev_recipient`
    pub fn accrued_fees(&self) -> U256 {
        self.balance_of(self.address)
    }

    /// Assets reflected in the share price
    pub fn vault_assets(&self) -> PoolResult<U256> {
        safe_sub(self.total_assets, self.locked_profit)
    }

    /// Assets neither deployed nor locked
    pub fn liquid_assets(&self) -> PoolResult<U256> {
        safe_sub(self.vault_assets()?, self.total_deployed)
    }

    /// Current share price, scaled by `PRICE_DECIMALS`
    pub fn price(&self) -> PoolResult<U256> {
        price(self.vault_assets()?, self.total_supply)
    }

    pub fn credit_book(&self, line: Address, id: PositionId) -> U256 {
        self.credit_book
            .get(&(line, id))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn impairment(&self, line: Address) -> U256 {
        self.impairments.get(&line).copied().unwrap_or(U256::ZERO)
    }

    pub fn vault_investment(&self, vault: Address) -> U256 {
        self.vault_investments
            .get(&vault)
            .copied()
            .unwrap_or(U256::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_DECIMALS;

    fn state() -> PoolState {
        PoolState::new(
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            Address::from_low_u64_be(3),
            0,
        )
    }

    #[test]
    fn test_new_state_defaults() {
        let s = state();
        assert_eq!(s.rev_recipient, s.owner);
        assert_eq!(s.price().unwrap(), PRICE_DECIMALS);
        assert_eq!(s.liquid_assets().unwrap(), U256::ZERO);
        assert_eq!(s.accrued_fees(), U256::ZERO);
    }

    #[test]
    fn test_liquid_excludes_deployed_and_locked() {
        let mut s = state();
        s.total_assets = U256::new(1_000);
        s.total_deployed = U256::new(300);
        s.locked_profit = U256::new(100);
        assert_eq!(s.vault_assets().unwrap(), U256::new(900));
        assert_eq!(s.liquid_assets().unwrap(), U256::new(600));
    }

    #[test]
    fn test_locked_profit_not_priced() {
        let mut s = state();
        s.total_assets = U256::new(1_100);
        s.total_supply = U256::new(1_000);
        s.locked_profit = U256::new(100);
        assert_eq!(s.price().unwrap(), PRICE_DECIMALS);
    }
}
