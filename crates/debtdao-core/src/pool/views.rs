//! Read-only queries
//!
//! Views price shares as of the last reconciliation. Profit that vested since
//! then is only reflected once a mutating operation or `unlock_profits` runs,
//! except in [`Pool::price_at`].

use ethnum::U256;

use super::Pool;
use crate::constants::API_VERSION;
use crate::errors::PoolResult;
use crate::ledger::fees::assess_fee;
use crate::ledger::{roles, vesting, Role};
use crate::math::{price, safe_add, safe_sub, to_assets, to_assets_up, to_shares};
use crate::types::{Address, FeeSchedule, FeeType, PositionId};

impl Pool {
    // ========================================================================
    // Accounting
    // ========================================================================

    pub fn total_assets(&self) -> U256 {
        self.state.total_assets
    }

    pub fn total_supply(&self) -> U256 {
        self.state.total_supply
    }

    pub fn total_deployed(&self) -> U256 {
        self.state.total_deployed
    }

    pub fn locked_profit(&self) -> U256 {
        self.state.locked_profit
    }

    pub fn last_report(&self) -> u64 {
        self.state.last_report
    }

    pub fn vesting_rate(&self) -> U256 {
        self.state.vesting_rate
    }

    pub fn liquid_assets(&self) -> PoolResult<U256> {
        self.state.liquid_assets()
    }

    /// Share price scaled by `PRICE_DECIMALS`
    pub fn price(&self) -> PoolResult<U256> {
        self.state.price()
    }

    /// Share price once profit vested up to `now` is released
    pub fn price_at(&self, now: u64) -> PoolResult<U256> {
        let elapsed = now.saturating_sub(self.state.last_report);
        let vested = vesting::vested_amount(self.state.locked_profit, elapsed, self.state.vesting_rate)?;
        let vault_assets = safe_add(self.state.vault_assets()?, vested)?;
        price(vault_assets, self.state.total_supply)
    }

    pub fn impairments(&self, line: Address) -> U256 {
        self.state.impairment(line)
    }

    /// Principal booked against a credit position
    pub fn credit_principal(&self, line: Address, id: PositionId) -> U256 {
        self.state.credit_book(line, id)
    }

    pub fn vault_investments(&self, vault: Address) -> U256 {
        self.state.vault_investment(vault)
    }

    // ========================================================================
    // Fees and roles
    // ========================================================================

    pub fn fees(&self) -> FeeSchedule {
        self.state.fees
    }

    pub fn fee(&self, fee_type: FeeType) -> u16 {
        self.state.fees.get(fee_type)
    }

    /// Fee shares held for the revenue recipient
    pub fn accrued_fees(&self) -> U256 {
        self.state.accrued_fees()
    }

    pub fn claimable_rev(&self, token: Address) -> U256 {
        if token == self.state.address {
            self.state.accrued_fees()
        } else {
            U256::ZERO
        }
    }

    pub fn owner(&self) -> Address {
        self.state.owner
    }

    pub fn pending_owner(&self) -> Address {
        self.state.pending_owner
    }

    pub fn rev_recipient(&self) -> Address {
        self.state.rev_recipient
    }

    pub fn pending_rev_recipient(&self) -> Address {
        self.state.pending_rev_recipient
    }

    pub fn role_holder(&self, role: Role) -> Address {
        roles::holder(&self.state, role)
    }

    // ========================================================================
    // Share token
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.state.decimals
    }

    pub fn asset(&self) -> Address {
        self.state.asset
    }

    pub fn api_version(&self) -> &'static str {
        API_VERSION
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.state.balance_of(owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state.allowance(owner, spender)
    }

    // ========================================================================
    // ERC4626 conversions
    // ========================================================================

    pub fn convert_to_shares(&self, assets: U256) -> PoolResult<U256> {
        to_shares(assets, self.state.price()?)
    }

    pub fn convert_to_assets(&self, shares: U256) -> PoolResult<U256> {
        to_assets(shares, self.state.price()?)
    }

    /// Assets that can still be deposited before hitting `max_assets`
    pub fn max_deposit(&self, _receiver: Address) -> U256 {
        self.state.max_assets.saturating_sub(self.state.total_assets)
    }

    pub fn max_mint(&self, receiver: Address) -> PoolResult<U256> {
        self.convert_to_shares(self.max_deposit(receiver))
    }

    /// Assets `owner` can withdraw now, net of fees and capped by liquidity
    pub fn max_withdraw(&self, owner: Address) -> PoolResult<U256> {
        let redeemable = self.preview_redeem(self.state.balance_of(owner))?;
        Ok(redeemable.min(self.state.liquid_assets()?))
    }

    pub fn max_redeem(&self, owner: Address) -> PoolResult<U256> {
        let balance = self.state.balance_of(owner);
        let liquid_shares = self.preview_withdraw(self.state.liquid_assets()?)?;
        Ok(balance.min(liquid_shares))
    }

    /// Shares a deposit of `assets` mints to the receiver, after the deposit fee
    pub fn preview_deposit(&self, assets: U256) -> PoolResult<U256> {
        let price = self.state.price()?;
        let fee = assess_fee(&self.state, FeeType::Deposit, assets, price)?;
        safe_sub(to_shares(assets, price)?, fee.fee_shares)
    }

    /// Assets a mint of `shares` costs, deposit fee included
    pub fn preview_mint(&self, shares: U256) -> PoolResult<U256> {
        let price = self.state.price()?;
        let fee = assess_fee(&self.state, FeeType::Deposit, to_assets(shares, price)?, price)?;
        to_assets_up(safe_add(shares, fee.fee_shares)?, price)
    }

    /// Shares a withdrawal of `assets` takes from the owner, withdraw fee included
    pub fn preview_withdraw(&self, assets: U256) -> PoolResult<U256> {
        let price = self.state.price()?;
        let fee = assess_fee(&self.state, FeeType::Withdraw, assets, price)?;
        safe_add(to_shares(assets, price)?, fee.fee_shares)
    }

    /// Assets a redemption of `shares` pays out, after the withdraw fee
    pub fn preview_redeem(&self, shares: U256) -> PoolResult<U256> {
        let price = self.state.price()?;
        let fee = assess_fee(&self.state, FeeType::Withdraw, to_assets(shares, price)?, price)?;
        to_assets(safe_sub(shares, fee.fee_shares)?, price)
    }
}
