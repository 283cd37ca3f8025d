//! In-memory collaborators for driving a pool in tests

use std::collections::BTreeMap;

use debtdao_core::interfaces::{CreditLine, Erc4626Vault, ExternalError, ExternalResult, FlashBorrower};
use debtdao_core::{Address, CallContext, CreditPosition, LineStatus, PositionId, Rates, INTEREST_RATE_COEFFICIENT, U256};

// ============================================================================
// Credit Line
// ============================================================================

/// Credit line with one borrower and simple per-second interest.
///
/// Interest on a position is `amount * rate_bps * seconds / INTEREST_RATE_COEFFICIENT`
/// for the drawn and undrawn parts separately. Repayments pay interest first.
#[derive(Debug, Clone)]
pub struct MockLine {
    address: Address,
    status: LineStatus,
    positions: BTreeMap<PositionId, CreditPosition>,
    rates: BTreeMap<PositionId, Rates>,
    revert_reason: Option<String>,
}

impl MockLine {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            status: LineStatus::Active,
            positions: BTreeMap::new(),
            rates: BTreeMap::new(),
            revert_reason: None,
        }
    }

    pub fn set_status(&mut self, status: LineStatus) {
        self.status = status;
    }

    pub fn declare_insolvent(&mut self) {
        self.status = LineStatus::Insolvent;
    }

    /// Make every mutating call revert with `reason` until cleared
    pub fn set_reverting(&mut self, reason: Option<&str>) {
        self.revert_reason = reason.map(str::to_string);
    }

    /// Overwrite a position, e.g. to simulate a foreign lender
    pub fn force_position(&mut self, id: PositionId, position: CreditPosition) {
        self.positions.insert(id, position);
        self.rates.entry(id).or_default();
    }

    pub fn position(&self, id: PositionId) -> Option<&CreditPosition> {
        self.positions.get(&id)
    }

    /// Borrower draws `amount` from undrawn deposit
    pub fn borrow(&mut self, id: PositionId, amount: U256, now: u64) -> ExternalResult<()> {
        self.accrue(id, now)?;
        let position = self.position_mut(id)?;
        let undrawn = position.deposit - position.principal;
        if amount > undrawn {
            return Err(ExternalError::reverted("no liquidity"));
        }
        position.principal += amount;
        Ok(())
    }

    /// Borrower repays `amount`, interest first then principal
    pub fn deposit_and_repay(&mut self, id: PositionId, amount: U256, now: u64) -> ExternalResult<()> {
        self.accrue(id, now)?;
        let position = self.position_mut(id)?;
        let interest = amount.min(position.interest_accrued);
        let principal = amount - interest;
        if principal > position.principal {
            return Err(ExternalError::reverted("repay exceeds debt"));
        }
        position.interest_accrued -= interest;
        position.interest_repaid += interest;
        position.principal -= principal;
        Ok(())
    }

    /// Borrower repays all interest and principal owed on a position
    pub fn deposit_and_close(&mut self, id: PositionId, now: u64) -> ExternalResult<()> {
        self.accrue(id, now)?;
        let owed = {
            let position = self.position_mut(id)?;
            position.interest_accrued + position.principal
        };
        self.deposit_and_repay(id, owed, now)
    }

    /// Close a fully repaid position
    pub fn close(&mut self, id: PositionId, now: u64) -> ExternalResult<()> {
        self.accrue(id, now)?;
        let position = self.position_mut(id)?;
        if position.principal > U256::ZERO || position.interest_accrued > U256::ZERO {
            return Err(ExternalError::reverted("close with debt"));
        }
        position.is_open = false;
        Ok(())
    }

    fn position_mut(&mut self, id: PositionId) -> ExternalResult<&mut CreditPosition> {
        self.positions
            .get_mut(&id)
            .ok_or_else(|| ExternalError::reverted("position not found"))
    }

    fn check_reverting(&self) -> ExternalResult<()> {
        match &self.revert_reason {
            Some(reason) => Err(ExternalError::reverted(reason.clone())),
            None => Ok(()),
        }
    }

    fn only_lender(&self, ctx: &CallContext, id: PositionId) -> ExternalResult<()> {
        match self.positions.get(&id) {
            Some(position) if position.lender == ctx.sender => Ok(()),
            Some(_) => Err(ExternalError::reverted("caller is not lender")),
            None => Err(ExternalError::reverted("position not found")),
        }
    }

    fn accrue(&mut self, id: PositionId, now: u64) -> ExternalResult<()> {
        let rates = self.rates.get(&id).copied().unwrap_or_default();
        let elapsed = now.saturating_sub(rates.last_accrued);
        let position = self.position_mut(id)?;
        if elapsed > 0 {
            let secs = U256::new(elapsed as u128);
            let drawn = position.principal * U256::new(rates.drate) * secs / INTEREST_RATE_COEFFICIENT;
            let undrawn = (position.deposit - position.principal) * U256::new(rates.frate) * secs
                / INTEREST_RATE_COEFFICIENT;
            position.interest_accrued += drawn + undrawn;
        }
        self.rates.entry(id).or_default().last_accrued = now;
        Ok(())
    }
}

impl CreditLine for MockLine {
    fn address(&self) -> Address {
        self.address
    }

    fn status(&self) -> ExternalResult<LineStatus> {
        Ok(self.status)
    }

    fn compute_id(&self, lender: Address, token: Address) -> PositionId {
        let mut bytes = [0u8; 32];
        bytes[..20].copy_from_slice(lender.as_bytes());
        bytes[20..].copy_from_slice(&token.as_bytes()[8..]);
        PositionId::new(bytes)
    }

    fn credits(&self, id: PositionId) -> ExternalResult<CreditPosition> {
        Ok(self.positions.get(&id).copied().unwrap_or_default())
    }

    fn rates(&self, id: PositionId) -> ExternalResult<Rates> {
        Ok(self.rates.get(&id).copied().unwrap_or_default())
    }

    fn accrue_interest(&mut self, ctx: &CallContext, id: PositionId) -> ExternalResult<()> {
        self.check_reverting()?;
        if self.positions.contains_key(&id) {
            self.accrue(id, ctx.timestamp)?;
        }
        Ok(())
    }

    fn add_credit(
        &mut self,
        ctx: &CallContext,
        drate: u128,
        frate: u128,
        amount: U256,
        token: Address,
    ) -> ExternalResult<PositionId> {
        self.check_reverting()?;
        if self.status != LineStatus::Active {
            return Err(ExternalError::reverted("line not active"));
        }
        let id = self.compute_id(ctx.sender, token);
        if self.positions.get(&id).is_some_and(|p| p.is_open) {
            return Err(ExternalError::reverted("position exists"));
        }
        self.positions.insert(
            id,
            CreditPosition {
                deposit: amount,
                decimals: 18,
                token,
                lender: ctx.sender,
                is_open: true,
                ..Default::default()
            },
        );
        self.rates.insert(
            id,
            Rates {
                drate,
                frate,
                last_accrued: ctx.timestamp,
            },
        );
        Ok(id)
    }

    fn increase_credit(&mut self, ctx: &CallContext, id: PositionId, amount: U256) -> ExternalResult<()> {
        self.check_reverting()?;
        self.only_lender(ctx, id)?;
        self.accrue(id, ctx.timestamp)?;
        self.position_mut(id)?.deposit += amount;
        Ok(())
    }

    fn set_rates(&mut self, ctx: &CallContext, id: PositionId, drate: u128, frate: u128) -> ExternalResult<()> {
        self.check_reverting()?;
        self.only_lender(ctx, id)?;
        self.accrue(id, ctx.timestamp)?;
        let rates = self.rates.entry(id).or_default();
        rates.drate = drate;
        rates.frate = frate;
        Ok(())
    }

    fn withdraw(&mut self, ctx: &CallContext, id: PositionId, amount: U256) -> ExternalResult<()> {
        self.check_reverting()?;
        self.only_lender(ctx, id)?;
        let position = self.position_mut(id)?;
        let available = position.deposit - position.principal + position.interest_repaid;
        if amount > available {
            return Err(ExternalError::reverted("no liquidity"));
        }
        let interest = amount.min(position.interest_repaid);
        position.interest_repaid -= interest;
        position.deposit -= amount - interest;
        Ok(())
    }
}

// ============================================================================
// Vault
// ============================================================================

/// Share vault whose asset value can be marked up or down at will
#[derive(Debug, Clone)]
pub struct MockVault {
    address: Address,
    asset: Address,
    total_assets: U256,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
}

impl MockVault {
    pub fn new(address: Address, asset: Address) -> Self {
        Self {
            address,
            asset,
            total_assets: U256::ZERO,
            total_supply: U256::ZERO,
            balances: BTreeMap::new(),
        }
    }

    /// Vault strategy earns `amount`
    pub fn simulate_gain(&mut self, amount: U256) {
        self.total_assets += amount;
    }

    /// Vault strategy loses `amount`
    pub fn simulate_loss(&mut self, amount: U256) {
        self.total_assets = self.total_assets.saturating_sub(amount);
    }

    fn to_shares(&self, assets: U256) -> U256 {
        if self.total_supply == U256::ZERO || self.total_assets == U256::ZERO {
            assets
        } else {
            assets * self.total_supply / self.total_assets
        }
    }

    fn to_shares_up(&self, assets: U256) -> U256 {
        if self.total_supply == U256::ZERO || self.total_assets == U256::ZERO {
            return assets;
        }
        let product = assets * self.total_supply;
        let shares = product / self.total_assets;
        if product % self.total_assets == U256::ZERO {
            shares
        } else {
            shares + U256::ONE
        }
    }
}

impl Erc4626Vault for MockVault {
    fn address(&self) -> Address {
        self.address
    }

    fn asset(&self) -> Address {
        self.asset
    }

    fn total_assets(&self) -> U256 {
        self.total_assets
    }

    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    fn convert_to_assets(&self, shares: U256) -> ExternalResult<U256> {
        if self.total_supply == U256::ZERO {
            return Ok(shares);
        }
        Ok(shares * self.total_assets / self.total_supply)
    }

    fn deposit(&mut self, _ctx: &CallContext, assets: U256, receiver: Address) -> ExternalResult<U256> {
        let shares = self.to_shares(assets);
        self.total_assets += assets;
        self.total_supply += shares;
        *self.balances.entry(receiver).or_default() += shares;
        Ok(shares)
    }

    fn withdraw(
        &mut self,
        _ctx: &CallContext,
        assets: U256,
        _receiver: Address,
        owner: Address,
    ) -> ExternalResult<U256> {
        if assets > self.total_assets {
            return Err(ExternalError::reverted("insufficient assets"));
        }
        let shares = self.to_shares_up(assets).min(self.total_supply);
        let balance = self.balance_of(owner);
        if shares > balance {
            return Err(ExternalError::reverted("insufficient shares"));
        }
        self.balances.insert(owner, balance - shares);
        self.total_supply -= shares;
        self.total_assets -= assets;
        Ok(shares)
    }
}

// ============================================================================
// Flash Borrower
// ============================================================================

/// How much of a flash loan the borrower pays back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repayment {
    /// Principal plus fee
    Full,
    /// Principal only
    PrincipalOnly,
    /// Callback reverts
    Revert,
}

#[derive(Debug, Clone)]
pub struct MockFlashBorrower {
    address: Address,
    repayment: Repayment,
    /// `(initiator, amount, fee)` of every callback received
    pub calls: Vec<(Address, U256, U256)>,
}

impl MockFlashBorrower {
    pub fn new(address: Address, repayment: Repayment) -> Self {
        Self {
            address,
            repayment,
            calls: Vec::new(),
        }
    }
}

impl FlashBorrower for MockFlashBorrower {
    fn address(&self) -> Address {
        self.address
    }

    fn on_flash_loan(&mut self, initiator: Address, _token: Address, amount: U256, fee: U256) -> ExternalResult<U256> {
        self.calls.push((initiator, amount, fee));
        match self.repayment {
            Repayment::Full => Ok(amount + fee),
            Repayment::PrincipalOnly => Ok(amount),
            Repayment::Revert => Err(ExternalError::reverted("borrower failed")),
        }
    }
}
