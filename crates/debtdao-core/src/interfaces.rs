//! # Collaborator Interfaces
//!
//! The pool's only way out of its own ledger. Every call here is fallible and
//! may be issued against an untrusted contract; the pool applies its own
//! accounting only after the call succeeds.

use ethnum::U256;
use thiserror::Error;

use crate::types::{Address, CallContext, CreditPosition, LineStatus, PositionId, Rates};

/// Failure raised by an external contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalError {
    #[error("reverted: {0}")]
    Reverted(String),
}

impl ExternalError {
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted(reason.into())
    }
}

/// Result of an external call
pub type ExternalResult<T> = Result<T, ExternalError>;

/// Credit line the pool lends into
pub trait CreditLine {
    fn address(&self) -> Address;

    fn status(&self) -> ExternalResult<LineStatus>;

    /// Deterministic position id for a lender/token pair
    fn compute_id(&self, lender: Address, token: Address) -> PositionId;

    fn credits(&self, id: PositionId) -> ExternalResult<CreditPosition>;

    fn rates(&self, id: PositionId) -> ExternalResult<Rates>;

    /// Bring `interest_accrued` up to `ctx.timestamp`
    fn accrue_interest(&mut self, ctx: &CallContext, id: PositionId) -> ExternalResult<()>;

    /// Open a position funded with `amount` of `token`, lent by `ctx.sender`
    fn add_credit(
        &mut self,
        ctx: &CallContext,
        drate: u128,
        frate: u128,
        amount: U256,
        token: Address,
    ) -> ExternalResult<PositionId>;

    fn increase_credit(&mut self, ctx: &CallContext, id: PositionId, amount: U256) -> ExternalResult<()>;

    fn set_rates(&mut self, ctx: &CallContext, id: PositionId, drate: u128, frate: u128) -> ExternalResult<()>;

    /// Pull `amount` out of a position, repaid interest first, then undrawn deposit
    fn withdraw(&mut self, ctx: &CallContext, id: PositionId, amount: U256) -> ExternalResult<()>;
}

/// ERC4626-like vault the pool can invest in. The pool implements it too
pub trait Erc4626Vault {
    fn address(&self) -> Address;

    fn asset(&self) -> Address;

    fn total_assets(&self) -> U256;

    fn balance_of(&self, owner: Address) -> U256;

    fn convert_to_assets(&self, shares: U256) -> ExternalResult<U256>;

    /// Deposit `assets` from `ctx.sender`, returning shares minted to `receiver`
    fn deposit(&mut self, ctx: &CallContext, assets: U256, receiver: Address) -> ExternalResult<U256>;

    /// Withdraw exactly `assets` from `owner`, returning shares burned
    fn withdraw(
        &mut self,
        ctx: &CallContext,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> ExternalResult<U256>;
}

/// Receiver of an ERC3156-style flash loan
pub trait FlashBorrower {
    fn address(&self) -> Address;

    /// Use the loan and return the amount repaid, which must cover `amount + fee`
    fn on_flash_loan(
        &mut self,
        initiator: Address,
        token: Address,
        amount: U256,
        fee: U256,
    ) -> ExternalResult<U256>;
}
