//! # Pool Ledger
//!
//! Caller-facing operations of a single pool. Every mutating operation runs
//! inside a [`WorkUnit`]: it first reconciles profit vesting, prices shares
//! at the reconciled state, applies its asset and share deltas, assesses fees
//! and finally updates the deployment counters. Any error discards the whole
//! unit.

mod admin;
mod credit;
mod deposits;
mod flash;
mod vault_impl;
mod vaults;
mod views;

use ethnum::U256;
use tracing::{debug, info};

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::ledger::credit::Deployment;
use crate::ledger::fees::{self, FeeCharge, FeeReceiver, Settlement};
use crate::ledger::{roles, shares, vesting, Role};
use crate::math::{safe_sub, to_assets, to_shares};
use crate::types::{Address, CallContext, CreditPosition, FeeType, PoolEvent, PoolState, PositionId};
use crate::unit_of_work::WorkUnit;

/// How a realized loss was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LossAbsorption {
    /// Asset value of accrued fee shares burned against the loss
    pub fees_burned: U256,
    /// Loss left after burning fees
    pub net_asset_loss: U256,
    /// Fee shares paid to the caller as a bounty
    pub snitch_shares: U256,
}

/// A Debt DAO lending pool
#[derive(Debug, Clone)]
pub struct Pool {
    state: PoolState,
    events: Vec<PoolEvent>,
}

impl Pool {
    /// Create a pool at `address` from a validated configuration
    pub fn new(address: Address, config: &PoolConfig, now: u64) -> PoolResult<Self> {
        config.validate()?;
        if address.is_zero() {
            return Err(PoolError::invalid_config("address", address, "non-zero address"));
        }

        let mut state = PoolState::new(address, config.asset, config.owner, now);
        state.name = config.name.clone();
        state.symbol = config.symbol.clone();
        state.decimals = config.decimals;
        state.fees = config.fees;
        state.min_deposit = config.min_deposit;
        state.max_assets = config.max_assets;
        state.vesting_rate = config.vesting_rate;

        info!(
            pool = %address,
            asset = %config.asset,
            owner = %config.owner,
            symbol = %config.symbol,
            "pool created"
        );
        Ok(Self::from_state(state))
    }

    /// Resume a pool from a previously captured state
    pub fn from_state(state: PoolState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn address(&self) -> Address {
        self.state.address
    }

    /// Events committed since creation or the last drain
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run `op` atomically against a pending copy of the state
    fn transact<T>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut WorkUnit) -> PoolResult<T>,
    ) -> PoolResult<T> {
        let mut unit = WorkUnit::begin(&self.state);
        match op(&mut unit) {
            Ok(value) => {
                let (state, events) = unit.commit();
                self.state = state;
                for event in events {
                    debug!(op = name, event = %event.name(), ?event, "pool event");
                    self.events.push(event);
                }
                Ok(value)
            }
            Err(err) => {
                unit.rollback();
                debug!(op = name, error = %err, "pool operation reverted");
                Err(err)
            }
        }
    }
}

// ============================================================================
// Shared Operation Steps
// ============================================================================

/// Release vested profit and return the share price to act on
fn reconcile(unit: &mut WorkUnit, ctx: &CallContext) -> PoolResult<U256> {
    let state = unit.state_mut();
    vesting::unlock_profits(state, ctx.timestamp)?;
    state.price()
}

fn only_owner(unit: &WorkUnit, ctx: &CallContext) -> PoolResult<()> {
    roles::ensure(unit.state(), ctx.sender, Role::Owner)
}

/// Fail unless the pool is the lender of a position in its own asset
fn ensure_lender(state: &PoolState, position: &CreditPosition) -> PoolResult<()> {
    if position.lender != state.address {
        return Err(PoolError::NotLender);
    }
    if position.token != state.asset {
        return Err(PoolError::ForeignToken);
    }
    Ok(())
}

/// Charge performance fee on `profit` and collector fee on what remains
fn charge_profit_fees(unit: &mut WorkUnit, caller: Address, profit: U256, price: U256) -> PoolResult<()> {
    let pool = unit.state().address;
    let performance = fees::charge_fee(
        unit.state_mut(),
        FeeCharge {
            fee_type: FeeType::Performance,
            gross: profit,
            price,
            payer: pool,
            receiver: FeeReceiver::Pool,
            settlement: Settlement::Mint,
        },
    )?;
    let collector = fees::charge_fee(
        unit.state_mut(),
        FeeCharge {
            fee_type: FeeType::Collector,
            gross: performance.assessment.net,
            price,
            payer: pool,
            receiver: FeeReceiver::Account(caller),
            settlement: Settlement::Mint,
        },
    )?;
    unit.emit_opt(performance.event);
    unit.emit_opt(collector.event);
    Ok(())
}

/// Lock newly realized profit and charge fees on it
fn realize_profit(unit: &mut WorkUnit, caller: Address, profit: U256, price: U256) -> PoolResult<()> {
    if profit == U256::ZERO {
        return Ok(());
    }
    vesting::lock_profit(unit.state_mut(), profit)?;
    charge_profit_fees(unit, caller, profit, price)
}

/// Write `loss` off `total_assets`.
///
/// A caller other than the owner first receives the snitch bounty out of
/// accrued fees. Remaining accrued fees are burned against the loss, then
/// unvested profit absorbs what is left before depositors do.
fn absorb_loss(
    unit: &mut WorkUnit,
    caller: Address,
    loss: U256,
    snitch_basis: U256,
    price: U256,
) -> PoolResult<LossAbsorption> {
    let state = unit.state_mut();
    let pool = state.address;
    state.total_assets = safe_sub(state.total_assets, loss)?;

    let mut snitch_shares = U256::ZERO;
    if caller != state.owner {
        let bounty = fees::assess_fee(state, FeeType::Snitch, snitch_basis, price)?;
        snitch_shares = bounty.fee_shares.min(state.accrued_fees());
        shares::transfer(state, pool, caller, snitch_shares)?;
        let event = fees::revenue_event(
            state,
            FeeType::Snitch,
            pool,
            snitch_basis,
            snitch_shares,
            FeeReceiver::Account(caller),
        );
        unit.emit(event);
    }

    let state = unit.state_mut();
    let accrued = state.accrued_fees();
    let burned_shares = to_shares(loss, price)?.min(accrued);
    let fees_burned = to_assets(burned_shares, price)?.min(loss);
    shares::burn(state, pool, burned_shares)?;

    let net_asset_loss = loss - fees_burned;
    let absorbed = net_asset_loss.min(state.locked_profit);
    state.locked_profit -= absorbed;

    Ok(LossAbsorption {
        fees_burned,
        net_asset_loss,
        snitch_shares,
    })
}

/// Deployment key for a credit position
fn credit_slot(line: Address, id: PositionId) -> Deployment {
    Deployment::Credit((line, id))
}

