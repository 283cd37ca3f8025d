//! Credit line lending: opening positions, collecting interest, recovering
//! principal and writing off insolvent debt

use ethnum::U256;
use tracing::{debug, info, warn};

use super::{absorb_loss, credit_slot, ensure_lender, only_owner, realize_profit, reconcile, Pool};
use crate::constants::MAX_UINT;
use crate::errors::{PoolError, PoolResult};
use crate::interfaces::CreditLine;
use crate::ledger::credit::{self as book, ensure_liquid};
use crate::ledger::fees::{self, FeeCharge, FeeReceiver, Settlement};
use crate::math::safe_add;
use crate::types::{CallContext, FeeType, LineStatus, PoolEvent, PositionId};

impl Pool {
    /// Open a position on `line` funded with `amount` liquid assets
    pub fn add_credit(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        drate: u128,
        frate: u128,
        amount: U256,
    ) -> PoolResult<PositionId> {
        self.transact("add_credit", |unit| {
            only_owner(unit, ctx)?;
            reconcile(unit, ctx)?;
            ensure_liquid(unit.state(), amount)?;

            let state = unit.state();
            let pool_ctx = ctx.as_contract(state.address);
            let id = line.add_credit(&pool_ctx, drate, frate, amount, state.asset)?;
            book::deploy(unit.state_mut(), credit_slot(line.address(), id), amount)?;

            info!(line = %line.address(), position = %id, %amount, drate, frate, "credit added");
            Ok(id)
        })
    }

    /// Lend more into an existing position
    pub fn increase_credit(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        id: PositionId,
        amount: U256,
    ) -> PoolResult<()> {
        self.transact("increase_credit", |unit| {
            only_owner(unit, ctx)?;
            reconcile(unit, ctx)?;
            ensure_liquid(unit.state(), amount)?;
            ensure_lender(unit.state(), &line.credits(id)?)?;

            let pool_ctx = ctx.as_contract(unit.state().address);
            line.increase_credit(&pool_ctx, id, amount)?;
            book::deploy(unit.state_mut(), credit_slot(line.address(), id), amount)?;

            info!(line = %line.address(), position = %id, %amount, "credit increased");
            Ok(())
        })
    }

    /// Propose new rates on a position. Fails if the line rejects them
    pub fn set_rates(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        id: PositionId,
        drate: u128,
        frate: u128,
    ) -> PoolResult<()> {
        self.transact("set_rates", |unit| {
            only_owner(unit, ctx)?;
            let pool_ctx = ctx.as_contract(unit.state().address);
            line.set_rates(&pool_ctx, id, drate, frate)?;

            info!(line = %line.address(), position = %id, drate, frate, "rates set");
            Ok(())
        })
    }

    /// Pull repaid interest from a position into the pool as locked profit.
    /// Anyone may call; the caller earns the collector fee. Returns interest collected
    pub fn collect_interest(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        id: PositionId,
    ) -> PoolResult<U256> {
        self.transact("collect_interest", |unit| {
            let price = reconcile(unit, ctx)?;
            let pool_ctx = ctx.as_contract(unit.state().address);

            line.accrue_interest(&pool_ctx, id)?;
            let position = line.credits(id)?;
            ensure_lender(unit.state(), &position)?;

            let interest = position.interest_repaid;
            if interest == U256::ZERO {
                return Err(PoolError::NothingToCollect);
            }
            line.withdraw(&pool_ctx, id, interest)?;
            realize_profit(unit, ctx.sender, interest, price)?;

            debug!(line = %line.address(), position = %id, %interest, "interest collected");
            Ok(interest)
        })
    }

    /// Withdraw up to `amount` from a position, interest first, then undrawn
    /// principal. `MAX_UINT` withdraws everything available.
    /// Returns `(principal, interest)` recovered
    pub fn reduce_credit(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        id: PositionId,
        amount: U256,
    ) -> PoolResult<(U256, U256)> {
        self.transact("reduce_credit", |unit| {
            only_owner(unit, ctx)?;
            let price = reconcile(unit, ctx)?;
            let pool_ctx = ctx.as_contract(unit.state().address);

            line.accrue_interest(&pool_ctx, id)?;
            let position = line.credits(id)?;
            ensure_lender(unit.state(), &position)?;

            let available = position.withdrawable()?;
            let requested = if amount == MAX_UINT { available } else { amount };
            if requested > available {
                return Err(PoolError::exceeds_position(requested, available));
            }
            let interest = requested.min(position.interest_repaid);
            let principal = requested - interest;

            if requested > U256::ZERO {
                line.withdraw(&pool_ctx, id, requested)?;
            }
            let recovery = book::recover(unit.state_mut(), credit_slot(line.address(), id), principal)?;
            realize_profit(unit, ctx.sender, interest, price)?;

            debug!(
                line = %line.address(),
                position = %id,
                %principal,
                %interest,
                recovered_beyond_book = %recovery.excess,
                "credit reduced"
            );
            Ok((principal, interest))
        })
    }

    /// Realize the loss on a position of an insolvent line. Anyone may call;
    /// a caller other than the owner earns the snitch bounty.
    /// Returns `(net_asset_loss, fees_burned)`
    pub fn impair(
        &mut self,
        ctx: &CallContext,
        line: &mut dyn CreditLine,
        id: PositionId,
    ) -> PoolResult<(U256, U256)> {
        self.transact("impair", |unit| {
            let price = reconcile(unit, ctx)?;
            let line_address = line.address();
            if unit.state().impairment(line_address) > U256::ZERO {
                return Err(PoolError::AlreadyImpaired);
            }
            if line.status()? != LineStatus::Insolvent {
                return Err(PoolError::LineNotInsolvent);
            }
            let position = line.credits(id)?;
            ensure_lender(unit.state(), &position)?;
            if position.principal == U256::ZERO {
                return Err(PoolError::NoLoss);
            }

            let interest = position.interest_repaid;
            let recovered_deposit = position.undrawn()?;
            let realized_loss = position.principal;

            let pulled = safe_add(interest, recovered_deposit)?;
            if pulled > U256::ZERO {
                let pool_ctx = ctx.as_contract(unit.state().address);
                line.withdraw(&pool_ctx, id, pulled)?;
            }

            let booked = book::write_off(unit.state_mut(), credit_slot(line_address, id))?;
            let book_loss = booked.saturating_sub(recovered_deposit);
            let gain = safe_add(interest, recovered_deposit.saturating_sub(booked))?;

            let (net_asset_loss, fees_burned) = if gain >= book_loss {
                realize_profit(unit, ctx.sender, gain - book_loss, price)?;
                (U256::ZERO, U256::ZERO)
            } else {
                if interest > U256::ZERO {
                    let pool = unit.state().address;
                    let collector = fees::charge_fee(
                        unit.state_mut(),
                        FeeCharge {
                            fee_type: FeeType::Collector,
                            gross: interest,
                            price,
                            payer: pool,
                            receiver: FeeReceiver::Account(ctx.sender),
                            settlement: Settlement::Mint,
                        },
                    )?;
                    unit.emit_opt(collector.event);
                }
                let absorbed = absorb_loss(unit, ctx.sender, book_loss - gain, realized_loss, price)?;
                (absorbed.net_asset_loss, absorbed.fees_burned)
            };

            unit.state_mut().impairments.insert(line_address, realized_loss);
            unit.emit(PoolEvent::Impair {
                line: line_address,
                position: id,
                net_asset_loss,
                realized_loss,
                interest_earned: interest,
                recovered_deposit,
                fees_burned,
            });

            warn!(
                line = %line_address,
                position = %id,
                %realized_loss,
                %net_asset_loss,
                %fees_burned,
                caller = %ctx.sender,
                "position impaired"
            );
            Ok((net_asset_loss, fees_burned))
        })
    }
}
