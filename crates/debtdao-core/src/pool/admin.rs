//! Owner configuration, role handover and revenue claims

use ethnum::U256;
use tracing::info;

use super::{only_owner, Pool};
use crate::constants::MAX_UINT;
use crate::errors::{PoolError, PoolResult};
use crate::ledger::{roles, shares, vesting, Role};
use crate::types::{Address, CallContext, FeeType, PoolEvent};

impl Pool {
    // ========================================================================
    // Fees
    // ========================================================================

    /// Set the rate of a mutable fee. Emits `FeeSet` with the fee's bit flag
    pub fn set_fee(&mut self, ctx: &CallContext, fee_type: FeeType, fee_bps: u16) -> PoolResult<()> {
        self.transact("set_fee", |unit| {
            only_owner(unit, ctx)?;
            unit.state_mut().fees.set(fee_type, fee_bps)?;
            unit.emit(PoolEvent::FeeSet {
                fee_bps,
                fee_type: fee_type.flag(),
            });
            info!(fee = %fee_type, fee_bps, "fee set");
            Ok(())
        })
    }

    pub fn set_performance_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Performance, fee_bps)
    }

    pub fn set_deposit_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Deposit, fee_bps)
    }

    pub fn set_withdraw_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Withdraw, fee_bps)
    }

    pub fn set_flash_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Flash, fee_bps)
    }

    pub fn set_collector_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Collector, fee_bps)
    }

    pub fn set_referral_fee(&mut self, ctx: &CallContext, fee_bps: u16) -> PoolResult<()> {
        self.set_fee(ctx, FeeType::Referral, fee_bps)
    }

    // ========================================================================
    // Limits
    // ========================================================================

    /// Change the vesting rate. Profit already vested at the old rate is released first
    pub fn set_vesting_rate(&mut self, ctx: &CallContext, rate: U256) -> PoolResult<()> {
        self.transact("set_vesting_rate", |unit| {
            only_owner(unit, ctx)?;
            let state = unit.state_mut();
            vesting::unlock_profits(state, ctx.timestamp)?;
            vesting::set_vesting_rate(state, rate)?;
            info!(%rate, "vesting rate set");
            Ok(())
        })
    }

    pub fn set_max_assets(&mut self, ctx: &CallContext, max_assets: U256) -> PoolResult<()> {
        self.transact("set_max_assets", |unit| {
            only_owner(unit, ctx)?;
            let state = unit.state_mut();
            if max_assets < state.min_deposit {
                return Err(PoolError::invalid_config(
                    "max_assets",
                    max_assets,
                    format!("at least min_deposit ({})", state.min_deposit),
                ));
            }
            state.max_assets = max_assets;
            info!(%max_assets, "max assets set");
            Ok(())
        })
    }

    pub fn set_min_deposit(&mut self, ctx: &CallContext, min_deposit: U256) -> PoolResult<()> {
        self.transact("set_min_deposit", |unit| {
            only_owner(unit, ctx)?;
            let state = unit.state_mut();
            if min_deposit > state.max_assets {
                return Err(PoolError::invalid_config(
                    "min_deposit",
                    min_deposit,
                    format!("at most max_assets ({})", state.max_assets),
                ));
            }
            state.min_deposit = min_deposit;
            info!(%min_deposit, "min deposit set");
            Ok(())
        })
    }

    /// Release profit vested so far. Anyone may call
    pub fn unlock_profits(&mut self, ctx: &CallContext) -> PoolResult<U256> {
        self.transact("unlock_profits", |unit| {
            vesting::unlock_profits(unit.state_mut(), ctx.timestamp)
        })
    }

    // ========================================================================
    // Roles
    // ========================================================================

    fn propose_role(&mut self, ctx: &CallContext, role: Role, candidate: Address) -> PoolResult<()> {
        self.transact("propose_role", |unit| {
            let event = roles::propose(unit.state_mut(), ctx.sender, role, candidate)?;
            unit.emit(event);
            info!(%role, %candidate, "role proposed");
            Ok(())
        })
    }

    fn accept_role(&mut self, ctx: &CallContext, role: Role) -> PoolResult<()> {
        self.transact("accept_role", |unit| {
            let event = roles::accept(unit.state_mut(), ctx.sender, role)?;
            unit.emit(event);
            info!(%role, holder = %ctx.sender, "role accepted");
            Ok(())
        })
    }

    pub fn set_owner(&mut self, ctx: &CallContext, candidate: Address) -> PoolResult<()> {
        self.propose_role(ctx, Role::Owner, candidate)
    }

    pub fn accept_owner(&mut self, ctx: &CallContext) -> PoolResult<()> {
        self.accept_role(ctx, Role::Owner)
    }

    pub fn set_rev_recipient(&mut self, ctx: &CallContext, candidate: Address) -> PoolResult<()> {
        self.propose_role(ctx, Role::RevRecipient, candidate)
    }

    pub fn accept_rev_recipient(&mut self, ctx: &CallContext) -> PoolResult<()> {
        self.accept_role(ctx, Role::RevRecipient)
    }

    // ========================================================================
    // Revenue
    // ========================================================================

    /// Move accrued fee shares to the revenue recipient. `token` must be the
    /// pool's own share token. `MAX_UINT` claims everything. Returns shares claimed
    pub fn claim_rev(&mut self, ctx: &CallContext, token: Address, amount: U256) -> PoolResult<U256> {
        self.transact("claim_rev", |unit| {
            let state = unit.state_mut();
            if token != state.address {
                return Err(PoolError::NonRevenueToken);
            }
            roles::ensure(state, ctx.sender, Role::RevRecipient)?;

            let claimable = state.accrued_fees();
            let claimed = if amount == MAX_UINT { claimable } else { amount };
            if claimed > claimable {
                return Err(PoolError::ExceedsClaimable {
                    requested: claimed.to_string(),
                    claimable: claimable.to_string(),
                });
            }
            let pool = state.address;
            shares::transfer(state, pool, ctx.sender, claimed)?;

            unit.emit(PoolEvent::RevenueClaimed {
                rev_recipient: ctx.sender,
                amount: claimed,
            });
            info!(%claimed, rev_recipient = %ctx.sender, "revenue claimed");
            Ok(claimed)
        })
    }
}
