//! Deposits, withdrawals and share transfers

use ethnum::U256;
use tracing::debug;

use super::{reconcile, Pool};
use crate::errors::{PoolError, PoolResult};
use crate::ledger::credit::ensure_liquid;
use crate::ledger::fees::{self, FeeCharge, FeeReceiver, Settlement};
use crate::ledger::shares;
use crate::math::{safe_add, safe_sub, to_assets, to_assets_up, to_shares};
use crate::types::{Address, CallContext, FeeType, PoolEvent, PoolState};
use crate::unit_of_work::WorkUnit;

/// Fail unless a deposit of `assets` respects the pool's bounds
fn check_deposit_limits(state: &PoolState, assets: U256) -> PoolResult<()> {
    if assets < state.min_deposit {
        return Err(PoolError::BelowMinDeposit {
            amount: assets.to_string(),
            min: state.min_deposit.to_string(),
        });
    }
    let total = safe_add(state.total_assets, assets)?;
    if total > state.max_assets {
        return Err(PoolError::ExceedsMaxAssets {
            total: total.to_string(),
            max: state.max_assets.to_string(),
        });
    }
    Ok(())
}

fn deposit_assets(
    unit: &mut WorkUnit,
    ctx: &CallContext,
    assets: U256,
    receiver: Address,
    referrer: Option<Address>,
) -> PoolResult<U256> {
    if receiver.is_zero() || referrer.is_some_and(|r| r.is_zero()) {
        return Err(PoolError::InvalidReceiver);
    }
    check_deposit_limits(unit.state(), assets)?;
    let price = reconcile(unit, ctx)?;
    let pool = unit.state().address;

    let gross_shares = to_shares(assets, price)?;
    if gross_shares == U256::ZERO {
        return Err(PoolError::ZeroShares);
    }

    let deposit_fee = fees::charge_fee(
        unit.state_mut(),
        FeeCharge {
            fee_type: FeeType::Deposit,
            gross: assets,
            price,
            payer: pool,
            receiver: FeeReceiver::Pool,
            settlement: Settlement::Mint,
        },
    )?;
    let referral_fee = match referrer {
        Some(referrer) => Some(fees::charge_fee(
            unit.state_mut(),
            FeeCharge {
                fee_type: FeeType::Referral,
                gross: assets,
                price,
                payer: pool,
                receiver: FeeReceiver::Account(referrer),
                settlement: Settlement::Mint,
            },
        )?),
        None => None,
    };

    let mut shares_out = safe_sub(gross_shares, deposit_fee.fee_shares())?;
    if let Some(referral) = &referral_fee {
        shares_out = safe_sub(shares_out, referral.fee_shares())?;
    }

    let state = unit.state_mut();
    state.total_assets = safe_add(state.total_assets, assets)?;
    shares::mint(state, receiver, shares_out)?;

    unit.emit(PoolEvent::Deposit {
        sender: ctx.sender,
        owner: receiver,
        assets,
        shares: shares_out,
    });
    unit.emit_opt(deposit_fee.event);
    unit.emit_opt(referral_fee.and_then(|r| r.event));

    debug!(%assets, shares = %shares_out, %price, receiver = %receiver, "deposit");
    Ok(shares_out)
}

impl Pool {
    /// Deposit `assets` and mint shares to `receiver`. Returns shares minted
    pub fn deposit(&mut self, ctx: &CallContext, assets: U256, receiver: Address) -> PoolResult<U256> {
        self.transact("deposit", |unit| deposit_assets(unit, ctx, assets, receiver, None))
    }

    /// Deposit paying a referral fee to `referrer`
    pub fn deposit_with_referral(
        &mut self,
        ctx: &CallContext,
        assets: U256,
        receiver: Address,
        referrer: Address,
    ) -> PoolResult<U256> {
        self.transact("deposit_with_referral", |unit| {
            deposit_assets(unit, ctx, assets, receiver, Some(referrer))
        })
    }

    /// Mint exactly `shares` to `receiver`. Returns assets paid, deposit fee included
    pub fn mint(&mut self, ctx: &CallContext, shares: U256, receiver: Address) -> PoolResult<U256> {
        self.transact("mint", |unit| {
            if receiver.is_zero() {
                return Err(PoolError::InvalidReceiver);
            }
            if shares == U256::ZERO {
                return Err(PoolError::ZeroShares);
            }
            let price = reconcile(unit, ctx)?;
            let pool = unit.state().address;

            let base_assets = to_assets(shares, price)?;
            let fee = fees::assess_fee(unit.state(), FeeType::Deposit, base_assets, price)?;
            let assets = to_assets_up(safe_add(shares, fee.fee_shares)?, price)?;
            if assets == U256::ZERO {
                return Err(PoolError::ZeroAssets);
            }
            check_deposit_limits(unit.state(), assets)?;

            let deposit_fee = fees::charge_fee(
                unit.state_mut(),
                FeeCharge {
                    fee_type: FeeType::Deposit,
                    gross: base_assets,
                    price,
                    payer: pool,
                    receiver: FeeReceiver::Pool,
                    settlement: Settlement::Mint,
                },
            )?;
            let state = unit.state_mut();
            state.total_assets = safe_add(state.total_assets, assets)?;
            shares::mint(state, receiver, shares)?;

            unit.emit(PoolEvent::Deposit {
                sender: ctx.sender,
                owner: receiver,
                assets,
                shares,
            });
            unit.emit_opt(deposit_fee.event);

            debug!(%assets, %shares, %price, receiver = %receiver, "mint");
            Ok(assets)
        })
    }

    /// Withdraw exactly `assets` to `receiver` from `owner`'s shares.
    /// Returns the shares `owner` gave up, withdraw fee included
    pub fn withdraw(
        &mut self,
        ctx: &CallContext,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> PoolResult<U256> {
        self.transact("withdraw", |unit| {
            if receiver.is_zero() {
                return Err(PoolError::InvalidReceiver);
            }
            let price = reconcile(unit, ctx)?;

            let burned = to_shares(assets, price)?;
            if burned == U256::ZERO {
                return Err(PoolError::ZeroShares);
            }
            ensure_liquid(unit.state(), assets)?;

            let fee = fees::assess_fee(unit.state(), FeeType::Withdraw, assets, price)?;
            let total_shares = safe_add(burned, fee.fee_shares)?;
            shares::spend_allowance(unit.state_mut(), owner, ctx.sender, total_shares)?;
            let balance = unit.state().balance_of(owner);
            if balance < total_shares {
                return Err(PoolError::insufficient_shares(total_shares, balance));
            }

            let withdraw_fee = fees::charge_fee(
                unit.state_mut(),
                FeeCharge {
                    fee_type: FeeType::Withdraw,
                    gross: assets,
                    price,
                    payer: owner,
                    receiver: FeeReceiver::Pool,
                    settlement: Settlement::Transfer,
                },
            )?;
            let state = unit.state_mut();
            shares::burn(state, owner, burned)?;
            state.total_assets = safe_sub(state.total_assets, assets)?;

            unit.emit(PoolEvent::Withdraw {
                sender: ctx.sender,
                owner,
                receiver,
                assets,
                shares: burned,
            });
            unit.emit_opt(withdraw_fee.event);

            debug!(%assets, shares = %total_shares, %price, owner = %owner, "withdraw");
            Ok(total_shares)
        })
    }

    /// Redeem `shares` of `owner` for assets sent to `receiver`.
    /// The withdraw fee is taken out of `shares`. Returns assets paid out
    pub fn redeem(
        &mut self,
        ctx: &CallContext,
        shares: U256,
        receiver: Address,
        owner: Address,
    ) -> PoolResult<U256> {
        self.transact("redeem", |unit| {
            if receiver.is_zero() {
                return Err(PoolError::InvalidReceiver);
            }
            if shares == U256::ZERO {
                return Err(PoolError::ZeroShares);
            }
            let price = reconcile(unit, ctx)?;

            let gross_assets = to_assets(shares, price)?;
            let fee = fees::assess_fee(unit.state(), FeeType::Withdraw, gross_assets, price)?;
            let burned = safe_sub(shares, fee.fee_shares)?;
            let assets = to_assets(burned, price)?;
            if assets == U256::ZERO {
                return Err(PoolError::ZeroAssets);
            }
            ensure_liquid(unit.state(), assets)?;
            shares::spend_allowance(unit.state_mut(), owner, ctx.sender, shares)?;
            let balance = unit.state().balance_of(owner);
            if balance < shares {
                return Err(PoolError::insufficient_shares(shares, balance));
            }

            let withdraw_fee = fees::charge_fee(
                unit.state_mut(),
                FeeCharge {
                    fee_type: FeeType::Withdraw,
                    gross: gross_assets,
                    price,
                    payer: owner,
                    receiver: FeeReceiver::Pool,
                    settlement: Settlement::Transfer,
                },
            )?;
            let state = unit.state_mut();
            shares::burn(state, owner, burned)?;
            state.total_assets = safe_sub(state.total_assets, assets)?;

            unit.emit(PoolEvent::Withdraw {
                sender: ctx.sender,
                owner,
                receiver,
                assets,
                shares: burned,
            });
            unit.emit_opt(withdraw_fee.event);

            debug!(%assets, %shares, %price, owner = %owner, "redeem");
            Ok(assets)
        })
    }

    /// Move shares from the caller to `to`
    pub fn transfer(&mut self, ctx: &CallContext, to: Address, amount: U256) -> PoolResult<()> {
        self.transact("transfer", |unit| {
            shares::transfer(unit.state_mut(), ctx.sender, to, amount)
        })
    }

    /// Move shares from `from` to `to` using the caller's allowance
    pub fn transfer_from(&mut self, ctx: &CallContext, from: Address, to: Address, amount: U256) -> PoolResult<()> {
        self.transact("transfer_from", |unit| {
            let state = unit.state_mut();
            shares::spend_allowance(state, from, ctx.sender, amount)?;
            shares::transfer(state, from, to, amount)
        })
    }

    /// Allow `spender` to move up to `amount` of the caller's shares
    pub fn approve(&mut self, ctx: &CallContext, spender: Address, amount: U256) -> PoolResult<()> {
        self.transact("approve", |unit| {
            shares::approve(unit.state_mut(), ctx.sender, spender, amount);
            Ok(())
        })
    }
}
