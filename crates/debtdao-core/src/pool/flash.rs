//! Flash loans out of liquid assets

use ethnum::U256;
use tracing::debug;

use super::{reconcile, Pool};
use crate::errors::{PoolError, PoolResult};
use crate::interfaces::FlashBorrower;
use crate::ledger::credit::ensure_liquid;
use crate::ledger::fees::{self, FeeCharge, FeeReceiver, Settlement};
use crate::math::{apply_bps, safe_add};
use crate::types::{Address, CallContext, FeeType};

impl Pool {
    /// Largest loan available in `token`: every liquid asset, or nothing for other tokens
    pub fn max_flash_loan(&self, token: Address) -> PoolResult<U256> {
        if token != self.state.asset {
            return Ok(U256::ZERO);
        }
        self.state.liquid_assets()
    }

    /// Fee in assets for borrowing `amount`
    pub fn flash_fee(&self, token: Address, amount: U256) -> PoolResult<U256> {
        if token != self.state.asset {
            return Err(PoolError::UnsupportedToken);
        }
        apply_bps(amount, self.state.fees.flash)
    }

    /// Lend `amount` to `borrower` for the duration of its callback
    pub fn flash_loan(
        &mut self,
        ctx: &CallContext,
        borrower: &mut dyn FlashBorrower,
        token: Address,
        amount: U256,
    ) -> PoolResult<bool> {
        let fee = self.flash_fee(token, amount)?;
        self.transact("flash_loan", |unit| {
            let price = reconcile(unit, ctx)?;
            ensure_liquid(unit.state(), amount)?;

            let owed = safe_add(amount, fee)?;
            let repaid = borrower.on_flash_loan(ctx.sender, token, amount, fee)?;
            if repaid < owed {
                return Err(PoolError::FlashLoanNotRepaid {
                    owed: owed.to_string(),
                    repaid: repaid.to_string(),
                });
            }

            let state = unit.state_mut();
            state.total_assets = safe_add(state.total_assets, fee)?;
            let receipt = fees::charge_fee(
                state,
                FeeCharge {
                    fee_type: FeeType::Flash,
                    gross: amount,
                    price,
                    payer: borrower.address(),
                    receiver: FeeReceiver::Pool,
                    settlement: Settlement::Mint,
                },
            )?;
            unit.emit_opt(receipt.event);

            debug!(%amount, %fee, borrower = %borrower.address(), "flash loan");
            Ok(true)
        })
    }
}
