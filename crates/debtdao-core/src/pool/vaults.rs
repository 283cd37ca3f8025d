//! Investments in nested ERC4626 vaults

use ethnum::U256;
use tracing::{info, warn};

use super::{absorb_loss, charge_profit_fees, only_owner, reconcile, Pool};
use crate::errors::{PoolError, PoolResult};
use crate::interfaces::Erc4626Vault;
use crate::ledger::credit::{self as book, ensure_liquid, Deployment};
use crate::ledger::{roles, Role};
use crate::types::{CallContext, PoolEvent};

impl Pool {
    /// Deposit `amount` liquid assets into `vault`. Returns vault shares received
    pub fn invest_vault(
        &mut self,
        ctx: &CallContext,
        vault: &mut dyn Erc4626Vault,
        amount: U256,
    ) -> PoolResult<U256> {
        self.transact("invest_vault", |unit| {
            only_owner(unit, ctx)?;
            reconcile(unit, ctx)?;
            if vault.asset() != unit.state().asset {
                return Err(PoolError::VaultAssetMismatch);
            }
            if amount == U256::ZERO {
                return Err(PoolError::ZeroAssets);
            }
            ensure_liquid(unit.state(), amount)?;

            let pool = unit.state().address;
            let shares = vault.deposit(&ctx.as_contract(pool), amount, pool)?;
            book::deploy(unit.state_mut(), Deployment::Vault(vault.address()), amount)?;

            unit.emit(PoolEvent::InvestVault {
                vault: vault.address(),
                assets: amount,
                shares,
            });
            info!(vault = %vault.address(), %amount, %shares, "invested in vault");
            Ok(shares)
        })
    }

    /// Withdraw `amount` assets from `vault`. Returns vault shares burned.
    ///
    /// Only the owner may take profit or reduce a losing position. Anyone may
    /// close a losing position entirely and collect the snitch bounty.
    pub fn divest_vault(
        &mut self,
        ctx: &CallContext,
        vault: &mut dyn Erc4626Vault,
        amount: U256,
    ) -> PoolResult<U256> {
        self.transact("divest_vault", |unit| {
            let price = reconcile(unit, ctx)?;
            let pool = unit.state().address;
            let slot = Deployment::Vault(vault.address());

            let invested = book::booked(unit.state(), slot);
            if invested == U256::ZERO {
                return Err(PoolError::NoInvestment);
            }
            let value = vault.convert_to_assets(vault.balance_of(pool))?;
            if amount > value {
                return Err(PoolError::exceeds_position(amount, value));
            }

            let profitable = value >= invested;
            let closing = amount == value;
            if profitable || !closing {
                roles::ensure(unit.state(), ctx.sender, Role::Owner)?;
            }

            let shares = vault.withdraw(&ctx.as_contract(pool), amount, pool, pool)?;

            if profitable {
                let recovery = book::recover(unit.state_mut(), slot, amount)?;
                if recovery.excess > U256::ZERO {
                    charge_profit_fees(unit, ctx.sender, recovery.excess, price)?;
                }
            } else if closing {
                let written_off = book::write_off(unit.state_mut(), slot)?;
                let loss = written_off - amount;
                let absorbed = absorb_loss(unit, ctx.sender, loss, loss, price)?;
                warn!(
                    vault = %vault.address(),
                    %loss,
                    fees_burned = %absorbed.fees_burned,
                    caller = %ctx.sender,
                    "vault position closed at a loss"
                );
            } else {
                book::recover(unit.state_mut(), slot, amount)?;
            }

            unit.emit(PoolEvent::DivestVault {
                vault: vault.address(),
                assets: amount,
                shares,
            });
            info!(vault = %vault.address(), %amount, %shares, "divested from vault");
            Ok(shares)
        })
    }
}
