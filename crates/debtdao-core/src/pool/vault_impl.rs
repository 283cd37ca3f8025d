//! A pool is itself an ERC4626 vault, so pools can invest in each other

use ethnum::U256;

use super::Pool;
use crate::errors::PoolError;
use crate::interfaces::{Erc4626Vault, ExternalError, ExternalResult};
use crate::types::{Address, CallContext};

fn revert(err: PoolError) -> ExternalError {
    ExternalError::reverted(err.to_string())
}

impl Erc4626Vault for Pool {
    fn address(&self) -> Address {
        Pool::address(self)
    }

    fn asset(&self) -> Address {
        Pool::asset(self)
    }

    fn total_assets(&self) -> U256 {
        Pool::total_assets(self)
    }

    fn balance_of(&self, owner: Address) -> U256 {
        Pool::balance_of(self, owner)
    }

    fn convert_to_assets(&self, shares: U256) -> ExternalResult<U256> {
        Pool::convert_to_assets(self, shares).map_err(revert)
    }

    fn deposit(&mut self, ctx: &CallContext, assets: U256, receiver: Address) -> ExternalResult<U256> {
        Pool::deposit(self, ctx, assets, receiver).map_err(revert)
    }

    fn withdraw(
        &mut self,
        ctx: &CallContext,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> ExternalResult<U256> {
        Pool::withdraw(self, ctx, assets, receiver, owner).map_err(revert)
    }
}
