use debtdao_core::{Address, CallContext, FeeSchedule, Pool, PoolConfig, PositionId, U256};

use crate::constants::*;
use crate::mocks::MockLine;
use crate::{addr, init_tracing};

/// A pool, one credit line and a few named actors sharing a clock
pub struct TestEnv {
    pub pool: Pool,
    pub line: MockLine,
    pub asset: Address,
    pub admin: Address,
    pub user: Address,
    pub rando: Address,
    pub now: u64,
}

impl TestEnv {
    pub const POOL: u64 = 0xD0;
    pub const ASSET: u64 = 0xA5;
    pub const LINE: u64 = 0x11;
    pub const ADMIN: u64 = 0xAD;
    pub const USER: u64 = 0xB0B;
    pub const RANDO: u64 = 0x4A4D;

    /// Empty pool with no fees
    pub fn new() -> Self {
        Self::with_fees(FeeSchedule::default())
    }

    pub fn with_fees(fees: FeeSchedule) -> Self {
        init_tracing();
        let config = PoolConfig {
            name: POOL_NAME.to_string(),
            symbol: POOL_SYMBOL.to_string(),
            owner: addr(Self::ADMIN),
            asset: addr(Self::ASSET),
            fees,
            ..Default::default()
        };
        let pool = Pool::new(addr(Self::POOL), &config, GENESIS_TIMESTAMP).unwrap();
        Self {
            pool,
            line: MockLine::new(addr(Self::LINE)),
            asset: addr(Self::ASSET),
            admin: addr(Self::ADMIN),
            user: addr(Self::USER),
            rando: addr(Self::RANDO),
            now: GENESIS_TIMESTAMP,
        }
    }

    /// Pool seeded with `INIT_POOL_BALANCE` from the admin
    pub fn funded() -> Self {
        let mut env = Self::new();
        env.deposit(env.admin, U256::new(INIT_POOL_BALANCE));
        env
    }

    pub fn ctx(&self, sender: Address) -> CallContext {
        CallContext::new(sender, self.now)
    }

    pub fn admin_ctx(&self) -> CallContext {
        self.ctx(self.admin)
    }

    pub fn time_travel(&mut self, seconds: u64) {
        self.now += seconds;
    }

    pub fn deposit(&mut self, who: Address, assets: U256) -> U256 {
        let ctx = self.ctx(who);
        self.pool.deposit(&ctx, assets, who).unwrap()
    }

    /// Admin lends `amount` into the line at default rates
    pub fn add_credit(&mut self, amount: U256) -> PositionId {
        let ctx = self.admin_ctx();
        self.pool
            .add_credit(&ctx, &mut self.line, DEFAULT_DRATE, DEFAULT_FRATE, amount)
            .unwrap()
    }

    pub fn borrow(&mut self, id: PositionId, amount: U256) {
        self.line.borrow(id, amount, self.now).unwrap();
    }

    pub fn repay(&mut self, id: PositionId, amount: U256) {
        self.line.deposit_and_repay(id, amount, self.now).unwrap();
    }

    /// Let a month of interest accrue and have the borrower pay all of it
    pub fn accrue_and_repay_interest(&mut self, id: PositionId) -> U256 {
        self.time_travel(INTEREST_TIMESPAN_SEC);
        let ctx = CallContext::new(addr(Self::POOL), self.now);
        debtdao_core::CreditLine::accrue_interest(&mut self.line, &ctx, id).unwrap();
        let interest = self.line.position(id).map(|p| p.interest_accrued).unwrap_or_default();
        self.repay(id, interest);
        interest
    }

    pub fn collect_interest(&mut self, caller: Address, id: PositionId) -> U256 {
        let ctx = self.ctx(caller);
        self.pool.collect_interest(&ctx, &mut self.line, id).unwrap()
    }

    /// Collect interest on `id` and pull all undrawn principal back
    pub fn reduce_all(&mut self, id: PositionId) -> (U256, U256) {
        let ctx = self.admin_ctx();
        self.pool
            .reduce_credit(&ctx, &mut self.line, id, U256::MAX)
            .unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
