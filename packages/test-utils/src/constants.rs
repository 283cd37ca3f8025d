use debtdao_core::constants::ONE_YEAR_IN_SECONDS;

/// Assets the admin seeds a fresh test pool with
pub const INIT_POOL_BALANCE: u128 = 10_000_000 * ONE_TOKEN;
/// Assets a test user deposits
pub const INIT_USER_POOL_BALANCE: u128 = 5_000_000 * ONE_TOKEN;

pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Time between interest collections in scenario tests
pub const INTEREST_TIMESPAN_SEC: u64 = ONE_YEAR_IN_SECONDS / 12;

/// Block time test pools start at
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Default drawn rate in bps per year
pub const DEFAULT_DRATE: u128 = 1_000;
/// Default facility rate in bps per year
pub const DEFAULT_FRATE: u128 = 500;

pub const POOL_NAME: &str = "Test Debt DAO Pool";
pub const POOL_SYMBOL: &str = "TDDP";
