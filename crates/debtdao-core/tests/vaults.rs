/// Investing pool liquidity in nested vaults, including other pools
use debtdao_core::{Erc4626Vault, FeeSchedule, Pool, PoolConfig, PoolError, PoolEvent, U256};
use debtdao_test_utils::*;

const STAKE: u128 = 1_000_000 * ONE_TOKEN;

fn stake() -> U256 {
    U256::new(STAKE)
}

fn init_pool() -> U256 {
    U256::new(INIT_POOL_BALANCE)
}

fn invested() -> (TestEnv, MockVault) {
    let mut env = TestEnv::funded();
    let mut vault = MockVault::new(addr(0x7A), env.asset);
    let ctx = env.admin_ctx();
    env.pool.invest_vault(&ctx, &mut vault, stake()).unwrap();
    (env, vault)
}

// ============================================================================
// Invest
// ============================================================================

#[test]
fn test_invest_vault() {
    let (env, vault) = invested();

    assert_eq!(env.pool.total_deployed(), stake());
    assert_eq!(env.pool.vault_investments(vault.address()), stake());
    assert_eq!(env.pool.liquid_assets().unwrap(), init_pool() - stake());
    assert_eq!(vault.balance_of(env.pool.address()), stake());
    assert_eq!(
        env.pool.events().last(),
        Some(&PoolEvent::InvestVault {
            vault: vault.address(),
            assets: stake(),
            shares: stake(),
        })
    );
}

#[test]
fn test_invest_vault_checks() {
    let mut env = TestEnv::funded();
    let mut vault = MockVault::new(addr(0x7A), env.asset);

    let rando = env.ctx(env.rando);
    assert_eq!(
        env.pool.invest_vault(&rando, &mut vault, stake()),
        Err(PoolError::NotRole("owner"))
    );

    let admin = env.admin_ctx();
    assert_eq!(env.pool.invest_vault(&admin, &mut vault, U256::ZERO), Err(PoolError::ZeroAssets));
    assert!(matches!(
        env.pool.invest_vault(&admin, &mut vault, init_pool() + U256::ONE),
        Err(PoolError::InsufficientLiquidity { .. })
    ));

    let mut foreign = MockVault::new(addr(0x7B), env.rando);
    assert_eq!(
        env.pool.invest_vault(&admin, &mut foreign, stake()),
        Err(PoolError::VaultAssetMismatch)
    );
}

// ============================================================================
// Divest
// ============================================================================

#[test]
fn test_divest_at_par_returns_principal() {
    let (mut env, mut vault) = invested();
    let ctx = env.admin_ctx();

    let shares = env.pool.divest_vault(&ctx, &mut vault, stake()).unwrap();

    assert_eq!(shares, stake());
    assert_eq!(env.pool.total_deployed(), U256::ZERO);
    assert_eq!(env.pool.vault_investments(vault.address()), U256::ZERO);
    assert_eq!(env.pool.total_assets(), init_pool());
    assert_eq!(env.pool.locked_profit(), U256::ZERO);
}

#[test]
fn test_divest_profit_is_locked_and_charged() {
    let (mut env, mut vault) = invested();
    let admin = env.admin_ctx();
    env.pool.set_performance_fee(&admin, 2_000).unwrap();
    let gain = U256::new(100_000 * ONE_TOKEN);
    vault.simulate_gain(gain);
    env.pool.drain_events();

    env.pool.divest_vault(&admin, &mut vault, stake() + gain).unwrap();

    assert_eq!(env.pool.total_deployed(), U256::ZERO);
    assert_eq!(env.pool.total_assets(), init_pool() + gain);
    assert_eq!(env.pool.locked_profit(), gain);
    assert_eq!(env.pool.accrued_fees(), gain / U256::new(5));
    assert!(env
        .pool
        .events()
        .iter()
        .any(|e| matches!(e, PoolEvent::RevenueGenerated { fee_type: 1, .. })));
}

#[test]
fn test_only_owner_takes_profit_or_partially_divests() {
    let (mut env, mut vault) = invested();
    let rando = env.ctx(env.rando);

    vault.simulate_gain(U256::new(ONE_TOKEN));
    assert_eq!(
        env.pool.divest_vault(&rando, &mut vault, U256::new(ONE_TOKEN)),
        Err(PoolError::NotRole("owner"))
    );

    vault.simulate_loss(U256::new(2 * ONE_TOKEN));
    assert_eq!(
        env.pool.divest_vault(&rando, &mut vault, U256::new(ONE_TOKEN)),
        Err(PoolError::NotRole("owner"))
    );
}

#[test]
fn test_anyone_closes_losing_position() {
    let (mut env, mut vault) = invested();
    let loss = U256::new(200_000 * ONE_TOKEN);
    vault.simulate_loss(loss);
    let value = stake() - loss;

    let rando = env.ctx(env.rando);
    let shares = env.pool.divest_vault(&rando, &mut vault, value).unwrap();

    assert_eq!(shares, stake());
    assert_eq!(env.pool.total_deployed(), U256::ZERO);
    assert_eq!(env.pool.vault_investments(vault.address()), U256::ZERO);
    assert_eq!(env.pool.total_assets(), init_pool() - loss);
    assert_eq!(vault.balance_of(env.pool.address()), U256::ZERO);
}

#[test]
fn test_owner_partially_divests_at_loss() {
    let (mut env, mut vault) = invested();
    vault.simulate_loss(U256::new(200_000 * ONE_TOKEN));
    let part = U256::new(300_000 * ONE_TOKEN);

    let admin = env.admin_ctx();
    env.pool.divest_vault(&admin, &mut vault, part).unwrap();

    // Unrealized loss stays on the book
    assert_eq!(env.pool.vault_investments(vault.address()), stake() - part);
    assert_eq!(env.pool.total_assets(), init_pool());
}

#[test]
fn test_divest_checks() {
    let (mut env, mut vault) = invested();
    let admin = env.admin_ctx();

    assert!(matches!(
        env.pool.divest_vault(&admin, &mut vault, stake() + U256::ONE),
        Err(PoolError::ExceedsPosition { .. })
    ));

    let mut empty = MockVault::new(addr(0x7C), env.asset);
    assert_eq!(
        env.pool.divest_vault(&admin, &mut empty, U256::ONE),
        Err(PoolError::NoInvestment)
    );
}

// ============================================================================
// Pool In Pool
// ============================================================================

#[test]
fn test_pool_invests_in_another_pool() {
    let mut env = TestEnv::funded();
    let config = PoolConfig {
        name: "Inner Pool".to_string(),
        symbol: "INNER".to_string(),
        owner: env.admin,
        asset: env.asset,
        fees: FeeSchedule {
            deposit: 100,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut inner = Pool::new(addr(0xE0), &config, env.now).unwrap();

    let admin = env.admin_ctx();
    let shares = env.pool.invest_vault(&admin, &mut inner, stake()).unwrap();

    assert_eq!(shares, stake() - stake() / U256::new(100));
    assert_eq!(inner.balance_of(env.pool.address()), shares);
    assert_eq!(inner.total_assets(), stake());
    assert!(matches!(
        inner.events().first(),
        Some(PoolEvent::Deposit { sender, .. }) if *sender == env.pool.address()
    ));

    // The deposit fee left the position under water, so anyone may close it
    let value = Erc4626Vault::convert_to_assets(&inner, shares).unwrap();
    assert!(value < stake());
    let rando = env.ctx(env.rando);
    env.pool.divest_vault(&rando, &mut inner, value).unwrap();

    assert_eq!(env.pool.total_deployed(), U256::ZERO);
    assert_eq!(env.pool.total_assets(), init_pool() - (stake() - value));
}
