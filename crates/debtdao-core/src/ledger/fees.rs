//! # Fee Engine
//!
//! Fees are assessed in shares against the pre-operation price and settled by
//! minting new shares ("mintflation") to the fee receiver. Withdraw fees are
//! the exception: the withdrawing owner hands existing shares to the pool.

use ethnum::U256;

use crate::errors::PoolResult;
use crate::ledger::shares;
use crate::math::{apply_bps, safe_sub, to_assets, to_shares};
use crate::types::{Address, FeeType, PoolEvent, PoolState};

/// Outcome of assessing one fee on a gross amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeAssessment {
    pub fee_type: FeeType,
    pub fee_bps: u16,
    /// Gross amount in assets
    pub gross: U256,
    /// Gross minus the asset value of the fee
    pub net: U256,
    pub fee_shares: U256,
}

/// Where fee shares go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeReceiver {
    /// Held by the pool as accrued fees for `rev_recipient`
    Pool,
    /// Paid directly to an account (collector, referrer, snitch)
    Account(Address),
}

/// How fee shares are funded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Newly minted shares
    Mint,
    /// Existing shares moved out of the payer's balance
    Transfer,
}

/// A fee to charge during an operation
#[derive(Debug, Clone, Copy)]
pub struct FeeCharge {
    pub fee_type: FeeType,
    pub gross: U256,
    pub price: U256,
    pub payer: Address,
    pub receiver: FeeReceiver,
    pub settlement: Settlement,
}

/// Fee assessed and settled, with the revenue event to emit if the fee is enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeReceipt {
    pub assessment: FeeAssessment,
    pub event: Option<PoolEvent>,
}

impl FeeReceipt {
    pub fn fee_shares(&self) -> U256 {
        self.assessment.fee_shares
    }
}

/// `fee_shares = floor(to_shares(gross, price) * bps / FEE_COEFFICIENT)`
pub fn assess_fee(state: &PoolState, fee_type: FeeType, gross: U256, price: U256) -> PoolResult<FeeAssessment> {
    let fee_bps = state.fees.get(fee_type);
    let fee_shares = if fee_bps == 0 {
        U256::ZERO
    } else {
        apply_bps(to_shares(gross, price)?, fee_bps)?
    };
    let net = safe_sub(gross, to_assets(fee_shares, price)?)?;
    Ok(FeeAssessment {
        fee_type,
        fee_bps,
        gross,
        net,
        fee_shares,
    })
}

/// Assess a fee and settle it in shares
pub fn charge_fee(state: &mut PoolState, charge: FeeCharge) -> PoolResult<FeeReceipt> {
    let assessment = assess_fee(state, charge.fee_type, charge.gross, charge.price)?;
    let holder = receiver_account(state, charge.receiver);

    match charge.settlement {
        Settlement::Mint => shares::mint(state, holder, assessment.fee_shares)?,
        Settlement::Transfer => shares::transfer(state, charge.payer, holder, assessment.fee_shares)?,
    }

    let event = (assessment.fee_bps > 0).then(|| {
        revenue_event(
            state,
            charge.fee_type,
            charge.payer,
            charge.gross,
            assessment.fee_shares,
            charge.receiver,
        )
    });
    Ok(FeeReceipt { assessment, event })
}

/// Account that ends up holding the fee shares
pub fn receiver_account(state: &PoolState, receiver: FeeReceiver) -> Address {
    match receiver {
        FeeReceiver::Pool => state.address,
        FeeReceiver::Account(account) => account,
    }
}

/// `RevenueGenerated` record. Pool-held fees name `rev_recipient` as receiver
pub fn revenue_event(
    state: &PoolState,
    fee_type: FeeType,
    payer: Address,
    amount: U256,
    revenue: U256,
    receiver: FeeReceiver,
) -> PoolEvent {
    let receiver = match receiver {
        FeeReceiver::Pool => state.rev_recipient,
        FeeReceiver::Account(account) => account,
    };
    // Collector and snitch revenue is earned on asset flows, the rest on shares
    let token = match fee_type {
        FeeType::Collector | FeeType::Snitch => state.asset,
        _ => state.address,
    };
    PoolEvent::RevenueGenerated {
        payer,
        token,
        amount,
        revenue,
        fee_type: fee_type.flag(),
        receiver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FEE_COEFFICIENT, PRICE_DECIMALS};

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn state() -> PoolState {
        let mut s = PoolState::new(addr(100), addr(101), addr(1), 0);
        s.rev_recipient = addr(7);
        s
    }

    #[test]
    fn test_zero_rate_is_free_and_silent() {
        let mut s = state();
        let receipt = charge_fee(
            &mut s,
            FeeCharge {
                fee_type: FeeType::Deposit,
                gross: U256::new(1_000),
                price: PRICE_DECIMALS,
                payer: addr(2),
                receiver: FeeReceiver::Pool,
                settlement: Settlement::Mint,
            },
        )
        .unwrap();
        assert_eq!(receipt.fee_shares(), U256::ZERO);
        assert_eq!(receipt.assessment.net, U256::new(1_000));
        assert!(receipt.event.is_none());
        assert_eq!(s.total_supply, U256::ZERO);
    }

    #[test]
    fn test_assess_at_double_price() {
        let mut s = state();
        s.fees.deposit = 200;
        // 10_000 assets = 5_000 shares, 2% = 100 shares = 200 assets
        let a = assess_fee(&s, FeeType::Deposit, U256::new(10_000), PRICE_DECIMALS * U256::new(2)).unwrap();
        assert_eq!(a.fee_shares, U256::new(100));
        assert_eq!(a.net, U256::new(9_800));
    }

    #[test]
    fn test_mint_settlement_accrues_to_pool() {
        let mut s = state();
        s.fees.performance = FEE_COEFFICIENT / 10;
        let receipt = charge_fee(
            &mut s,
            FeeCharge {
                fee_type: FeeType::Performance,
                gross: U256::new(1_000),
                price: PRICE_DECIMALS,
                payer: addr(100),
                receiver: FeeReceiver::Pool,
                settlement: Settlement::Mint,
            },
        )
        .unwrap();
        assert_eq!(receipt.fee_shares(), U256::new(100));
        assert_eq!(s.accrued_fees(), U256::new(100));
        assert_eq!(s.total_supply, U256::new(100));
        assert_eq!(
            receipt.event,
            Some(PoolEvent::RevenueGenerated {
                payer: addr(100),
                token: addr(100),
                amount: U256::new(1_000),
                revenue: U256::new(100),
                fee_type: 1,
                receiver: addr(7),
            })
        );
    }

    #[test]
    fn test_transfer_settlement_keeps_supply() {
        let mut s = state();
        s.fees.withdraw = 100;
        shares::mint(&mut s, addr(2), U256::new(1_000)).unwrap();
        let receipt = charge_fee(
            &mut s,
            FeeCharge {
                fee_type: FeeType::Withdraw,
                gross: U256::new(1_000),
                price: PRICE_DECIMALS,
                payer: addr(2),
                receiver: FeeReceiver::Pool,
                settlement: Settlement::Transfer,
            },
        )
        .unwrap();
        assert_eq!(receipt.fee_shares(), U256::new(10));
        assert_eq!(s.total_supply, U256::new(1_000));
        assert_eq!(s.balance_of(addr(2)), U256::new(990));
        assert_eq!(s.accrued_fees(), U256::new(10));
    }

    #[test]
    fn test_account_receiver() {
        let mut s = state();
        s.fees.collector = 200;
        let receipt = charge_fee(
            &mut s,
            FeeCharge {
                fee_type: FeeType::Collector,
                gross: U256::new(5_000),
                price: PRICE_DECIMALS,
                payer: addr(100),
                receiver: FeeReceiver::Account(addr(9)),
                settlement: Settlement::Mint,
            },
        )
        .unwrap();
        assert_eq!(s.balance_of(addr(9)), U256::new(100));
        assert_eq!(s.accrued_fees(), U256::ZERO);
        match receipt.event {
            Some(PoolEvent::RevenueGenerated { receiver, fee_type, token, .. }) => {
                assert_eq!(receiver, addr(9));
                assert_eq!(fee_type, FeeType::Collector.flag());
                assert_eq!(token, s.asset);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
