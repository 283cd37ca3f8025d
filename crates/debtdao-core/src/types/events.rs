//! Pool event records
//!
//! Emitted on every state-changing operation and committed together with the
//! state change, so a failed call never leaves events behind.

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::ledger::roles::Role;
use crate::types::address::{Address, PositionId};
use crate::types::fees::FeeType;
use crate::types::serde_helpers::u256_dec;

/// Event emitted by the pool ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PoolEvent {
    /// Owner changed a fee rate. `fee_type` is the bit flag of the fee type
    FeeSet { fee_bps: u16, fee_type: u8 },

    /// A fee was assessed. `amount` is the gross amount in assets,
    /// `revenue` the fee in pool shares
    RevenueGenerated {
        payer: Address,
        token: Address,
        #[serde(with = "u256_dec")]
        amount: U256,
        #[serde(with = "u256_dec")]
        revenue: U256,
        fee_type: u8,
        receiver: Address,
    },

    Deposit {
        sender: Address,
        owner: Address,
        #[serde(with = "u256_dec")]
        assets: U256,
        #[serde(with = "u256_dec")]
        shares: U256,
    },

    Withdraw {
        sender: Address,
        owner: Address,
        receiver: Address,
        #[serde(with = "u256_dec")]
        assets: U256,
        #[serde(with = "u256_dec")]
        shares: U256,
    },

    InvestVault {
        vault: Address,
        #[serde(with = "u256_dec")]
        assets: U256,
        #[serde(with = "u256_dec")]
        shares: U256,
    },

    DivestVault {
        vault: Address,
        #[serde(with = "u256_dec")]
        assets: U256,
        #[serde(with = "u256_dec")]
        shares: U256,
    },

    Impair {
        line: Address,
        position: PositionId,
        #[serde(with = "u256_dec")]
        net_asset_loss: U256,
        #[serde(with = "u256_dec")]
        realized_loss: U256,
        #[serde(with = "u256_dec")]
        interest_earned: U256,
        #[serde(with = "u256_dec")]
        recovered_deposit: U256,
        #[serde(with = "u256_dec")]
        fees_burned: U256,
    },

    /// A new candidate was proposed for a role
    NewPendingRole { role: Role, new_recipient: Address },

    /// The pending candidate accepted a role
    AcceptRole { role: Role, new_recipient: Address },

    RevenueClaimed {
        rev_recipient: Address,
        #[serde(with = "u256_dec")]
        amount: U256,
    },
}

impl PoolEvent {
    /// Event name as it appears in logs, e.g. `NewPendingOwner`
    pub fn name(&self) -> String {
        match self {
            PoolEvent::FeeSet { .. } => "FeeSet".into(),
            PoolEvent::RevenueGenerated { .. } => "RevenueGenerated".into(),
            PoolEvent::Deposit { .. } => "Deposit".into(),
            PoolEvent::Withdraw { .. } => "Withdraw".into(),
            PoolEvent::InvestVault { .. } => "InvestVault".into(),
            PoolEvent::DivestVault { .. } => "DivestVault".into(),
            PoolEvent::Impair { .. } => "Impair".into(),
            PoolEvent::NewPendingRole { role, .. } => format!("NewPending{}", role.event_suffix()),
            PoolEvent::AcceptRole { role, .. } => format!("Accept{}", role.event_suffix()),
            PoolEvent::RevenueClaimed { .. } => "RevenueClaimed".into(),
        }
    }

    /// Fee type of a `FeeSet` or `RevenueGenerated` event
    pub fn fee_type(&self) -> Option<FeeType> {
        match self {
            PoolEvent::FeeSet { fee_type, .. } | PoolEvent::RevenueGenerated { fee_type, .. } => {
                FeeType::from_flag(*fee_type)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let e = PoolEvent::NewPendingRole {
            role: Role::RevRecipient,
            new_recipient: Address::ZERO,
        };
        assert_eq!(e.name(), "NewPendingRevRecipient");
        let e = PoolEvent::AcceptRole {
            role: Role::Owner,
            new_recipient: Address::ZERO,
        };
        assert_eq!(e.name(), "AcceptOwner");
    }

    #[test]
    fn test_fee_type_decodes_flag() {
        let e = PoolEvent::FeeSet { fee_bps: 10, fee_type: 16 };
        assert_eq!(e.fee_type(), Some(FeeType::Collector));
        let e = PoolEvent::RevenueClaimed { rev_recipient: Address::ZERO, amount: U256::ONE };
        assert_eq!(e.fee_type(), None);
    }

    #[test]
    fn test_json_shape() {
        let e = PoolEvent::RevenueGenerated {
            payer: Address::ZERO,
            token: Address::ZERO,
            amount: U256::MAX,
            revenue: U256::new(25),
            fee_type: FeeType::Flash.flag(),
            receiver: Address::ZERO,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["event"], "RevenueGenerated");
        assert_eq!(json["revenue"], "25");
        assert_eq!(json["fee_type"], 8);

        let back: PoolEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }
}
