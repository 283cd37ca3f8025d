//! Per-call execution context

use crate::types::address::Address;

/// Caller and block time of a single pool call. Nothing about the caller or
/// the clock is read from anywhere else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self { sender, timestamp }
    }

    /// Same block, issued by `contract`. Used when the pool calls out
    pub fn as_contract(&self, contract: Address) -> Self {
        Self {
            sender: contract,
            timestamp: self.timestamp,
        }
    }
}
