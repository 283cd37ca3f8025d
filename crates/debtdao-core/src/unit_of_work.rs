//! Unit of Work for pool operations
//!
//! An operation runs against a pending copy of the pool state and buffers the
//! events it emits. On success both are committed together; on failure the
//! pending copy is dropped and the original state is returned untouched.

use crate::types::{PoolEvent, PoolState};

/// Pending state change for a single pool call
#[derive(Debug)]
pub struct WorkUnit {
    /// State as loaded (for rollback)
    original: PoolState,

    /// State being modified by the operation
    pending: PoolState,

    /// Events emitted so far
    events: Vec<PoolEvent>,
}

impl WorkUnit {
    /// Snapshot `state` and start a new unit
    pub fn begin(state: &PoolState) -> Self {
        Self {
            original: state.clone(),
            pending: state.clone(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.pending
    }

    pub fn state_mut(&mut self) -> &mut PoolState {
        &mut self.pending
    }

    /// State as it was when the unit began
    pub fn original(&self) -> &PoolState {
        &self.original
    }

    pub fn emit(&mut self, event: PoolEvent) {
        self.events.push(event);
    }

    pub fn emit_opt(&mut self, event: Option<PoolEvent>) {
        if let Some(event) = event {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Whether the pending state differs from the snapshot
    pub fn has_changes(&self) -> bool {
        self.pending != self.original || !self.events.is_empty()
    }

    /// Finish the unit, yielding the new state and its events
    pub fn commit(self) -> (PoolState, Vec<PoolEvent>) {
        (self.pending, self.events)
    }

    /// Abandon the unit, yielding the untouched original state
    pub fn rollback(self) -> PoolState {
        self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;
    use ethnum::U256;

    fn state() -> PoolState {
        PoolState::new(
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            Address::from_low_u64_be(3),
            0,
        )
    }

    #[test]
    fn test_commit_applies_changes() {
        let base = state();
        let mut unit = WorkUnit::begin(&base);
        assert!(!unit.has_changes());
        unit.state_mut().total_assets = U256::new(5);
        unit.emit(PoolEvent::FeeSet { fee_bps: 1, fee_type: 1 });
        assert!(unit.has_changes());

        let (committed, events) = unit.commit();
        assert_eq!(committed.total_assets, U256::new(5));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let base = state();
        let mut unit = WorkUnit::begin(&base);
        unit.state_mut().total_supply = U256::new(99);
        unit.state_mut().owner = Address::ZERO;
        unit.emit_opt(Some(PoolEvent::FeeSet { fee_bps: 1, fee_type: 1 }));
        assert_eq!(unit.original(), &base);
        assert_eq!(unit.rollback(), base);
    }
}
