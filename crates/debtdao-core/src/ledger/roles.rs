//! Two-phase role transfer
//!
//! A role holder proposes a successor, the successor accepts. Proposals
//! overwrite each other and the pending slot is cleared on acceptance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};
use crate::types::{Address, PoolEvent, PoolState};

/// Privileged pool roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages fees, limits and investments
    Owner,
    /// Receives accrued fee shares
    RevRecipient,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Owner, Role::RevRecipient];

    pub const fn name(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::RevRecipient => "rev_recipient",
        }
    }

    /// CamelCase suffix used in event names
    pub const fn event_suffix(self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::RevRecipient => "RevRecipient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current holder of a role
pub fn holder(state: &PoolState, role: Role) -> Address {
    match role {
        Role::Owner => state.owner,
        Role::RevRecipient => state.rev_recipient,
    }
}

/// Pending candidate for a role
pub fn pending(state: &PoolState, role: Role) -> Address {
    match role {
        Role::Owner => state.pending_owner,
        Role::RevRecipient => state.pending_rev_recipient,
    }
}

/// Fail unless `caller` holds `role`
pub fn ensure(state: &PoolState, caller: Address, role: Role) -> PoolResult<()> {
    let current = holder(state, role);
    if current.is_zero() || caller != current {
        return Err(PoolError::NotRole(role.name()));
    }
    Ok(())
}

/// Propose `candidate` for `role`. Only the current holder may propose
pub fn propose(state: &mut PoolState, caller: Address, role: Role, candidate: Address) -> PoolResult<PoolEvent> {
    ensure(state, caller, role)?;
    match role {
        Role::Owner => state.pending_owner = candidate,
        Role::RevRecipient => state.pending_rev_recipient = candidate,
    }
    Ok(PoolEvent::NewPendingRole {
        role,
        new_recipient: candidate,
    })
}

/// Accept `role` as its pending candidate
pub fn accept(state: &mut PoolState, caller: Address, role: Role) -> PoolResult<PoolEvent> {
    let candidate = pending(state, role);
    if candidate.is_zero() {
        return Err(PoolError::NullPendingRole(role.name()));
    }
    if caller != candidate || caller == holder(state, role) {
        return Err(PoolError::NotPendingRole(role.name()));
    }
    match role {
        Role::Owner => {
            state.owner = candidate;
            state.pending_owner = Address::ZERO;
        }
        Role::RevRecipient => {
            state.rev_recipient = candidate;
            state.pending_rev_recipient = Address::ZERO;
        }
    }
    Ok(PoolEvent::AcceptRole {
        role,
        new_recipient: candidate,
    })
}
