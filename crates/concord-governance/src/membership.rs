//! Membership registry with tenure tracking.
//!
//! Members are keyed by address. Removal deactivates a record without
//! deleting it; re-admission overwrites the join timestamp, so tenure always
//! restarts from the most recent admission.

use std::collections::HashMap;

use concord_types::Address;

use crate::error::GovernanceError;

/// A governance member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Member identity
    pub id: Address,
    /// Unix timestamp of the most recent admission
    pub joined_at: u64,
    /// Whether the member currently participates in governance
    pub active: bool,
}

/// Registry of all known members.
///
/// The active count is maintained incrementally on add/remove so the query
/// stays O(1) as membership grows.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    members: HashMap<Address, Member>,
    active_count: u64,
}

impl MembershipRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a member.
    ///
    /// Fails with `InvalidIdentity` for the zero address and `AlreadyMember`
    /// if the identity is currently active. Re-admitting a removed identity
    /// resets its join timestamp to `now`.
    pub fn add(&mut self, id: Address, now: u64) -> Result<(), GovernanceError> {
        if id.is_zero() {
            return Err(GovernanceError::InvalidIdentity);
        }

        if self.is_active(&id) {
            return Err(GovernanceError::AlreadyMember);
        }

        self.members.insert(id, Member {
            id,
            joined_at: now,
            active: true,
        });
        self.active_count += 1;

        Ok(())
    }

    /// Deactivate a member.
    ///
    /// Fails with `NotAMember` if the identity is not currently active. The
    /// record is retained so a later re-add resets tenure rather than
    /// restoring it.
    pub fn remove(&mut self, id: &Address) -> Result<(), GovernanceError> {
        match self.members.get_mut(id) {
            Some(member) if member.active => {
                member.active = false;
                self.active_count -= 1;
                Ok(())
            }
            _ => Err(GovernanceError::NotAMember),
        }
    }

    /// Check whether an identity is an active member.
    pub fn is_active(&self, id: &Address) -> bool {
        self.members.get(id).map(|m| m.active).unwrap_or(false)
    }

    /// Number of currently active members.
    pub fn active_count(&self) -> u64 {
        self.active_count
    }

    /// Look up a member record, active or not.
    pub fn get(&self, id: &Address) -> Option<&Member> {
        self.members.get(id)
    }
}
