//! Governance engine facade.
//!
//! Single entry point for every mutation and query. The engine validates
//! caller authorization and membership, delegates to the proposal state
//! machine, and queues a domain event for each successful mutation. All
//! mutations are synchronous and atomic per call: guards run first, and no
//! state changes before every guard has passed.

use std::collections::VecDeque;
use std::sync::Arc;

use concord_types::Address;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::membership::MembershipRegistry;
use crate::proposal::{Proposal, ProposalStore};
use crate::weight::vote_weight;

/// The governance engine.
///
/// Exclusively owns the membership registry and the proposal store; nothing
/// else holds a writable reference to either. Guard checks are evaluated in
/// a fixed order (existence, authorization/membership, timing, terminal
/// state, domain rules) so error reporting is deterministic.
#[derive(Debug)]
pub struct GovernanceEngine {
    owner: Address,
    members: MembershipRegistry,
    proposals: ProposalStore,
    events: VecDeque<GovernanceEvent>,
}

impl GovernanceEngine {
    /// Create an engine owned by `owner`, who is seeded as the first active
    /// member with tenure starting at `now`.
    ///
    /// Fails with `InvalidIdentity` if `owner` is the zero address.
    pub fn new(owner: Address, now: u64) -> Result<Self, GovernanceError> {
        let mut members = MembershipRegistry::new();
        members.add(owner, now)?;

        Ok(Self {
            owner,
            members,
            proposals: ProposalStore::new(),
            events: VecDeque::new(),
        })
    }

    /// The registry owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Admit a new member. Owner-only.
    pub fn add_member(
        &mut self,
        caller: Address,
        id: Address,
        now: u64,
    ) -> Result<(), GovernanceError> {
        if caller != self.owner {
            return Err(GovernanceError::Unauthorized);
        }

        self.members.add(id, now)?;
        tracing::info!("Member {} added at {}", id, now);
        self.events.push_back(GovernanceEvent::MemberAdded { id, timestamp: now });
        Ok(())
    }

    /// Remove an active member. Owner-only.
    pub fn remove_member(
        &mut self,
        caller: Address,
        id: Address,
        now: u64,
    ) -> Result<(), GovernanceError> {
        if caller != self.owner {
            return Err(GovernanceError::Unauthorized);
        }

        self.members.remove(&id)?;
        tracing::info!("Member {} removed at {}", id, now);
        self.events.push_back(GovernanceEvent::MemberRemoved { id, timestamp: now });
        Ok(())
    }

    /// Create a proposal. Any active member may propose; the description
    /// must be non-empty. Returns the new proposal's id.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        description: String,
        now: u64,
    ) -> Result<u64, GovernanceError> {
        if !self.members.is_active(&caller) {
            return Err(GovernanceError::NotAMember);
        }

        if description.is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }

        let id = self.proposals.create(caller, description, now);
        // The proposal we just appended; re-borrow for the event fields.
        let proposal = self.proposals.get(id)?;

        tracing::info!("Proposal {} created by {}", id, caller);
        self.events.push_back(GovernanceEvent::ProposalCreated {
            id,
            proposer: caller,
            description: proposal.description.clone(),
            vote_start: proposal.vote_start,
            vote_end: proposal.vote_end,
        });

        Ok(id)
    }

    /// Cast a vote on an open proposal.
    ///
    /// The caller must be an active member whose tenure-derived weight is
    /// non-zero; the proposal must exist, be inside its voting window, be
    /// non-terminal, and not already carry the caller's ballot.
    pub fn vote(
        &mut self,
        caller: Address,
        proposal_id: u64,
        support: bool,
        now: u64,
    ) -> Result<(), GovernanceError> {
        // Existence before membership: an unknown proposal id is reported
        // even to non-members.
        self.proposals.get(proposal_id)?;

        let member = match self.members.get(&caller) {
            Some(m) if m.active => *m,
            _ => return Err(GovernanceError::NotAMember),
        };

        let weight = vote_weight(member.joined_at, now);
        self.proposals
            .get_mut(proposal_id)?
            .cast_vote(caller, support, weight, now)?;

        tracing::debug!(
            "Vote on proposal {} by {}: support={} weight={}",
            proposal_id,
            caller,
            support,
            weight
        );
        self.events.push_back(GovernanceEvent::VoteCast {
            proposal: proposal_id,
            voter: caller,
            support,
            weight,
        });

        Ok(())
    }

    /// Execute a proposal whose voting window has closed with quorum and a
    /// strict majority in favor. Any active member may trigger execution.
    pub fn execute_proposal(
        &mut self,
        caller: Address,
        proposal_id: u64,
        now: u64,
    ) -> Result<(), GovernanceError> {
        self.proposals.get(proposal_id)?;

        if !self.members.is_active(&caller) {
            return Err(GovernanceError::NotAMember);
        }

        self.proposals.get_mut(proposal_id)?.execute(now)?;

        tracing::info!("Proposal {} executed", proposal_id);
        self.events
            .push_back(GovernanceEvent::ProposalExecuted { id: proposal_id });
        Ok(())
    }

    /// Cancel a non-terminal proposal. Only the original proposer or the
    /// registry owner may cancel; the voting window is irrelevant.
    pub fn cancel_proposal(
        &mut self,
        caller: Address,
        proposal_id: u64,
        _now: u64,
    ) -> Result<(), GovernanceError> {
        let proposer = self.proposals.get(proposal_id)?.proposer;

        if caller != proposer && caller != self.owner {
            return Err(GovernanceError::NotAuthorizedToCancel);
        }

        self.proposals.get_mut(proposal_id)?.cancel()?;

        tracing::info!("Proposal {} canceled by {}", proposal_id, caller);
        self.events
            .push_back(GovernanceEvent::ProposalCanceled { id: proposal_id });
        Ok(())
    }

    /// Look up a proposal record.
    pub fn proposal(&self, proposal_id: u64) -> Result<&Proposal, GovernanceError> {
        self.proposals.get(proposal_id)
    }

    /// Whether `voter` has cast a ballot on the given proposal.
    pub fn has_voted(
        &self,
        proposal_id: u64,
        voter: &Address,
    ) -> Result<bool, GovernanceError> {
        Ok(self.proposals.get(proposal_id)?.has_voted(voter))
    }

    /// Current vote weight of an active member.
    pub fn vote_weight_of(
        &self,
        member: &Address,
        now: u64,
    ) -> Result<u64, GovernanceError> {
        match self.members.get(member) {
            Some(m) if m.active => Ok(vote_weight(m.joined_at, now)),
            _ => Err(GovernanceError::NotAMember),
        }
    }

    /// Number of currently active members.
    pub fn active_member_count(&self) -> u64 {
        self.members.active_count()
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> u64 {
        self.proposals.len()
    }

    /// Drain all queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<GovernanceEvent> {
        self.events.drain(..).collect()
    }

    /// Number of queued notifications.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

/// Cloneable, thread-safe handle to a governance engine.
///
/// Mutations go through `write()`, which serializes them: each mutating call
/// runs guard checks, state changes, and event queuing to completion before
/// the next begins. Queries through `read()` may run concurrently with each
/// other and always observe a consistent snapshot.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<GovernanceEngine>>,
}

impl SharedEngine {
    /// Wrap an engine for shared use.
    pub fn new(engine: GovernanceEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, GovernanceEngine> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, GovernanceEngine> {
        self.inner.write()
    }
}
