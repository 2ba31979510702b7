//! Proposal lifecycle management.
//!
//! Proposals go through states: Open -> Closed -> Executed, with Canceled
//! reachable from both Open and Closed. Executed and Canceled are terminal:
//! no operation mutates a proposal afterwards.
//!
//! Guard checks run in a fixed order (window start, window end, terminal
//! flags, ballot, weight) so the reported error is deterministic when
//! several preconditions fail at once.

use std::collections::HashSet;

use concord_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::params::{MIN_QUORUM, VOTING_PERIOD};

/// Derived proposal status at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Voting window is open
    Open,
    /// Voting window has closed, no terminal outcome yet
    Closed,
    /// Proposal was executed
    Executed,
    /// Proposal was canceled
    Canceled,
}

/// A single governance proposal with its ballot record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequential id, assigned from 0 and never reused
    pub id: u64,
    /// Member who created the proposal
    pub proposer: Address,
    /// Immutable description text
    pub description: String,
    /// Unix timestamp when voting opened (creation time)
    pub vote_start: u64,
    /// Unix timestamp when voting closes (`vote_start + VOTING_PERIOD`)
    pub vote_end: u64,
    /// Accumulated weight in favor
    pub for_votes: u64,
    /// Accumulated weight against
    pub against_votes: u64,
    /// Terminal flag: executed
    pub executed: bool,
    /// Terminal flag: canceled
    pub canceled: bool,
    /// Identities that have cast a ballot
    ballots: HashSet<Address>,
}

impl Proposal {
    /// Create a new open proposal. The voting window starts immediately.
    pub fn new(id: u64, proposer: Address, description: String, now: u64) -> Self {
        Self {
            id,
            proposer,
            description,
            vote_start: now,
            vote_end: now + VOTING_PERIOD,
            for_votes: 0,
            against_votes: 0,
            executed: false,
            canceled: false,
            ballots: HashSet::new(),
        }
    }

    /// Derived status as of `now`.
    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.canceled {
            ProposalStatus::Canceled
        } else if now > self.vote_end {
            ProposalStatus::Closed
        } else {
            ProposalStatus::Open
        }
    }

    /// Whether the proposal has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.executed || self.canceled
    }

    /// Total weight cast so far.
    pub fn total_votes(&self) -> u64 {
        self.for_votes + self.against_votes
    }

    /// Check if a member has voted on this proposal.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains(voter)
    }

    /// Cast a vote with a pre-computed weight.
    ///
    /// Guards, in order: window not yet open, window closed, executed,
    /// canceled, duplicate ballot, zero weight. On success adds `weight` to
    /// the chosen side and records the voter's ballot.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        support: bool,
        weight: u64,
        now: u64,
    ) -> Result<(), GovernanceError> {
        if now < self.vote_start {
            return Err(GovernanceError::VotingNotStarted);
        }

        if now > self.vote_end {
            return Err(GovernanceError::VotingEnded);
        }

        if self.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }

        if self.canceled {
            return Err(GovernanceError::AlreadyCanceled);
        }

        if self.ballots.contains(&voter) {
            return Err(GovernanceError::AlreadyVoted);
        }

        if weight == 0 {
            return Err(GovernanceError::InsufficientTenure);
        }

        if support {
            self.for_votes += weight;
        } else {
            self.against_votes += weight;
        }
        self.ballots.insert(voter);

        Ok(())
    }

    /// Execute the proposal.
    ///
    /// Requires the voting window to be over, no terminal outcome yet,
    /// quorum met, and a strict majority in favor (a tie fails).
    pub fn execute(&mut self, now: u64) -> Result<(), GovernanceError> {
        if now <= self.vote_end {
            return Err(GovernanceError::VotingPeriodNotEnded);
        }

        if self.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }

        if self.canceled {
            return Err(GovernanceError::AlreadyCanceled);
        }

        let total = self.total_votes();
        if total < MIN_QUORUM {
            return Err(GovernanceError::QuorumNotMet {
                total,
                required: MIN_QUORUM,
            });
        }

        if self.for_votes <= self.against_votes {
            return Err(GovernanceError::ProposalDidNotPass);
        }

        self.executed = true;
        Ok(())
    }

    /// Cancel the proposal. Allowed both before and after the voting window
    /// closes; only a terminal outcome blocks it. Authorization is the
    /// caller's responsibility.
    pub fn cancel(&mut self) -> Result<(), GovernanceError> {
        if self.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }

        if self.canceled {
            return Err(GovernanceError::AlreadyCanceled);
        }

        self.canceled = true;
        Ok(())
    }
}

/// Append-only store of all proposals, indexed by id.
///
/// Ids are positions in the underlying vector, so assignment is sequential
/// from 0 and an id is valid exactly when it is below the count. Proposals
/// are never destroyed; terminal ones remain queryable.
#[derive(Debug, Default)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new proposal and return its id.
    pub fn create(&mut self, proposer: Address, description: String, now: u64) -> u64 {
        let id = self.proposals.len() as u64;
        self.proposals.push(Proposal::new(id, proposer, description, now));
        id
    }

    /// Get a proposal by id.
    pub fn get(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id as usize)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// Get a proposal mutably by id.
    pub fn get_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(id as usize)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// Number of proposals ever created.
    pub fn len(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Whether no proposal has been created yet.
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Iterate over all proposals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MAX_WEIGHT, VOTING_PERIOD};

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn open_proposal(now: u64) -> Proposal {
        Proposal::new(0, addr(1), "raise the meeting cadence".to_string(), now)
    }

    #[test]
    fn test_proposal_creation() {
        let p = open_proposal(1_000);

        assert_eq!(p.id, 0);
        assert_eq!(p.proposer, addr(1));
        assert_eq!(p.vote_start, 1_000);
        assert_eq!(p.vote_end, 1_000 + VOTING_PERIOD);
        assert_eq!(p.total_votes(), 0);
        assert!(!p.is_terminal());
        assert_eq!(p.status(1_000), ProposalStatus::Open);
    }

    #[test]
    fn test_status_transitions() {
        let mut p = open_proposal(1_000);

        assert_eq!(p.status(p.vote_end), ProposalStatus::Open);
        assert_eq!(p.status(p.vote_end + 1), ProposalStatus::Closed);

        p.cancel().unwrap();
        assert_eq!(p.status(1_000), ProposalStatus::Canceled);
    }

    #[test]
    fn test_cast_vote_accumulates() {
        let mut p = open_proposal(1_000);

        p.cast_vote(addr(2), true, 3, 2_000).unwrap();
        p.cast_vote(addr(3), false, 1, 2_000).unwrap();
        p.cast_vote(addr(4), true, 2, 2_000).unwrap();

        assert_eq!(p.for_votes, 5);
        assert_eq!(p.against_votes, 1);
        assert_eq!(p.total_votes(), 6);
        assert!(p.has_voted(&addr(2)));
        assert!(!p.has_voted(&addr(9)));
    }

    #[test]
    fn test_cast_vote_window_guards() {
        let mut p = open_proposal(1_000);

        assert_eq!(
            p.cast_vote(addr(2), true, 1, 999),
            Err(GovernanceError::VotingNotStarted)
        );
        assert_eq!(
            p.cast_vote(addr(2), true, 1, p.vote_end + 1),
            Err(GovernanceError::VotingEnded)
        );

        // Boundary instants are inside the window
        p.cast_vote(addr(2), true, 1, 1_000).unwrap();
        p.cast_vote(addr(3), true, 1, p.vote_end).unwrap();
    }

    #[test]
    fn test_cast_vote_rejects_duplicates() {
        let mut p = open_proposal(1_000);

        p.cast_vote(addr(2), true, 2, 2_000).unwrap();
        assert_eq!(
            p.cast_vote(addr(2), false, 2, 2_000),
            Err(GovernanceError::AlreadyVoted)
        );

        // Counters untouched by the rejected vote
        assert_eq!(p.for_votes, 2);
        assert_eq!(p.against_votes, 0);
    }

    #[test]
    fn test_cast_vote_rejects_zero_weight() {
        let mut p = open_proposal(1_000);

        assert_eq!(
            p.cast_vote(addr(2), true, 0, 2_000),
            Err(GovernanceError::InsufficientTenure)
        );
        assert!(!p.has_voted(&addr(2)));
    }

    #[test]
    fn test_guard_order_window_before_ballot() {
        // Voter already voted AND the window has ended: the window guard
        // is evaluated first.
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 1, 2_000).unwrap();

        assert_eq!(
            p.cast_vote(addr(2), true, 1, p.vote_end + 1),
            Err(GovernanceError::VotingEnded)
        );
    }

    #[test]
    fn test_guard_order_terminal_before_ballot() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 1, 2_000).unwrap();
        p.cancel().unwrap();

        assert_eq!(
            p.cast_vote(addr(2), true, 1, 2_000),
            Err(GovernanceError::AlreadyCanceled)
        );
    }

    #[test]
    fn test_execute_requires_closed_window() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 3, 2_000).unwrap();

        assert_eq!(p.execute(p.vote_end), Err(GovernanceError::VotingPeriodNotEnded));
        p.execute(p.vote_end + 1).unwrap();
        assert!(p.executed);
        assert_eq!(p.status(p.vote_end + 1), ProposalStatus::Executed);
    }

    #[test]
    fn test_execute_requires_quorum() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 2, 2_000).unwrap();

        assert_eq!(
            p.execute(p.vote_end + 1),
            Err(GovernanceError::QuorumNotMet { total: 2, required: 3 })
        );
        assert!(!p.executed);
    }

    #[test]
    fn test_execute_tie_fails() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 2, 2_000).unwrap();
        p.cast_vote(addr(3), false, 2, 2_000).unwrap();

        assert_eq!(
            p.execute(p.vote_end + 1),
            Err(GovernanceError::ProposalDidNotPass)
        );
    }

    #[test]
    fn test_execute_majority_against_fails() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, 1, 2_000).unwrap();
        p.cast_vote(addr(3), false, 2, 2_000).unwrap();
        p.cast_vote(addr(4), false, 1, 2_000).unwrap();

        assert_eq!(
            p.execute(p.vote_end + 1),
            Err(GovernanceError::ProposalDidNotPass)
        );
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut p = open_proposal(1_000);
        p.cast_vote(addr(2), true, MAX_WEIGHT, 2_000).unwrap();
        p.execute(p.vote_end + 1).unwrap();

        assert_eq!(p.execute(p.vote_end + 2), Err(GovernanceError::AlreadyExecuted));
        assert_eq!(p.cancel(), Err(GovernanceError::AlreadyExecuted));
        assert_eq!(
            p.cast_vote(addr(3), true, 1, p.vote_end),
            Err(GovernanceError::AlreadyExecuted)
        );

        let mut q = open_proposal(1_000);
        q.cancel().unwrap();
        assert_eq!(q.cancel(), Err(GovernanceError::AlreadyCanceled));
        assert_eq!(q.execute(q.vote_end + 1), Err(GovernanceError::AlreadyCanceled));
    }

    #[test]
    fn test_cancel_allowed_after_window() {
        let mut p = open_proposal(1_000);
        // No time argument: cancellation ignores the voting window
        p.cancel().unwrap();
        assert!(p.canceled);
    }

    #[test]
    fn test_store_sequential_ids() {
        let mut store = ProposalStore::new();
        assert!(store.is_empty());

        let a = store.create(addr(1), "first".to_string(), 1_000);
        let b = store.create(addr(1), "second".to_string(), 2_000);

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().description, "first");
        assert_eq!(store.get(1).unwrap().vote_start, 2_000);
    }

    #[test]
    fn test_store_unknown_id() {
        let mut store = ProposalStore::new();
        store.create(addr(1), "only".to_string(), 1_000);

        assert!(matches!(store.get(1), Err(GovernanceError::ProposalNotFound(1))));
        assert!(matches!(store.get_mut(7), Err(GovernanceError::ProposalNotFound(7))));
    }
}
