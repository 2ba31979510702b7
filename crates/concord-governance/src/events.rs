//! Domain events emitted on successful mutations.
//!
//! Events are the engine's only externally observable side effect besides
//! its state fields. The engine queues them; the host (UI, indexer) drains
//! the queue and picks its own transport.

use concord_types::Address;
use serde::{Deserialize, Serialize};

/// A governance notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// A member was admitted
    MemberAdded { id: Address, timestamp: u64 },
    /// A member was removed
    MemberRemoved { id: Address, timestamp: u64 },
    /// A proposal was created and its voting window opened
    ProposalCreated {
        id: u64,
        proposer: Address,
        description: String,
        vote_start: u64,
        vote_end: u64,
    },
    /// A ballot was cast
    VoteCast {
        proposal: u64,
        voter: Address,
        support: bool,
        weight: u64,
    },
    /// A proposal reached the Executed terminal state
    ProposalExecuted { id: u64 },
    /// A proposal reached the Canceled terminal state
    ProposalCanceled { id: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = GovernanceEvent::VoteCast {
            proposal: 3,
            voter: Address::from_bytes([5u8; 20]),
            support: true,
            weight: 4,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("VoteCast"));

        let back: GovernanceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
