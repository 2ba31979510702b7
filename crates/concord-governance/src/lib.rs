//! Concord Governance - tenure-weighted membership voting engine.
//!
//! This crate provides:
//! - Membership lifecycle with tenure tracking
//! - Vote-weight computation from membership tenure
//! - Proposal lifecycle (open -> closed -> executed/canceled)
//! - A single-writer facade enforcing all authorization and guard checks
//!
//! The engine never reads a clock of its own: every operation takes the
//! current Unix timestamp as an argument, supplied by the host and assumed
//! non-decreasing across calls.

pub mod engine;
pub mod error;
pub mod events;
pub mod membership;
pub mod proposal;
pub mod weight;

pub use engine::{GovernanceEngine, SharedEngine};
pub use error::GovernanceError;
pub use events::GovernanceEvent;
pub use membership::{Member, MembershipRegistry};
pub use proposal::{Proposal, ProposalStatus, ProposalStore};
pub use weight::vote_weight;

/// Fixed governance policy parameters. These are protocol constants, not
/// runtime configuration.
pub mod params {
    /// Length of every proposal's voting window (7 days, in seconds).
    pub const VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;

    /// Minimum combined vote weight (for + against) before a proposal may
    /// be executed.
    pub const MIN_QUORUM: u64 = 3;

    /// Tenure a member must accrue before their vote weight becomes
    /// non-zero (1 day, in seconds).
    pub const MEMBERSHIP_REQUIREMENT: u64 = 24 * 60 * 60;

    /// Upper bound on any single member's vote weight.
    pub const MAX_WEIGHT: u64 = 5;

    /// Tenure step that grows weight by one (1 week, in seconds).
    pub const WEIGHT_STEP: u64 = 7 * 24 * 60 * 60;
}
