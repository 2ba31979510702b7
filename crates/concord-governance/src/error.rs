use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every variant corresponds to one rejected-operation condition. No
/// operation mutates any state before signaling one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Caller is not the registry owner")]
    Unauthorized,

    #[error("The zero address is not a valid member identity")]
    InvalidIdentity,

    #[error("Identity is already an active member")]
    AlreadyMember,

    #[error("Identity is not an active member")]
    NotAMember,

    #[error("Proposal description must not be empty")]
    EmptyDescription,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("Voting has not started")]
    VotingNotStarted,

    #[error("Voting period has ended")]
    VotingEnded,

    #[error("Member has already voted on this proposal")]
    AlreadyVoted,

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Proposal already canceled")]
    AlreadyCanceled,

    #[error("Member tenure is below the voting requirement")]
    InsufficientTenure,

    #[error("Voting period has not ended")]
    VotingPeriodNotEnded,

    #[error("Quorum not met: {total} < {required}")]
    QuorumNotMet { total: u64, required: u64 },

    #[error("Proposal did not pass")]
    ProposalDidNotPass,

    #[error("Only the proposer or the owner may cancel")]
    NotAuthorizedToCancel,
}
