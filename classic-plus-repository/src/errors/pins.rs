//! Error types for the pins repository.
use classic_plus_shared::types::{PinId, VoterKey};
use thiserror::Error;

/// Represents errors that can occur within the pins repository.
///
/// `PinNotFound` is the only variant a caller can correct. The consistency
/// variants mean the ledger and the aggregate disagree, which a correct
/// voting operation never produces.
#[derive(Debug, Error)]
pub enum PinsRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Pin not found: {0}")]
    PinNotFound(PinId),

    #[error("Duplicate vote on pin {pin_id} for voter {voter_key}")]
    DuplicateVote { pin_id: PinId, voter_key: VoterKey },

    #[error("Vote ledger entry for pin {pin_id} changed underneath the vote")]
    LedgerMismatch { pin_id: PinId },

    #[error("Vote counter of pin {0} would become negative")]
    NegativeCounter(PinId),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),
}

impl PinsRepositoryError {
    /// Whether the error reveals an inconsistency between the vote ledger and
    /// stored data rather than a database or caller problem.
    pub fn is_consistency_failure(&self) -> bool {
        matches!(
            self,
            PinsRepositoryError::DuplicateVote { .. }
                | PinsRepositoryError::LedgerMismatch { .. }
                | PinsRepositoryError::NegativeCounter(_)
                | PinsRepositoryError::InvalidVoteType(_)
                | PinsRepositoryError::InvalidCategory(_)
        )
    }
}
