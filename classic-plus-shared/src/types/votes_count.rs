use serde::{Deserialize, Serialize};

use crate::types::{Pin, PinId, VoteDirection, VoteTransition};

/// Represents the aggregated vote counts for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotesCount {
    pub pin_id: PinId,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VotesCount {
    /// Returns the counts after applying `transition`, or `None` if a counter
    /// would drop below zero. A negative counter can only come from a ledger
    /// that disagrees with the aggregate.
    pub fn apply(&self, transition: VoteTransition) -> Option<VotesCount> {
        let (up_delta, down_delta) = transition.deltas();
        let upvotes = self.upvotes.checked_add(up_delta).filter(|count| *count >= 0)?;
        let downvotes = self.downvotes.checked_add(down_delta).filter(|count| *count >= 0)?;
        Some(VotesCount {
            pin_id: self.pin_id,
            upvotes,
            downvotes,
        })
    }
}

impl From<&Pin> for VotesCount {
    fn from(pin: &Pin) -> Self {
        VotesCount {
            pin_id: pin.id,
            upvotes: pin.upvotes,
            downvotes: pin.downvotes,
        }
    }
}

/// Result of the voting operation: the refreshed aggregate of the pin and the
/// vote the caller now holds on it (`None` after an undo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub pin_id: PinId,
    pub upvotes: i64,
    pub downvotes: i64,
    pub vote: Option<VoteDirection>,
}

impl VoteReceipt {
    pub fn new(counts: VotesCount, transition: VoteTransition) -> Self {
        VoteReceipt {
            pin_id: counts.pin_id,
            upvotes: counts.upvotes,
            downvotes: counts.downvotes,
            vote: transition.resulting_vote(),
        }
    }

    pub fn counts(&self) -> VotesCount {
        VotesCount {
            pin_id: self.pin_id,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }
}
