use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PinId, VoteDirection};

/// A voter's current vote on one pin, as read back from the vote ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVote {
    pub pin_id: PinId,
    pub direction: VoteDirection,
    pub voted_at: DateTime<Utc>,
}
