//! In-memory implementation of every repository interface.
//!
//! All state sits behind one mutex that a vote holds from the ledger lookup
//! to the counter update, which gives the same per-pin linearizability as the
//! PostgreSQL row lock. The lock is never held across an `.await`.
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classic_plus_shared::types::{
    NewPin, Pin, PinId, SurveyEntry, SurveyResponses, UserVote, VoteDirection, VoteReceipt,
    VoteTransition, VoterKey, VotesCount,
};
use tracing::debug;

use crate::{
    PinsRepository, PinsRepositoryError, SchemaError, SchemaManager, SurveyRepository,
    SurveyRepositoryError,
};

#[derive(Debug, Clone, Copy)]
struct LedgerEntry {
    direction: VoteDirection,
    voted_at: DateTime<Utc>,
}

#[derive(Default)]
struct StoreState {
    pins: BTreeMap<PinId, Pin>,
    votes: HashMap<(PinId, VoterKey), LedgerEntry>,
    survey_entries: HashMap<String, SurveyEntry>,
    last_pin_id: PinId,
    last_survey_entry_id: i64,
}

/// Process-local store for development runs and tests.
///
/// Implements [`PinsRepository`], [`SurveyRepository`], and [`SchemaManager`]
/// over shared state, so a single `Arc<InMemoryStore>` can back all three.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the ledger entries of a pin, independently of its stored counters.
    pub fn ledger_tally(&self, pin_id: PinId) -> VotesCount {
        let state = self.state();
        let mut tally = VotesCount {
            pin_id,
            upvotes: 0,
            downvotes: 0,
        };
        for ((voted_pin, _), entry) in &state.votes {
            if *voted_pin != pin_id {
                continue;
            }
            match entry.direction {
                VoteDirection::Up => tally.upvotes += 1,
                VoteDirection::Down => tally.downvotes += 1,
            }
        }
        tally
    }
}

#[async_trait]
impl PinsRepository for InMemoryStore {
    async fn create_pin(&self, pin: &NewPin) -> Result<Pin, PinsRepositoryError> {
        let mut state = self.state();
        state.last_pin_id += 1;
        let stored = Pin {
            id: state.last_pin_id,
            x: pin.x,
            y: pin.y,
            name: pin.name.clone(),
            description: pin.description.clone(),
            category: pin.category,
            upvotes: 0,
            downvotes: 0,
        };
        state.pins.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_pins(&self) -> Result<Vec<Pin>, PinsRepositoryError> {
        Ok(self.state().pins.values().cloned().collect())
    }

    async fn get_pin(&self, pin_id: PinId) -> Result<Option<Pin>, PinsRepositoryError> {
        Ok(self.state().pins.get(&pin_id).cloned())
    }

    async fn apply_vote(
        &self,
        pin_id: PinId,
        voter_key: &VoterKey,
        direction: VoteDirection,
    ) -> Result<VoteReceipt, PinsRepositoryError> {
        let mut state = self.state();
        let counts = state
            .pins
            .get(&pin_id)
            .map(VotesCount::from)
            .ok_or(PinsRepositoryError::PinNotFound(pin_id))?;

        let ledger_key = (pin_id, voter_key.clone());
        let existing = state.votes.get(&ledger_key).map(|entry| entry.direction);
        let transition = VoteTransition::resolve(existing, direction);
        let updated = counts
            .apply(transition)
            .ok_or(PinsRepositoryError::NegativeCounter(pin_id))?;

        match transition.resulting_vote() {
            Some(direction) => {
                state.votes.insert(
                    ledger_key,
                    LedgerEntry {
                        direction,
                        voted_at: Utc::now(),
                    },
                );
            }
            None => {
                state.votes.remove(&ledger_key);
            }
        }
        if let Some(pin) = state.pins.get_mut(&pin_id) {
            pin.upvotes = updated.upvotes;
            pin.downvotes = updated.downvotes;
        }

        debug!(pin_id, ?transition, upvotes = updated.upvotes, downvotes = updated.downvotes, "Vote applied");
        Ok(VoteReceipt::new(updated, transition))
    }

    async fn list_votes_for_voter(
        &self,
        voter_key: &VoterKey,
    ) -> Result<Vec<UserVote>, PinsRepositoryError> {
        let state = self.state();
        let mut votes: Vec<UserVote> = state
            .votes
            .iter()
            .filter(|((_, key), _)| key == voter_key)
            .map(|((pin_id, _), entry)| UserVote {
                pin_id: *pin_id,
                direction: entry.direction,
                voted_at: entry.voted_at,
            })
            .collect();
        votes.sort_by_key(|vote| vote.pin_id);
        Ok(votes)
    }
}

#[async_trait]
impl SurveyRepository for InMemoryStore {
    async fn upsert_entry(
        &self,
        identity: &str,
        responses: &SurveyResponses,
    ) -> Result<SurveyEntry, SurveyRepositoryError> {
        let mut state = self.state();
        let now = Utc::now();
        if let Some(entry) = state.survey_entries.get_mut(identity) {
            entry.responses = responses.clone();
            entry.updated_at = now;
            return Ok(entry.clone());
        }

        state.last_survey_entry_id += 1;
        let entry = SurveyEntry {
            id: state.last_survey_entry_id,
            identity: identity.to_string(),
            responses: responses.clone(),
            updated_at: now,
        };
        state.survey_entries.insert(identity.to_string(), entry.clone());
        Ok(entry)
    }

    async fn get_entry(&self, identity: &str) -> Result<Option<SurveyEntry>, SurveyRepositoryError> {
        Ok(self.state().survey_entries.get(identity).cloned())
    }

    async fn list_entries(&self) -> Result<Vec<SurveyEntry>, SurveyRepositoryError> {
        let mut entries: Vec<SurveyEntry> = self.state().survey_entries.values().cloned().collect();
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }
}

#[async_trait]
impl SchemaManager for InMemoryStore {
    async fn migrate(&self) -> Result<(), SchemaError> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), SchemaError> {
        *self.state() = StoreState::default();
        Ok(())
    }
}
