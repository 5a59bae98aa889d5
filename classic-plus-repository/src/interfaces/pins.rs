//! This module defines the `PinsRepository` trait, which provides an interface
//! for interacting with the underlying data store for pins and their vote ledger.
use classic_plus_shared::types::{
    NewPin, Pin, PinId, UserVote, VoteDirection, VoteReceipt, VoterKey,
};

use crate::errors::PinsRepositoryError;

/// A trait that defines the interface for interacting with the pins data repository.
///
/// Implementors own the invariant that every pin's `upvotes` and `downvotes`
/// equal the number of ledger entries with that direction. `apply_vote` is the
/// only method allowed to change either side of it.
#[async_trait::async_trait]
pub trait PinsRepository: Send + Sync {
    /// Stores a new pin with zero counters.
    ///
    /// # Arguments
    ///
    /// * `pin` - The validated pin creation request.
    ///
    /// # Returns
    ///
    /// The stored `Pin`, including its assigned identifier.
    async fn create_pin(&self, pin: &NewPin) -> Result<Pin, PinsRepositoryError>;

    /// Returns every pin ordered by identifier.
    async fn list_pins(&self) -> Result<Vec<Pin>, PinsRepositoryError>;

    /// Returns the pin with the given identifier, if any.
    async fn get_pin(&self, pin_id: PinId) -> Result<Option<Pin>, PinsRepositoryError>;

    /// Applies one vote request of `voter_key` on `pin_id` as a single atomic unit.
    ///
    /// The request is resolved against the voter's existing vote: no vote casts
    /// a new one, the same direction retracts it, the other direction switches
    /// it. Requests on the same pin are serialized, so concurrent voters never
    /// lose counter updates.
    ///
    /// # Arguments
    ///
    /// * `pin_id` - The pin voted on.
    /// * `voter_key` - The opaque identity of the voter.
    /// * `direction` - The requested vote direction.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteReceipt)` - Refreshed counters and the voter's resulting vote
    /// * `Err(PinsRepositoryError::PinNotFound)` - Unknown pin
    /// * `Err(PinsRepositoryError)` - Database failure or consistency violation
    async fn apply_vote(
        &self,
        pin_id: PinId,
        voter_key: &VoterKey,
        direction: VoteDirection,
    ) -> Result<VoteReceipt, PinsRepositoryError>;

    /// Returns the current votes of `voter_key`, ordered by pin identifier.
    async fn list_votes_for_voter(
        &self,
        voter_key: &VoterKey,
    ) -> Result<Vec<UserVote>, PinsRepositoryError>;
}
