//! Voting behaviour of the in-memory store.
//!
//! Every test checks the counter/ledger invariant after each vote by
//! recounting the ledger independently of the stored counters.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use classic_plus_repository::{InMemoryStore, PinsRepository, PinsRepositoryError};
use classic_plus_shared::types::{NewPin, Pin, PinCategory, VoteDirection, VoterKey, VotesCount};

fn make_new_pin() -> NewPin {
    NewPin {
        x: 742.25,
        y: 1310.5,
        name: "Ancient Temple".to_string(),
        description: "This location contains treasure.".to_string(),
        category: PinCategory::Lore,
    }
}

fn voter(token: &str) -> VoterKey {
    VoterKey::derive(token, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)))
}

async fn create_pin(store: &InMemoryStore) -> Pin {
    store.create_pin(&make_new_pin()).await.unwrap()
}

async fn vote(store: &InMemoryStore, pin: &Pin, key: &VoterKey, direction: VoteDirection) -> (i64, i64) {
    let receipt = store.apply_vote(pin.id, key, direction).await.unwrap();
    let stored = store.get_pin(pin.id).await.unwrap().unwrap();
    assert_eq!(receipt.counts(), VotesCount::from(&stored));
    assert_eq!(store.ledger_tally(pin.id), VotesCount::from(&stored));
    (receipt.upvotes, receipt.downvotes)
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;
    assert_eq!((pin.upvotes, pin.downvotes), (0, 0));

    let v1 = voter("v1");
    let v2 = voter("v2");

    assert_eq!(vote(&store, &pin, &v1, VoteDirection::Up).await, (1, 0));
    assert_eq!(vote(&store, &pin, &v2, VoteDirection::Up).await, (2, 0));
    assert_eq!(vote(&store, &pin, &v1, VoteDirection::Down).await, (1, 1));
    assert_eq!(vote(&store, &pin, &v1, VoteDirection::Down).await, (1, 0));
}

#[tokio::test]
async fn test_repeated_identical_votes_toggle() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;
    let key = voter("toggler");

    assert_eq!(vote(&store, &pin, &key, VoteDirection::Down).await, (0, 1));
    assert_eq!(vote(&store, &pin, &key, VoteDirection::Down).await, (0, 0));
    assert!(store.list_votes_for_voter(&key).await.unwrap().is_empty());
    assert_eq!(vote(&store, &pin, &key, VoteDirection::Down).await, (0, 1));
}

#[tokio::test]
async fn test_switch_leaves_single_ledger_entry() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;
    let key = voter("switcher");

    assert_eq!(vote(&store, &pin, &key, VoteDirection::Up).await, (1, 0));
    assert_eq!(vote(&store, &pin, &key, VoteDirection::Down).await, (0, 1));

    let votes = store.list_votes_for_voter(&key).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].pin_id, pin.id);
    assert_eq!(votes[0].direction, VoteDirection::Down);
}

#[tokio::test]
async fn test_distinct_voters_are_counted_separately() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;

    vote(&store, &pin, &voter("alice"), VoteDirection::Up).await;
    vote(&store, &pin, &voter("bob"), VoteDirection::Up).await;

    assert_eq!(store.ledger_tally(pin.id).upvotes, 2);
    assert_eq!(store.get_pin(pin.id).await.unwrap().unwrap().upvotes, 2);
}

#[tokio::test]
async fn test_same_token_from_another_origin_is_another_voter() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;
    let home = VoterKey::derive("shared-session", IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)));
    let away = VoterKey::derive("shared-session", IpAddr::V6(Ipv6Addr::LOCALHOST));

    assert_eq!(vote(&store, &pin, &home, VoteDirection::Up).await, (1, 0));
    assert_eq!(vote(&store, &pin, &away, VoteDirection::Up).await, (2, 0));
}

#[tokio::test]
async fn test_votes_on_one_pin_leave_other_pins_untouched() {
    let store = InMemoryStore::new();
    let pin_a = create_pin(&store).await;
    let pin_b = create_pin(&store).await;
    let key = voter("focused");

    vote(&store, &pin_a, &key, VoteDirection::Up).await;
    vote(&store, &pin_a, &key, VoteDirection::Down).await;

    let untouched = store.get_pin(pin_b.id).await.unwrap().unwrap();
    assert_eq!((untouched.upvotes, untouched.downvotes), (0, 0));
    assert_eq!(store.ledger_tally(pin_b.id), VotesCount::from(&untouched));
}

#[tokio::test]
async fn test_list_votes_for_voter_spans_pins() {
    let store = InMemoryStore::new();
    let pin_a = create_pin(&store).await;
    let pin_b = create_pin(&store).await;
    let key = voter("explorer");

    vote(&store, &pin_b, &key, VoteDirection::Down).await;
    vote(&store, &pin_a, &key, VoteDirection::Up).await;
    vote(&store, &pin_a, &voter("someone-else"), VoteDirection::Down).await;

    let votes: Vec<_> = store
        .list_votes_for_voter(&key)
        .await
        .unwrap()
        .into_iter()
        .map(|user_vote| (user_vote.pin_id, user_vote.direction))
        .collect();
    assert_eq!(
        votes,
        vec![(pin_a.id, VoteDirection::Up), (pin_b.id, VoteDirection::Down)]
    );
}

#[tokio::test]
async fn test_vote_on_missing_pin_changes_nothing() {
    let store = InMemoryStore::new();
    let pin = create_pin(&store).await;
    let key = voter("lost");

    let result = store.apply_vote(pin.id + 100, &key, VoteDirection::Up).await;

    assert!(matches!(result, Err(PinsRepositoryError::PinNotFound(_))));
    assert!(store.list_votes_for_voter(&key).await.unwrap().is_empty());
}
