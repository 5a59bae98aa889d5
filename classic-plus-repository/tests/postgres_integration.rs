//! Integration tests for the PostgreSQL repositories.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration`

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use classic_plus_repository::{
    PinsRepository, PinsRepositoryError, PostgresPinsRepository, PostgresSchemaManager,
    PostgresSurveyRepository, SchemaManager, SurveyRepository, postgres::MIGRATOR,
};
use classic_plus_shared::types::{
    NewPin, PinCategory, SurveyResponses, VoteDirection, VoterKey, VotesCount,
};
use serde_json::json;
use sqlx::Row;

/// Creates a test pin with default values.
fn make_new_pin() -> NewPin {
    NewPin {
        x: 512.0,
        y: 1024.0,
        name: "Shadowed Keep".to_string(),
        description: "This location is a raid entrance.".to_string(),
        category: PinCategory::Raid,
    }
}

fn voter(token: &str) -> VoterKey {
    VoterKey::derive(token, IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)))
}

/// Recounts the ledger rows of a pin straight from the `votes` table.
async fn ledger_tally(pool: &sqlx::PgPool, pin_id: i64) -> VotesCount {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE direction = 'up') AS upvotes,
            COUNT(*) FILTER (WHERE direction = 'down') AS downvotes
        FROM votes
        WHERE pin_id = $1
        "#,
    )
    .bind(pin_id)
    .fetch_one(pool)
    .await
    .unwrap();

    VotesCount {
        pin_id,
        upvotes: row.get("upvotes"),
        downvotes: row.get("downvotes"),
    }
}

// ============================================================================
// Pins Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_create_and_list_pins(pool: sqlx::PgPool) {
    let repository = PostgresPinsRepository::new(pool.clone()).await.unwrap();

    let first = repository.create_pin(&make_new_pin()).await.unwrap();
    let second = repository.create_pin(&make_new_pin()).await.unwrap();

    assert!(first.id < second.id);
    assert_eq!((first.upvotes, first.downvotes), (0, 0));
    assert_eq!(first.category, PinCategory::Raid);

    let pins = repository.list_pins().await.unwrap();
    assert_eq!(pins, vec![first.clone(), second]);
    assert_eq!(repository.get_pin(first.id).await.unwrap(), Some(first));
    assert_eq!(repository.get_pin(9999).await.unwrap(), None);
}

// ============================================================================
// Voting Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_end_to_end_voting_scenario(pool: sqlx::PgPool) {
    let repository = PostgresPinsRepository::new(pool.clone()).await.unwrap();
    let pin = repository.create_pin(&make_new_pin()).await.unwrap();
    let v1 = voter("v1");
    let v2 = voter("v2");

    let steps = [
        (&v1, VoteDirection::Up, (1, 0), Some(VoteDirection::Up)),
        (&v2, VoteDirection::Up, (2, 0), Some(VoteDirection::Up)),
        (&v1, VoteDirection::Down, (1, 1), Some(VoteDirection::Down)),
        (&v1, VoteDirection::Down, (1, 0), None),
    ];
    for (key, direction, expected, vote) in steps {
        let receipt = repository.apply_vote(pin.id, key, direction).await.unwrap();
        assert_eq!((receipt.upvotes, receipt.downvotes), expected);
        assert_eq!(receipt.vote, vote);
        assert_eq!(ledger_tally(&pool, pin.id).await, receipt.counts());
    }

    assert!(repository.list_votes_for_voter(&v1).await.unwrap().is_empty());
    let v2_votes = repository.list_votes_for_voter(&v2).await.unwrap();
    assert_eq!(v2_votes.len(), 1);
    assert_eq!(v2_votes[0].direction, VoteDirection::Up);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_vote_on_missing_pin_is_rolled_back(pool: sqlx::PgPool) {
    let repository = PostgresPinsRepository::new(pool.clone()).await.unwrap();

    let result = repository.apply_vote(4242, &voter("ghost"), VoteDirection::Up).await;

    assert!(matches!(result, Err(PinsRepositoryError::PinNotFound(4242))));
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_concurrent_votes_keep_counters_consistent(pool: sqlx::PgPool) {
    let repository = Arc::new(PostgresPinsRepository::new(pool.clone()).await.unwrap());
    let pin = repository.create_pin(&make_new_pin()).await.unwrap();
    let pin_id = pin.id;

    let mut handles = Vec::new();
    for i in 0..24 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let key = voter(&format!("voter-{}", i % 8));
            let direction = if i % 3 == 0 { VoteDirection::Down } else { VoteDirection::Up };
            repository.apply_vote(pin_id, &key, direction).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = repository.get_pin(pin_id).await.unwrap().unwrap();
    assert_eq!(ledger_tally(&pool, pin_id).await, VotesCount::from(&stored));
    assert!(stored.upvotes >= 0 && stored.downvotes >= 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_ledger_rejects_duplicate_rows(pool: sqlx::PgPool) {
    let repository = PostgresPinsRepository::new(pool.clone()).await.unwrap();
    let pin = repository.create_pin(&make_new_pin()).await.unwrap();
    let key = voter("dup");
    repository.apply_vote(pin.id, &key, VoteDirection::Up).await.unwrap();

    let result = sqlx::query("INSERT INTO votes (pin_id, voter_key, direction) VALUES ($1, $2, 'down')")
        .bind(pin.id)
        .bind(key.as_str())
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

// ============================================================================
// Survey Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_survey_upsert_overwrites_previous_answers(pool: sqlx::PgPool) {
    let repository = PostgresSurveyRepository::new(pool.clone()).await.unwrap();

    let first: SurveyResponses = serde_json::from_value(json!({"name": "Thrall"})).unwrap();
    let second: SurveyResponses =
        serde_json::from_value(json!({"name": "Jaina", "scaling_raids": "Yes"})).unwrap();

    let created = repository.upsert_entry("alice", &first).await.unwrap();
    let updated = repository.upsert_entry("alice", &second).await.unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.responses, second);
    assert!(updated.updated_at >= created.updated_at);

    let stored = repository.get_entry("alice").await.unwrap().unwrap();
    assert_eq!(stored.responses, second);
    assert_eq!(repository.list_entries().await.unwrap().len(), 1);
    assert!(repository.get_entry("bob").await.unwrap().is_none());
}

// ============================================================================
// Schema Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_reset_recreates_empty_schema(pool: sqlx::PgPool) {
    let pins = PostgresPinsRepository::new(pool.clone()).await.unwrap();
    let surveys = PostgresSurveyRepository::new(pool.clone()).await.unwrap();
    let schema = PostgresSchemaManager::new(pool.clone());

    let pin = pins.create_pin(&make_new_pin()).await.unwrap();
    pins.apply_vote(pin.id, &voter("a"), VoteDirection::Up).await.unwrap();
    surveys.upsert_entry("alice", &SurveyResponses::new()).await.unwrap();

    schema.reset().await.unwrap();

    assert!(pins.list_pins().await.unwrap().is_empty());
    assert!(surveys.list_entries().await.unwrap().is_empty());
    assert!(pins.list_votes_for_voter(&voter("a")).await.unwrap().is_empty());

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(applied as usize, MIGRATOR.iter().count());

    let pin = pins.create_pin(&make_new_pin()).await.unwrap();
    let receipt = pins.apply_vote(pin.id, &voter("a"), VoteDirection::Up).await.unwrap();
    assert_eq!(receipt.upvotes, 1);
    schema.migrate().await.unwrap();
}
