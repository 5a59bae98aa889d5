//! PostgreSQL implementation of the pins repository.
//!
//! Every vote runs in one transaction that first takes a row lock on the pin
//! (`SELECT ... FOR UPDATE`). All votes on a pin are therefore serialized, the
//! ledger lookup and the counter update can never interleave with another
//! request, and the `(pin_id, voter_key)` unique constraint is left as the
//! guard that turns a broken serialization into an error instead of a
//! silently duplicated vote.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classic_plus_shared::types::{
    NewPin, Pin, PinId, UserVote, VoteDirection, VoteReceipt, VoteTransition, VoterKey,
    VotesCount,
};
use tracing::debug;

use crate::{PinsRepository, PinsRepositoryError};

type PgTransaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

#[derive(sqlx::FromRow)]
struct PinRow {
    id: i64,
    x: f64,
    y: f64,
    name: String,
    description: String,
    category: String,
    upvotes: i64,
    downvotes: i64,
}

impl TryFrom<PinRow> for Pin {
    type Error = PinsRepositoryError;

    fn try_from(row: PinRow) -> Result<Self, Self::Error> {
        Ok(Pin {
            id: row.id,
            x: row.x,
            y: row.y,
            name: row.name,
            description: row.description,
            category: row
                .category
                .parse()
                .map_err(|_| PinsRepositoryError::InvalidCategory(row.category.clone()))?,
            upvotes: row.upvotes,
            downvotes: row.downvotes,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    pin_id: i64,
    direction: String,
    voted_at: DateTime<Utc>,
}

fn parse_direction(value: &str) -> Result<VoteDirection, PinsRepositoryError> {
    value
        .parse()
        .map_err(|_| PinsRepositoryError::InvalidVoteType(value.to_string()))
}

/// PostgreSQL implementation of the pins repository.
///
/// Uses a `sqlx::PgPool`; each operation acquires a connection for its own
/// duration only.
pub struct PostgresPinsRepository {
    pool: sqlx::PgPool,
}

impl PostgresPinsRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the migrated schema
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresPinsRepository)` - Ready-to-use repository instance
    /// * `Err(PinsRepositoryError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, PinsRepositoryError> {
        Ok(Self { pool })
    }

    /// Locks the pin row for the rest of the transaction and returns its counters.
    async fn lock_pin_tx(
        &self,
        pin_id: PinId,
        tx: &mut PgTransaction<'_>,
    ) -> Result<Option<VotesCount>, PinsRepositoryError> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT upvotes, downvotes FROM pins WHERE id = $1 FOR UPDATE")
                .bind(pin_id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(row.map(|(upvotes, downvotes)| VotesCount {
            pin_id,
            upvotes,
            downvotes,
        }))
    }

    async fn find_vote_tx(
        &self,
        pin_id: PinId,
        voter_key: &VoterKey,
        tx: &mut PgTransaction<'_>,
    ) -> Result<Option<VoteDirection>, PinsRepositoryError> {
        let direction: Option<String> =
            sqlx::query_scalar("SELECT direction FROM votes WHERE pin_id = $1 AND voter_key = $2")
                .bind(pin_id)
                .bind(voter_key.as_str())
                .fetch_optional(&mut **tx)
                .await?;

        direction.as_deref().map(parse_direction).transpose()
    }

    /// Applies the ledger side of a transition: insert, delete, or update one row.
    async fn write_ledger_tx(
        &self,
        pin_id: PinId,
        voter_key: &VoterKey,
        transition: VoteTransition,
        tx: &mut PgTransaction<'_>,
    ) -> Result<(), PinsRepositoryError> {
        match transition {
            VoteTransition::Cast(direction) => {
                sqlx::query("INSERT INTO votes (pin_id, voter_key, direction) VALUES ($1, $2, $3)")
                    .bind(pin_id)
                    .bind(voter_key.as_str())
                    .bind(direction.as_str())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| match e {
                        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                            PinsRepositoryError::DuplicateVote {
                                pin_id,
                                voter_key: voter_key.clone(),
                            }
                        }
                        other => PinsRepositoryError::DatabaseError(other),
                    })?;
            }
            VoteTransition::Retract(_) => {
                let result = sqlx::query("DELETE FROM votes WHERE pin_id = $1 AND voter_key = $2")
                    .bind(pin_id)
                    .bind(voter_key.as_str())
                    .execute(&mut **tx)
                    .await?;
                if result.rows_affected() != 1 {
                    return Err(PinsRepositoryError::LedgerMismatch { pin_id });
                }
            }
            VoteTransition::Switch { to, .. } => {
                let result = sqlx::query(
                    "UPDATE votes SET direction = $3, voted_at = now() WHERE pin_id = $1 AND voter_key = $2",
                )
                .bind(pin_id)
                .bind(voter_key.as_str())
                .bind(to.as_str())
                .execute(&mut **tx)
                .await?;
                if result.rows_affected() != 1 {
                    return Err(PinsRepositoryError::LedgerMismatch { pin_id });
                }
            }
        }
        Ok(())
    }

    /// Applies the counter side of a transition as deltas on the locked row.
    async fn update_counters_tx(
        &self,
        pin_id: PinId,
        transition: VoteTransition,
        tx: &mut PgTransaction<'_>,
    ) -> Result<VotesCount, PinsRepositoryError> {
        let (up_delta, down_delta) = transition.deltas();
        let (upvotes, downvotes): (i64, i64) = sqlx::query_as(
            r#"
            UPDATE pins
            SET upvotes = upvotes + $2,
                downvotes = downvotes + $3
            WHERE id = $1
            RETURNING upvotes, downvotes
            "#,
        )
        .bind(pin_id)
        .bind(up_delta)
        .bind(down_delta)
        .fetch_one(&mut **tx)
        .await?;

        Ok(VotesCount {
            pin_id,
            upvotes,
            downvotes,
        })
    }
}

#[async_trait]
impl PinsRepository for PostgresPinsRepository {
    async fn create_pin(&self, pin: &NewPin) -> Result<Pin, PinsRepositoryError> {
        let row = sqlx::query_as::<_, PinRow>(
            r#"
            INSERT INTO pins (x, y, name, description, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, x, y, name, description, category, upvotes, downvotes
            "#,
        )
        .bind(pin.x)
        .bind(pin.y)
        .bind(&pin.name)
        .bind(&pin.description)
        .bind(pin.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_pins(&self) -> Result<Vec<Pin>, PinsRepositoryError> {
        let rows = sqlx::query_as::<_, PinRow>(
            "SELECT id, x, y, name, description, category, upvotes, downvotes FROM pins ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Pin::try_from).collect()
    }

    async fn get_pin(&self, pin_id: PinId) -> Result<Option<Pin>, PinsRepositoryError> {
        let row = sqlx::query_as::<_, PinRow>(
            "SELECT id, x, y, name, description, category, upvotes, downvotes FROM pins WHERE id = $1",
        )
        .bind(pin_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Pin::try_from).transpose()
    }

    /// Resolves and applies a vote inside one transaction.
    ///
    /// The pin row lock is taken before the ledger is read, so the decision
    /// and both writes see a state no other vote on this pin can change.
    /// Dropping the transaction on any error rolls everything back.
    async fn apply_vote(
        &self,
        pin_id: PinId,
        voter_key: &VoterKey,
        direction: VoteDirection,
    ) -> Result<VoteReceipt, PinsRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let counts = self
            .lock_pin_tx(pin_id, &mut tx)
            .await?
            .ok_or(PinsRepositoryError::PinNotFound(pin_id))?;
        let existing = self.find_vote_tx(pin_id, voter_key, &mut tx).await?;
        let transition = VoteTransition::resolve(existing, direction);
        if counts.apply(transition).is_none() {
            return Err(PinsRepositoryError::NegativeCounter(pin_id));
        }

        self.write_ledger_tx(pin_id, voter_key, transition, &mut tx).await?;
        let updated = self.update_counters_tx(pin_id, transition, &mut tx).await?;
        tx.commit().await?;

        debug!(pin_id, ?transition, upvotes = updated.upvotes, downvotes = updated.downvotes, "Vote applied");
        Ok(VoteReceipt::new(updated, transition))
    }

    async fn list_votes_for_voter(
        &self,
        voter_key: &VoterKey,
    ) -> Result<Vec<UserVote>, PinsRepositoryError> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT pin_id, direction, voted_at FROM votes WHERE voter_key = $1 ORDER BY pin_id",
        )
        .bind(voter_key.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(UserVote {
                    pin_id: row.pin_id,
                    direction: parse_direction(&row.direction)?,
                    voted_at: row.voted_at,
                })
            })
            .collect()
    }
}
