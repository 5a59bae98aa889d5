//! PostgreSQL implementation of the survey repository.
//!
//! Responses are stored as JSONB in `survey_entries`, one row per identity,
//! with `ON CONFLICT (identity) DO UPDATE` providing the upsert.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classic_plus_shared::types::{SurveyEntry, SurveyResponses};
use sqlx::types::Json;

use crate::{SurveyRepository, SurveyRepositoryError};

#[derive(sqlx::FromRow)]
struct SurveyEntryRow {
    id: i64,
    identity: String,
    responses: Json<SurveyResponses>,
    updated_at: DateTime<Utc>,
}

impl From<SurveyEntryRow> for SurveyEntry {
    fn from(row: SurveyEntryRow) -> Self {
        SurveyEntry {
            id: row.id,
            identity: row.identity,
            responses: row.responses.0,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed survey repository.
pub struct PostgresSurveyRepository {
    pool: sqlx::PgPool,
}

impl PostgresSurveyRepository {
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, SurveyRepositoryError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl SurveyRepository for PostgresSurveyRepository {
    async fn upsert_entry(
        &self,
        identity: &str,
        responses: &SurveyResponses,
    ) -> Result<SurveyEntry, SurveyRepositoryError> {
        let row = sqlx::query_as::<_, SurveyEntryRow>(
            r#"
            INSERT INTO survey_entries (identity, responses)
            VALUES ($1, $2)
            ON CONFLICT (identity)
            DO UPDATE SET
                responses = EXCLUDED.responses,
                updated_at = now()
            RETURNING id, identity, responses, updated_at
            "#,
        )
        .bind(identity)
        .bind(Json(responses))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_entry(&self, identity: &str) -> Result<Option<SurveyEntry>, SurveyRepositoryError> {
        let row = sqlx::query_as::<_, SurveyEntryRow>(
            "SELECT id, identity, responses, updated_at FROM survey_entries WHERE identity = $1",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SurveyEntry::from))
    }

    async fn list_entries(&self) -> Result<Vec<SurveyEntry>, SurveyRepositoryError> {
        let rows = sqlx::query_as::<_, SurveyEntryRow>(
            "SELECT id, identity, responses, updated_at FROM survey_entries ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SurveyEntry::from).collect())
    }
}
