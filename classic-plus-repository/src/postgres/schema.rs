//! Schema management for the PostgreSQL store.
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use tracing::{info, warn};

use crate::{SchemaError, SchemaManager};

/// Embedded migrations for every table of the store.
pub static MIGRATOR: Migrator = sqlx::migrate!("src/postgres/migrations");

/// Tables dropped by a reset, including sqlx's own migration ledger so that
/// the migrations run again from scratch.
const RESET_STATEMENT: &str =
    "DROP TABLE IF EXISTS votes, pins, survey_entries, _sqlx_migrations CASCADE";

/// PostgreSQL-backed schema manager.
pub struct PostgresSchemaManager {
    pool: sqlx::PgPool,
}

impl PostgresSchemaManager {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaManager for PostgresSchemaManager {
    async fn migrate(&self) -> Result<(), SchemaError> {
        MIGRATOR.run(&self.pool).await?;
        info!(migrations = MIGRATOR.iter().count(), "Database schema is up to date");
        Ok(())
    }

    /// Drops and recreates the schema in a single transaction, so a failed
    /// migration rolls back to the previous tables.
    async fn reset(&self) -> Result<(), SchemaError> {
        warn!("Dropping all application tables");
        let mut tx = self.pool.begin().await?;
        sqlx::query(RESET_STATEMENT).execute(&mut *tx).await?;
        MIGRATOR.run_direct(&mut *tx).await?;
        tx.commit().await?;
        info!(migrations = MIGRATOR.iter().count(), "Database schema recreated");
        Ok(())
    }
}
