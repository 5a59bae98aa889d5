use thiserror::Error;

/// Represents errors raised while creating or resetting the store schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
