use crate::errors::SchemaError;

/// Trait for creating and destroying the store schema.
#[async_trait::async_trait]
pub trait SchemaManager: Send + Sync {
    /// Brings the schema up to date. Safe to call on every startup.
    async fn migrate(&self) -> Result<(), SchemaError>;

    /// Destroys all stored data and recreates an empty schema.
    async fn reset(&self) -> Result<(), SchemaError>;
}
