//! # Classic Plus Repository
//! This crate provides traits and implementations for persisting map pins, the
//! pin vote ledger, and survey entries. It includes definitions for errors,
//! interfaces, a PostgreSQL implementation, and an in-memory implementation.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{PinsRepositoryError, SchemaError, SurveyRepositoryError};
pub use interfaces::{PinsRepository, SchemaManager, SurveyRepository};
pub use memory::InMemoryStore;
pub use postgres::{PostgresPinsRepository, PostgresSchemaManager, PostgresSurveyRepository};
