//! Error types for the Classic Plus repository.
//! Consolidates and re-exports error types for each repository interface.
mod pins;
mod schema;
mod survey;

pub use pins::PinsRepositoryError;
pub use schema::SchemaError;
pub use survey::SurveyRepositoryError;
