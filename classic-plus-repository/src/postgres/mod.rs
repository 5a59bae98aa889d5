//! PostgreSQL implementation of the Classic Plus repository.
//!
//! ## Database Tables
//!
//! - `pins`: Map pins with their denormalized `upvotes`/`downvotes` counters
//! - `votes`: The vote ledger, unique per (`pin_id`, `voter_key`)
//! - `survey_entries`: One JSONB survey submission per identity
//!
//! The schema lives in `migrations/` and is embedded into the binary.
mod pins_repository;
mod schema;
mod survey_repository;

pub use pins_repository::PostgresPinsRepository;
pub use schema::{MIGRATOR, PostgresSchemaManager};
pub use survey_repository::PostgresSurveyRepository;
