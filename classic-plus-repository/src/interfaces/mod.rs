//! This module defines and re-exports the interfaces for the Classic Plus repository.
//! It serves as a central point for accessing traits related to data interaction.
mod pins;
mod schema;
mod survey;

pub use pins::PinsRepository;
pub use schema::SchemaManager;
pub use survey::SurveyRepository;
