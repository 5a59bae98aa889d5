//! # Classic Plus Shared
//! This crate defines the domain types shared by the Classic Plus backend crates.
//! It includes map pins, the vote ledger types and the vote state machine,
//! voter keys, and the survey definition, entry, and result types.
pub mod errors;
pub mod types;

pub use errors::ValidationError;
