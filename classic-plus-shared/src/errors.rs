//! Validation errors raised while building domain values from client input.
use thiserror::Error;

/// Represents a rejected piece of client input.
///
/// These errors are always correctable by the caller, so their messages are
/// meant to be returned verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid vote type: '{0}'. Must be 'up' or 'down'.")]
    InvalidVoteDirection(String),

    #[error("Invalid pin category: '{0}'. Must be one of Lore, Quest, Raid, Dungeon.")]
    InvalidCategory(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Coordinate '{0}' must be a finite number")]
    NonFiniteCoordinate(&'static str),
}
