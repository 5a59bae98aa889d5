use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Store-assigned identifier of a pin.
pub type PinId = i64;

/// The kind of point of interest a pin marks on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinCategory {
    Lore,
    Quest,
    Raid,
    Dungeon,
}

impl PinCategory {
    pub const ALL: [PinCategory; 4] = [
        PinCategory::Lore,
        PinCategory::Quest,
        PinCategory::Raid,
        PinCategory::Dungeon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PinCategory::Lore => "Lore",
            PinCategory::Quest => "Quest",
            PinCategory::Raid => "Raid",
            PinCategory::Dungeon => "Dungeon",
        }
    }
}

impl fmt::Display for PinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PinCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PinCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidCategory(value.to_string()))
    }
}

/// A point of interest on the 2-D map together with its vote aggregate.
///
/// `upvotes` and `downvotes` are denormalized from the vote ledger and are
/// only ever written by the voting operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub description: String,
    pub category: PinCategory,
    pub upvotes: i64,
    pub downvotes: i64,
}

/// A pin creation request. Counters are not part of it: new pins start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPin {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub description: String,
    pub category: PinCategory,
}

impl NewPin {
    /// Checks the request and returns it with surrounding whitespace trimmed
    /// from the text fields.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a coordinate is not finite or if the
    /// name or description is blank.
    pub fn validated(self) -> Result<Self, ValidationError> {
        if !self.x.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate("x"));
        }
        if !self.y.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate("y"));
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }

        Ok(NewPin {
            name: name.to_string(),
            description: description.to_string(),
            ..self
        })
    }
}
