//! Declarative scheduling constraints.
//!
//! Constraints arrive as free text authored outside the core (forms, API
//! payloads). They are read-only input; the compiler parses them into
//! typed rules before anything is evaluated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a declarative constraint.
///
/// Only `Aircraft`, `Crew` and `Airport` are compiled into search
/// constraints. The others are accepted and carried through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    /// Turnaround time between uses of the same aircraft.
    Aircraft,
    /// Crew duty-time limit.
    Crew,
    /// Airport slot capacity within a time window.
    Airport,
    Cargo,
    Time,
    /// Any other tag, carried as its bare string.
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aircraft => f.write_str("Aircraft"),
            Self::Crew => f.write_str("Crew"),
            Self::Airport => f.write_str("Airport"),
            Self::Cargo => f.write_str("Cargo"),
            Self::Time => f.write_str("Time"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// A declarative constraint record.
///
/// # Description formats
///
/// | Type | Description | Parsed |
/// |------|-------------|--------|
/// | Aircraft | `B737-800 needs 45 min turnaround` | first token = aircraft |
/// | Crew | `Crew C1 duty limit` | second token = crew |
/// | Airport | `JFK max ops 06:00-09:00` | first token = airport, `HH:MM-HH:MM` window |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique constraint identifier.
    pub id: String,
    /// Constraint category.
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Free-text description.
    pub description: String,
}

impl Constraint {
    /// Creates a constraint.
    pub fn new(
        id: impl Into<String>,
        constraint_type: ConstraintType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            constraint_type,
            description: description.into(),
        }
    }

    /// Creates an aircraft turnaround constraint.
    pub fn aircraft(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, ConstraintType::Aircraft, description)
    }

    /// Creates a crew duty constraint.
    pub fn crew(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, ConstraintType::Crew, description)
    }

    /// Creates an airport capacity constraint.
    pub fn airport(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, ConstraintType::Airport, description)
    }

    /// The `n`th whitespace-separated token of the description.
    pub fn token(&self, n: usize) -> Option<&str> {
        self.description.split_whitespace().nth(n)
    }
}
