//! Parsing declarative constraint text into typed rules.
//!
//! Parsing happens once, before compilation, so compiled constraints never
//! look at description text while the search runs.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{ClockTime, ClockWindow, Constraint, ConstraintType};

/// A validated scheduling rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Consecutive departures of one aircraft must be a turnaround apart.
    Turnaround {
        constraint_id: String,
        aircraft: String,
    },
    /// A crew's accumulated duty must stay under the maximum.
    CrewDuty { constraint_id: String, crew: String },
    /// Operations at an airport inside a window are capped.
    ///
    /// `window: None` means the description carried no `HH:MM-HH:MM`
    /// range; the rule is then always satisfied.
    AirportCapacity {
        constraint_id: String,
        airport: String,
        window: Option<ClockWindow>,
    },
}

impl Rule {
    /// Parses a declarative constraint.
    ///
    /// Returns `None` for constraint types that are not compiled
    /// (Cargo, Time, custom) and for descriptions missing the operand
    /// token.
    pub fn parse(constraint: &Constraint) -> Option<Self> {
        let constraint_id = constraint.id.clone();
        let rule = match constraint.constraint_type {
            ConstraintType::Aircraft => Self::Turnaround {
                constraint_id,
                aircraft: constraint.token(0)?.to_string(),
            },
            ConstraintType::Crew => Self::CrewDuty {
                constraint_id,
                crew: constraint.token(1)?.to_string(),
            },
            ConstraintType::Airport => {
                let airport = constraint.token(0)?.to_string();
                let window = parse_window(&constraint.description);
                if window.is_none() {
                    warn!(
                        "Airport constraint '{}' has no HH:MM-HH:MM window; treating it as satisfied",
                        constraint.id
                    );
                }
                Self::AirportCapacity {
                    constraint_id,
                    airport,
                    window,
                }
            }
            _ => return None,
        };
        Some(rule)
    }

    /// Parses every compilable constraint, skipping the rest.
    pub fn parse_all(constraints: &[Constraint]) -> Vec<Self> {
        constraints
            .iter()
            .filter_map(|c| {
                let rule = Self::parse(c);
                if rule.is_none() {
                    warn!(
                        "Skipping {} constraint '{}': not compiled into search constraints",
                        c.constraint_type, c.id
                    );
                }
                rule
            })
            .collect()
    }

    /// Identifier of the declarative constraint this rule came from.
    pub fn constraint_id(&self) -> &str {
        match self {
            Self::Turnaround { constraint_id, .. }
            | Self::CrewDuty { constraint_id, .. }
            | Self::AirportCapacity { constraint_id, .. } => constraint_id,
        }
    }
}

fn window_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})").expect("window pattern is valid")
    })
}

/// Extracts the first `HH:MM-HH:MM` window from free text.
///
/// Returns `None` if there is no such range or either bound is not a
/// valid time of day.
pub fn parse_window(text: &str) -> Option<ClockWindow> {
    let captures = window_pattern().captures(text)?;
    let start: ClockTime = captures.get(1)?.as_str().parse().ok()?;
    let end: ClockTime = captures.get(2)?.as_str().parse().ok()?;
    Some(ClockWindow::new(start, end))
}
