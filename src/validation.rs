//! Input validation for flight scheduling requests.
//!
//! Checks structural integrity of flights, cargo, and constraints before
//! any search runs. Detects:
//! - Duplicate IDs
//! - Blank identifiers and airport codes
//! - Negative or non-finite payload figures
//! - Non-positive cargo weights
//! - Cargo pre-assigned to a flight that does not exist
//!
//! Every problem is collected; validation does not stop at the first one.

use std::collections::HashSet;

use crate::models::{Cargo, Constraint, Flight};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A required text field is blank.
    MissingField,
    /// A flight's payload figures are negative or not finite.
    InvalidCapacity,
    /// A cargo weight is not a positive finite number.
    InvalidWeight,
    /// A cargo item references a flight that doesn't exist.
    InvalidFlightReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates the input data for a scheduling request.
///
/// Checks:
/// 1. No duplicate flight, cargo, or constraint IDs
/// 2. Flights have an id, origin, destination, and aircraft
/// 3. Flight payload figures are finite and non-negative
/// 4. Cargo weights are finite and positive
/// 5. Pre-assigned cargo points to an existing flight
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(flights: &[Flight], cargo: &[Cargo], constraints: &[Constraint]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut flight_ids = HashSet::new();
    for f in flights {
        if !flight_ids.insert(f.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate flight ID: {}", f.id),
            ));
        }

        for (field, value) in [
            ("id", &f.id),
            ("origin", &f.origin),
            ("destination", &f.destination),
            ("aircraft", &f.aircraft),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    format!("Flight '{}' has a blank {field}", f.id),
                ));
            }
        }

        if !(f.max_payload.is_finite() && f.max_payload >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Flight '{}' has invalid max payload {}", f.id, f.max_payload),
            ));
        }
        if !(f.current_payload.is_finite() && f.current_payload >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!(
                    "Flight '{}' has invalid current payload {}",
                    f.id, f.current_payload
                ),
            ));
        }
    }

    let mut cargo_ids = HashSet::new();
    for c in cargo {
        if !cargo_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate cargo ID: {}", c.id),
            ));
        }
        if c.id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Cargo item has a blank id",
            ));
        }
        if !(c.weight.is_finite() && c.weight > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("Cargo '{}' has invalid weight {}", c.id, c.weight),
            ));
        }
        if let Some(flight) = &c.assigned_flight {
            if !flight_ids.contains(flight.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidFlightReference,
                    format!("Cargo '{}' references unknown flight '{}'", c.id, flight),
                ));
            }
        }
    }

    let mut constraint_ids = HashSet::new();
    for c in constraints {
        if !constraint_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate constraint ID: {}", c.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
