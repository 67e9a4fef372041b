//! Error types.
//!
//! Only exceptional conditions are errors. Expected "no feasible outcome"
//! cases (no CSP solution, cargo with no eligible flight) are modeled as
//! ordinary result values elsewhere.

use thiserror::Error;

use crate::validation::ValidationError;

/// Failure to parse an `HH:MM` time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Expected HH:MM, got '{0}'")]
    Format(String),
    #[error("Time '{0}' is outside 00:00-23:59")]
    OutOfRange(String),
}

/// Failure while evaluating a registered predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("Unknown predicate '{0}'")]
    UnknownPredicate(String),
    #[error("Predicate '{predicate}' received unexpected operands: {reason}")]
    OperandMismatch {
        predicate: &'static str,
        reason: String,
    },
}

/// Failure of a scheduling run that is not a plain "no solution".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid scheduling input ({} problem(s))", .0.len())]
    InvalidInput(Vec<ValidationError>),
}
