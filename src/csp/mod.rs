//! Finite-domain constraint satisfaction engine.
//!
//! Variables are index-addressed slots with ordered candidate domains.
//! Constraints are arbitrary predicates over a partial assignment, each
//! declaring the variables it reads so that only relevant constraints are
//! re-checked when a variable changes.
//!
//! # Key Components
//!
//! - [`Assignment`]: slot array with bind/restore snapshots
//! - [`CspConstraint`]: scoped predicate
//! - [`CspEngine`]: MRV/LCV backtracking search under an iteration budget
//! - [`SearchResult`]: status, optional solution, and counters
//!
//! # Reference
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod assignment;
mod constraint;
mod engine;

pub use assignment::{Assignment, VarIndex};
pub use constraint::CspConstraint;
pub use engine::{CspEngine, SearchResult, SearchStats, SearchStatus};
