//! Flight slot scheduling with constraint satisfaction and heuristics.
//!
//! Assigns departure slots to a day's flights under aircraft turnaround,
//! crew duty, airport capacity, and minimum-separation rules, then tunes
//! the result with fuel/weather and cargo-packing heuristics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Flight`, `Cargo`, `Constraint`, `ClockTime`,
//!   `Settings`
//! - **`csp`**: Generic backtracking engine with MRV/LCV ordering
//! - **`compiler`**: Declarative constraints → typed rules → CSP constraints
//! - **`heuristics`**: Fuel/weather optimization and cargo bin-packing
//! - **`predicates`**: Named predicate registry for declarative rule authoring
//! - **`scheduler`**: End-to-end orchestration and KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, capacities, weights)
//!
//! # Time model
//!
//! All times are wall-clock minutes on one 24-hour ring. There are no
//! dates; arrival may wrap past midnight.
//!
//! # References
//!
//! - Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Martello & Toth (1990), "Knapsack Problems"

pub mod compiler;
pub mod csp;
pub mod error;
pub mod heuristics;
pub mod models;
pub mod predicates;
pub mod scheduler;
pub mod validation;
