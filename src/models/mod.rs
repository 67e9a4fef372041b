//! Flight scheduling domain models.
//!
//! Provides the data types exchanged with the outside world: flights,
//! cargo, declarative constraints, and run settings. Times are
//! wall-clock values on a 24h ring.
//!
//! # Lifecycle
//!
//! | Type | Created by | Mutated by |
//! |------|-----------|------------|
//! | Flight | caller | search (departure/arrival), heuristics (payload, scores) |
//! | Cargo | caller | cargo packer (assignment, efficiency) |
//! | Constraint | caller | never |
//! | Settings | caller | never |

mod cargo;
mod constraint;
mod flight;
mod settings;
mod time;

pub use cargo::{Cargo, CargoPriority, CargoType};
pub use constraint::{Constraint, ConstraintType};
pub use flight::{Flight, WeatherShift};
pub use settings::{OptimizationPreference, RuleLimits, Settings};
pub use time::{ClockTime, ClockWindow, MINUTES_PER_DAY};
