//! Post-solution heuristics.
//!
//! These run on the flight and cargo collections after a slot assignment
//! has been applied. They never touch search state.
//!
//! - **Fuel** ([`FuelOptimizer`]): cruise settings from an aircraft table,
//!   baseline vs. optimized fuel, weather penalty, shift suggestions.
//! - **Weather** ([`WeatherModel`]): fixed time-of-day penalty table.
//! - **Cargo** ([`CargoPacker`]): priority-ordered greedy bin-packing with
//!   weighted placement criteria.
//!
//! Neither heuristic fails: unknown aircraft keep their cruise fields and
//! cargo that fits nowhere stays unassigned.

mod cargo;
mod fuel;
mod weather;

pub use cargo::{
    CargoPacker, PackingSummary, PlacementCriterion, ProjectedUtilization, RouteSuitability,
    SpecialHandling,
};
pub use fuel::{cruise_profile, CruiseProfile, FuelOptimizer, FuelSummary, CRUISE_PROFILES};
pub use weather::{DayPeriod, WeatherModel, SHIFT_OFFSETS};
