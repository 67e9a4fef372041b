//! Constraint compilation.
//!
//! Turns declarative constraints into search constraints in two steps:
//!
//! 1. [`Rule::parse`] reads the free-text description once and produces a
//!    typed [`Rule`] (aircraft, crew, or airport operand plus an optional
//!    time window).
//! 2. [`CspBuilder`] closes each rule over the flights it concerns and adds
//!    the global minimum-separation constraint.
//!
//! | Constraint type | Rule | Scope | Holds when |
//! |-----------------|------|-------|-----------|
//! | Aircraft | `Turnaround` | flights with that aircraft | sorted departures ≥ turnaround apart |
//! | Crew | `CrewDuty` | flights with that crew | count × duty per flight ≤ max duty |
//! | Airport | `AirportCapacity` | flights touching the airport | operations in window ≤ max |
//! | (always) | separation | all flights | operations per airport ≥ separation apart |

mod builder;
mod rules;

pub use builder::{
    candidate_departures, crew_duty_holds, turnaround_holds, window_count_holds, CspBuilder,
};
pub use rules::{parse_window, Rule};
