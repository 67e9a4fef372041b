//! Scheduling orchestration and KPI evaluation.
//!
//! # Algorithm
//!
//! `FlightScheduler` validates the request, compiles declarative
//! constraints into a CSP, searches for departure slots, then runs the
//! fuel and cargo heuristics selected by the optimization preference.
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes an outcome: composite score, utilization,
//! cargo placement, fuel saved, and how far flights moved.

mod kpi;
mod orchestrator;

pub use kpi::ScheduleKpi;
pub use orchestrator::{composite_score, FlightScheduler, ScheduleOutcome, ScheduleRequest};
