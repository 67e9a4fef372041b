//! Schedule quality metrics (KPIs).
//!
//! Computes summary indicators from a completed scheduling outcome.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Composite | Mean composite score over scored flights |
//! | Avg Utilization | Mean capacity utilization (%) over flights with a value |
//! | Cargo Assigned / Unassigned | Items with / without a flight |
//! | Fuel Saved | Sum of baseline - optimized fuel (kg) |
//! | Flights Moved | Flights whose departure differs from the requested slot |
//! | Max Shift | Largest slot move (minutes) |

use serde::{Deserialize, Serialize};

use super::ScheduleOutcome;

/// Schedule performance indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleKpi {
    /// Mean composite score (0 when no flight is scored).
    pub avg_composite_score: f64,
    /// Mean capacity utilization in percent.
    pub avg_utilization: f64,
    pub cargo_assigned: usize,
    pub cargo_unassigned: usize,
    /// Total fuel saved versus baseline (kg). Negative when weather
    /// penalties outweigh the cruise gains.
    pub fuel_saved_kg: f64,
    pub flights_moved: usize,
    /// Largest absolute slot move in minutes.
    pub max_shift_minutes: u32,
}

impl ScheduleKpi {
    /// Computes KPIs from an outcome.
    ///
    /// A failed outcome yields KPIs of the untouched input: nothing moved,
    /// nothing scored.
    pub fn calculate(outcome: &ScheduleOutcome) -> Self {
        let composite: Vec<f64> = outcome
            .flights
            .iter()
            .filter_map(|f| f.composite_score)
            .collect();
        let utilization: Vec<f64> = outcome
            .flights
            .iter()
            .filter_map(|f| f.capacity_utilization)
            .collect();

        let fuel_saved_kg: f64 = outcome
            .flights
            .iter()
            .filter_map(|f| Some(f.baseline_fuel_kg? - f.optimized_fuel_kg?))
            .sum();

        let shifts: Vec<u32> = outcome
            .flights
            .iter()
            .map(|f| f.slot_shift_minutes().unsigned_abs())
            .collect();

        let cargo_assigned = outcome.cargo.iter().filter(|c| c.is_assigned()).count();

        Self {
            avg_composite_score: mean(&composite),
            avg_utilization: mean(&utilization),
            cargo_assigned,
            cargo_unassigned: outcome.cargo.len() - cargo_assigned,
            fuel_saved_kg,
            flights_moved: shifts.iter().filter(|&&s| s > 0).count(),
            max_shift_minutes: shifts.into_iter().max().unwrap_or(0),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_composite: f64, max_shift_minutes: u32) -> bool {
        self.avg_composite_score >= min_composite && self.max_shift_minutes <= max_shift_minutes
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
