//! Run configuration.

use serde::{Deserialize, Serialize};

/// Which heuristic the post-solution pass emphasizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationPreference {
    /// Fuel heuristic only; composite weights 0.8 fuel / 0.2 capacity.
    #[default]
    Fuel,
    /// Cargo heuristic only; composite weights 0.2 fuel / 0.8 capacity.
    Capacity,
    /// Both heuristics; equal weights.
    Balanced,
}

impl OptimizationPreference {
    /// Composite score weights `(fuel, capacity)`.
    pub fn weights(self) -> (f64, f64) {
        match self {
            Self::Fuel => (0.8, 0.2),
            Self::Capacity => (0.2, 0.8),
            Self::Balanced => (0.5, 0.5),
        }
    }

    /// Whether the fuel heuristic runs.
    pub fn runs_fuel(self) -> bool {
        matches!(self, Self::Fuel | Self::Balanced)
    }

    /// Whether the cargo heuristic runs.
    pub fn runs_cargo(self) -> bool {
        matches!(self, Self::Capacity | Self::Balanced)
    }
}

/// Numeric limits used when compiling rules and generating slots.
///
/// All durations are in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleLimits {
    /// Minimum gap between consecutive departures of one aircraft.
    pub turnaround_minutes: u16,
    /// Minimum gap between consecutive operations at one airport.
    pub min_separation_minutes: u16,
    /// Block time assumed for every flight.
    pub flight_duration_minutes: u16,
    /// Duty time charged to a crew per flight.
    pub crew_duty_per_flight_minutes: u32,
    /// Maximum total duty time per crew.
    pub max_crew_duty_minutes: u32,
    /// Maximum departures per airport inside a constrained window.
    pub max_airport_operations: usize,
    /// Spacing between candidate departure slots.
    pub slot_step_minutes: u16,
    /// Candidate slots extend this far either side of the requested time.
    pub slot_half_width_minutes: u16,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            turnaround_minutes: 45,
            min_separation_minutes: 15,
            flight_duration_minutes: 120,
            crew_duty_per_flight_minutes: 120,
            max_crew_duty_minutes: 600,
            max_airport_operations: 10,
            slot_step_minutes: 30,
            slot_half_width_minutes: 120,
        }
    }
}

impl RuleLimits {
    /// Sets the turnaround time.
    pub fn with_turnaround(mut self, minutes: u16) -> Self {
        self.turnaround_minutes = minutes;
        self
    }

    /// Sets the minimum airport separation.
    pub fn with_min_separation(mut self, minutes: u16) -> Self {
        self.min_separation_minutes = minutes;
        self
    }

    /// Sets the assumed flight duration.
    pub fn with_flight_duration(mut self, minutes: u16) -> Self {
        self.flight_duration_minutes = minutes;
        self
    }

    /// Sets per-flight and maximum crew duty.
    pub fn with_crew_duty(mut self, per_flight_minutes: u32, max_minutes: u32) -> Self {
        self.crew_duty_per_flight_minutes = per_flight_minutes;
        self.max_crew_duty_minutes = max_minutes;
        self
    }

    /// Sets the airport operation cap per window.
    pub fn with_max_airport_operations(mut self, max: usize) -> Self {
        self.max_airport_operations = max;
        self
    }
}

/// Scheduler settings.
///
/// # Examples
///
/// ```
/// use u_flightslot::models::{OptimizationPreference, Settings};
///
/// let settings = Settings::default()
///     .with_preference(OptimizationPreference::Balanced)
///     .with_max_iterations(5_000);
/// assert_eq!(settings.max_backtracking_iterations, 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Heuristic emphasis.
    pub optimization_preference: OptimizationPreference,
    /// Search iteration budget.
    pub max_backtracking_iterations: u64,
    /// Rule constants.
    pub limits: RuleLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            optimization_preference: OptimizationPreference::Fuel,
            max_backtracking_iterations: 10_000,
            limits: RuleLimits::default(),
        }
    }
}

impl Settings {
    /// Sets the optimization preference.
    pub fn with_preference(mut self, preference: OptimizationPreference) -> Self {
        self.optimization_preference = preference;
        self
    }

    /// Sets the search iteration budget.
    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.max_backtracking_iterations = max;
        self
    }

    /// Sets rule limits.
    pub fn with_limits(mut self, limits: RuleLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights() {
        assert_eq!(OptimizationPreference::Fuel.weights(), (0.8, 0.2));
        assert_eq!(OptimizationPreference::Capacity.weights(), (0.2, 0.8));
        assert_eq!(OptimizationPreference::Balanced.weights(), (0.5, 0.5));
    }

    #[test]
    fn test_which_heuristics_run() {
        assert!(OptimizationPreference::Fuel.runs_fuel());
        assert!(!OptimizationPreference::Fuel.runs_cargo());
        assert!(!OptimizationPreference::Capacity.runs_fuel());
        assert!(OptimizationPreference::Capacity.runs_cargo());
        assert!(OptimizationPreference::Balanced.runs_fuel());
        assert!(OptimizationPreference::Balanced.runs_cargo());
    }

    #[test]
    fn test_defaults_from_partial_json() {
        let s: Settings =
            serde_json::from_str(r#"{"optimizationPreference":"capacity"}"#).unwrap();
        assert_eq!(s.optimization_preference, OptimizationPreference::Capacity);
        assert_eq!(s.max_backtracking_iterations, 10_000);
        assert_eq!(s.limits.turnaround_minutes, 45);

        let s: Settings = serde_json::from_str(
            r#"{"maxBacktrackingIterations":50,"limits":{"minSeparationMinutes":20}}"#,
        )
        .unwrap();
        assert_eq!(s.optimization_preference, OptimizationPreference::Fuel);
        assert_eq!(s.max_backtracking_iterations, 50);
        assert_eq!(s.limits.min_separation_minutes, 20);
        assert_eq!(s.limits.flight_duration_minutes, 120);
    }
}
