//! End-to-end flight scheduling.
//!
//! # Algorithm
//!
//! 1. Validate flights, cargo, and constraints.
//! 2. Parse constraint descriptions into rules and compile the CSP.
//! 3. Run bounded backtracking search over departure slots.
//! 4. On success, move each flight to its solved slot, derive arrival, and
//!    run the heuristics selected by the optimization preference.
//! 5. Score every flight with the preference-weighted composite.
//!
//! A failed search returns the input collections untouched.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::compiler::{CspBuilder, Rule};
use crate::csp::SearchStatus;
use crate::error::SchedulerError;
use crate::heuristics::{CargoPacker, FuelOptimizer, FuelSummary, PackingSummary};
use crate::models::{Cargo, Constraint, Flight, OptimizationPreference, Settings};
use crate::validation::validate_input;

/// Score assumed for a composite term whose heuristic did not run.
const NEUTRAL_SCORE: f64 = 50.0;

/// Input container for scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRequest {
    /// Flights to slot.
    pub flights: Vec<Flight>,
    /// Cargo to pack.
    pub cargo: Vec<Cargo>,
    /// Declarative constraints.
    pub constraints: Vec<Constraint>,
}

impl ScheduleRequest {
    /// Creates a request with flights only.
    pub fn new(flights: Vec<Flight>) -> Self {
        Self {
            flights,
            ..Self::default()
        }
    }

    /// Sets cargo.
    pub fn with_cargo(mut self, cargo: Vec<Cargo>) -> Self {
        self.cargo = cargo;
        self
    }

    /// Sets constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Result of a scheduling run.
///
/// `flights` and `cargo` are the updated collections on success and the
/// unmodified input on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub success: bool,
    pub message: String,
    pub status: SearchStatus,
    pub iterations: u64,
    pub backtracks: u64,
    pub flights: Vec<Flight>,
    pub cargo: Vec<Cargo>,
    /// Present when the fuel heuristic ran.
    #[serde(default)]
    pub fuel: Option<FuelSummary>,
    /// Present when the cargo heuristic ran.
    #[serde(default)]
    pub packing: Option<PackingSummary>,
}

/// Flight slot scheduler.
///
/// # Example
///
/// ```
/// use u_flightslot::models::{ClockTime, Constraint, Flight, Settings};
/// use u_flightslot::scheduler::{FlightScheduler, ScheduleRequest};
///
/// let flights = vec![
///     Flight::new("F1", "JFK", "LAX", ClockTime::new(8, 0).unwrap(), "B737"),
///     Flight::new("F2", "ORD", "DEN", ClockTime::new(8, 10).unwrap(), "B737"),
/// ];
/// let request = ScheduleRequest::new(flights)
///     .with_constraints(vec![Constraint::aircraft("K1", "B737 turnaround")]);
///
/// let outcome = FlightScheduler::new(Settings::default()).schedule(request).unwrap();
/// assert!(outcome.success);
/// let gap = outcome.flights[0]
///     .departure_time
///     .circular_distance(outcome.flights[1].departure_time);
/// assert!(gap >= 45);
/// ```
#[derive(Debug, Clone)]
pub struct FlightScheduler {
    settings: Settings,
    fuel: FuelOptimizer,
    packer: CargoPacker,
}

impl FlightScheduler {
    /// Creates a scheduler with the standard heuristics.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fuel: FuelOptimizer::default(),
            packer: CargoPacker::standard(),
        }
    }

    /// Replaces the fuel optimizer.
    pub fn with_fuel_optimizer(mut self, fuel: FuelOptimizer) -> Self {
        self.fuel = fuel;
        self
    }

    /// Replaces the cargo packer.
    pub fn with_packer(mut self, packer: CargoPacker) -> Self {
        self.packer = packer;
        self
    }

    /// Active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs a full scheduling pass.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] when validation fails. An infeasible
    /// or over-budget search is not an error; it yields an outcome with
    /// `success == false`.
    pub fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleOutcome, SchedulerError> {
        let ScheduleRequest {
            mut flights,
            mut cargo,
            constraints,
        } = request;

        validate_input(&flights, &cargo, &constraints).map_err(SchedulerError::InvalidInput)?;

        let rules = Rule::parse_all(&constraints);
        let limits = self.settings.limits.clone();
        let result = CspBuilder::new(&flights)
            .with_rules(rules)
            .with_limits(limits.clone())
            .build()
            .backtracking_search(self.settings.max_backtracking_iterations);

        let stats = result.stats;
        let status = result.status;
        let solution = match result.assignment {
            Some(solution) => solution,
            None => {
                warn!(
                    "Scheduling {} flights failed: {:?} after {} iterations",
                    flights.len(),
                    status,
                    stats.iterations
                );
                return Ok(ScheduleOutcome {
                    success: false,
                    message: failure_message(status),
                    status,
                    iterations: stats.iterations,
                    backtracks: stats.backtracks,
                    flights,
                    cargo,
                    fuel: None,
                    packing: None,
                });
            }
        };

        for flight in flights.iter_mut() {
            if let Some(&departure) = solution.get(&flight.id) {
                flight.requested_departure = Some(flight.departure_time);
                flight.departure_time = departure;
                flight.arrival_time = Some(departure.add_minutes(limits.flight_duration_minutes as i64));
            }
        }

        let preference = self.settings.optimization_preference;
        let fuel = preference.runs_fuel().then(|| self.fuel.optimize(&mut flights));
        let packing = preference
            .runs_cargo()
            .then(|| self.packer.pack(&mut flights, &mut cargo));

        for flight in flights.iter_mut() {
            flight.composite_score = Some(composite_score(flight, preference));
        }

        info!(
            "Scheduled {} flights in {} iterations ({} backtracks), preference {:?}",
            flights.len(),
            stats.iterations,
            stats.backtracks,
            preference
        );

        Ok(ScheduleOutcome {
            success: true,
            message: format!(
                "Scheduled {} flights with {:?} optimization",
                flights.len(),
                preference
            ),
            status,
            iterations: stats.iterations,
            backtracks: stats.backtracks,
            flights,
            cargo,
            fuel,
            packing,
        })
    }
}

impl Default for FlightScheduler {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Preference-weighted blend of fuel efficiency and capacity utilization.
///
/// A term whose heuristic has not populated the flight counts as 50.
pub fn composite_score(flight: &Flight, preference: OptimizationPreference) -> f64 {
    let (fuel_weight, capacity_weight) = preference.weights();
    let fuel = flight.fuel_efficiency_score.unwrap_or(NEUTRAL_SCORE);
    let capacity = flight.capacity_utilization.unwrap_or(NEUTRAL_SCORE);
    fuel_weight * fuel + capacity_weight * capacity
}

fn failure_message(status: SearchStatus) -> String {
    format!(
        "{}. Consider relaxing turnaround, crew duty, or airport capacity constraints.",
        status.message()
    )
}
