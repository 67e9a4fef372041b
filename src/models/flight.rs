//! Flight model.
//!
//! A flight is the unit being scheduled: one CSP variable per flight,
//! whose value is the departure slot. Payload and cargo bookkeeping are
//! filled in by the heuristic pass after a slot assignment is found.

use serde::{Deserialize, Serialize};

use super::ClockTime;

/// A scheduled flight.
///
/// # Time Representation
/// Departure and arrival are wall-clock `HH:MM` values with no date.
/// Arrival may be numerically earlier than departure when the flight
/// crosses midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Unique flight identifier.
    pub id: String,
    /// Origin airport code.
    pub origin: String,
    /// Destination airport code.
    pub destination: String,
    /// Departure time.
    pub departure_time: ClockTime,
    /// Departure as submitted, before the solver moved it.
    #[serde(default)]
    pub requested_departure: Option<ClockTime>,
    /// Arrival time. Derived from departure after solving.
    #[serde(default)]
    pub arrival_time: Option<ClockTime>,
    /// Aircraft type tag (e.g. "B737-800"). Also identifies the airframe
    /// for turnaround rules.
    pub aircraft: String,
    /// Crew identifier.
    #[serde(default)]
    pub crew: String,
    /// Maximum cargo payload (kg).
    #[serde(default)]
    pub max_payload: f64,
    /// Current payload (kg).
    #[serde(default)]
    pub current_payload: f64,
    /// Cargo ids loaded on this flight.
    #[serde(default)]
    pub assigned_cargo: Vec<String>,
    /// Can carry perishable cargo.
    #[serde(default)]
    pub temperature_controlled: bool,
    /// Can carry hazardous cargo.
    #[serde(default)]
    pub hazmat_certified: bool,

    /// Cruise altitude (ft) chosen by the fuel heuristic.
    #[serde(default)]
    pub cruise_altitude_ft: Option<u32>,
    /// Cruise speed (kts) chosen by the fuel heuristic.
    #[serde(default)]
    pub cruise_speed_kts: Option<u32>,
    /// Baseline fuel estimate (kg).
    #[serde(default)]
    pub baseline_fuel_kg: Option<f64>,
    /// Fuel estimate after cruise and weather adjustment (kg).
    #[serde(default)]
    pub optimized_fuel_kg: Option<f64>,
    /// Percentage fuel reduction versus baseline.
    #[serde(default)]
    pub fuel_efficiency_score: Option<f64>,
    /// Time-of-day weather penalty (fraction).
    #[serde(default)]
    pub weather_penalty: Option<f64>,
    /// Departure shift that would land in a calmer weather bucket.
    #[serde(default)]
    pub suggested_shift: Option<WeatherShift>,
    /// Payload over max payload, as a percentage.
    #[serde(default)]
    pub capacity_utilization: Option<f64>,
    /// Preference-weighted composite score.
    #[serde(default)]
    pub composite_score: Option<f64>,
}

/// A suggested departure shift toward a lower weather penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherShift {
    /// Offset in hours from the current departure.
    pub hours: i32,
    /// Penalty of the bucket reached by the shift.
    pub penalty: f64,
    /// Estimated fuel saved by shifting (kg).
    pub potential_savings_kg: f64,
}

impl Flight {
    /// Creates a flight with the required routing fields.
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_time: ClockTime,
        aircraft: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            destination: destination.into(),
            departure_time,
            requested_departure: None,
            arrival_time: None,
            aircraft: aircraft.into(),
            crew: String::new(),
            max_payload: 0.0,
            current_payload: 0.0,
            assigned_cargo: Vec::new(),
            temperature_controlled: false,
            hazmat_certified: false,
            cruise_altitude_ft: None,
            cruise_speed_kts: None,
            baseline_fuel_kg: None,
            optimized_fuel_kg: None,
            fuel_efficiency_score: None,
            weather_penalty: None,
            suggested_shift: None,
            capacity_utilization: None,
            composite_score: None,
        }
    }

    /// Sets the crew.
    pub fn with_crew(mut self, crew: impl Into<String>) -> Self {
        self.crew = crew.into();
        self
    }

    /// Sets the maximum payload (kg).
    pub fn with_max_payload(mut self, max_payload: f64) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Sets the current payload (kg).
    pub fn with_current_payload(mut self, payload: f64) -> Self {
        self.current_payload = payload;
        self
    }

    /// Marks the flight as able to carry perishable cargo.
    pub fn temperature_controlled(mut self) -> Self {
        self.temperature_controlled = true;
        self
    }

    /// Marks the flight as able to carry hazardous cargo.
    pub fn hazmat_certified(mut self) -> Self {
        self.hazmat_certified = true;
        self
    }

    /// Remaining payload capacity (kg).
    pub fn remaining_capacity(&self) -> f64 {
        self.max_payload - self.current_payload
    }

    /// Current payload as a percentage of max payload.
    ///
    /// Returns 0 for flights with no capacity.
    pub fn utilization_percent(&self) -> f64 {
        if self.max_payload > 0.0 {
            self.current_payload / self.max_payload * 100.0
        } else {
            0.0
        }
    }

    /// Minutes the solver moved the departure, signed, in `-720..720`.
    ///
    /// Zero when the flight has not been scheduled.
    pub fn slot_shift_minutes(&self) -> i32 {
        match self.requested_departure {
            Some(requested) => {
                let diff = self.departure_time.minutes() as i32 - requested.minutes() as i32;
                let day = super::MINUTES_PER_DAY as i32;
                (diff + day / 2).rem_euclid(day) - day / 2
            }
            None => 0,
        }
    }

    /// Whether the flight touches the given airport (case-insensitive).
    pub fn serves(&self, airport: &str) -> bool {
        self.origin.eq_ignore_ascii_case(airport) || self.destination.eq_ignore_ascii_case(airport)
    }
}
