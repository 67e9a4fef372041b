//! Fuel and cruise-parameter heuristic.
//!
//! # Algorithm
//! 1. Order flights by route distance, longest first.
//! 2. Pick cruise altitude and speed from the aircraft table.
//! 3. Estimate baseline fuel (distance × burn rate) and the optimized
//!    figure `baseline × cruise factor × (1 + weather penalty)`.
//! 4. Record the percentage reduction as the fuel-efficiency score and
//!    suggest a departure shift when a calmer hour is close by.

use log::debug;
use serde::{Deserialize, Serialize};

use super::WeatherModel;
use crate::models::Flight;

/// Cruise settings for an aircraft family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruiseProfile {
    /// Substring matched against the flight's aircraft tag.
    pub pattern: &'static str,
    pub altitude_ft: u32,
    pub speed_kts: u32,
    /// Fuel burn per km at cruise.
    pub burn_kg_per_km: f64,
}

/// Cruise table, matched in order.
pub static CRUISE_PROFILES: [CruiseProfile; 7] = [
    CruiseProfile { pattern: "737", altitude_ft: 35_000, speed_kts: 450, burn_kg_per_km: 2.6 },
    CruiseProfile { pattern: "A320", altitude_ft: 36_000, speed_kts: 447, burn_kg_per_km: 2.5 },
    CruiseProfile { pattern: "777", altitude_ft: 39_000, speed_kts: 490, burn_kg_per_km: 7.0 },
    CruiseProfile { pattern: "787", altitude_ft: 41_000, speed_kts: 488, burn_kg_per_km: 5.4 },
    CruiseProfile { pattern: "A350", altitude_ft: 41_000, speed_kts: 488, burn_kg_per_km: 5.8 },
    CruiseProfile { pattern: "747", altitude_ft: 35_000, speed_kts: 493, burn_kg_per_km: 10.5 },
    CruiseProfile { pattern: "E190", altitude_ft: 37_000, speed_kts: 447, burn_kg_per_km: 1.8 },
];

/// Great-circle distances (km) for known city pairs. Symmetric.
static ROUTE_DISTANCES: [(&str, &str, f64); 12] = [
    ("JFK", "LAX", 3983.0),
    ("JFK", "ORD", 1188.0),
    ("JFK", "LHR", 5540.0),
    ("LAX", "SFO", 543.0),
    ("ORD", "LAX", 2802.0),
    ("ORD", "DEN", 1426.0),
    ("DEN", "LAX", 1386.0),
    ("ATL", "JFK", 1222.0),
    ("ATL", "ORD", 975.0),
    ("SEA", "SFO", 1093.0),
    ("BOS", "JFK", 300.0),
    ("LHR", "CDG", 344.0),
];

/// Finds the cruise profile whose pattern occurs in the aircraft tag.
pub fn cruise_profile(aircraft: &str) -> Option<&'static CruiseProfile> {
    let tag = aircraft.to_ascii_uppercase();
    CRUISE_PROFILES.iter().find(|p| tag.contains(p.pattern))
}

/// Totals from one fuel pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSummary {
    pub flights: usize,
    pub baseline_fuel_kg: f64,
    pub optimized_fuel_kg: f64,
    /// Flights with a suggested departure shift.
    pub shifts_suggested: usize,
}

impl FuelSummary {
    /// Baseline minus optimized fuel (kg).
    pub fn fuel_saved_kg(&self) -> f64 {
        self.baseline_fuel_kg - self.optimized_fuel_kg
    }
}

/// Fuel optimizer configuration and entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuelOptimizer {
    /// Multiplier applied for optimized cruise settings.
    pub cruise_factor: f64,
    /// Distance assumed for unknown city pairs (km).
    pub default_distance_km: f64,
    /// Burn rate for aircraft missing from the cruise table (kg/km).
    pub default_burn_kg_per_km: f64,
    pub weather: WeatherModel,
}

impl Default for FuelOptimizer {
    fn default() -> Self {
        Self {
            cruise_factor: 0.95,
            default_distance_km: 1000.0,
            default_burn_kg_per_km: 3.0,
            weather: WeatherModel::default(),
        }
    }
}

impl FuelOptimizer {
    /// Creates an optimizer with the default tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weather model.
    pub fn with_weather(mut self, weather: WeatherModel) -> Self {
        self.weather = weather;
        self
    }

    /// Route distance in km, falling back to the default distance.
    pub fn route_distance(&self, origin: &str, destination: &str) -> f64 {
        ROUTE_DISTANCES
            .iter()
            .find(|(a, b, _)| {
                (a.eq_ignore_ascii_case(origin) && b.eq_ignore_ascii_case(destination))
                    || (a.eq_ignore_ascii_case(destination) && b.eq_ignore_ascii_case(origin))
            })
            .map(|&(_, _, km)| km)
            .unwrap_or(self.default_distance_km)
    }

    /// Annotates every flight with cruise, fuel, and weather fields.
    ///
    /// Flights are visited longest route first; the slice order is left
    /// unchanged.
    pub fn optimize(&self, flights: &mut [Flight]) -> FuelSummary {
        let distances: Vec<f64> = flights
            .iter()
            .map(|f| self.route_distance(&f.origin, &f.destination))
            .collect();
        let mut order: Vec<usize> = (0..flights.len()).collect();
        order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));

        let mut summary = FuelSummary::default();
        for i in order {
            let flight = &mut flights[i];
            let distance = distances[i];

            let burn = match cruise_profile(&flight.aircraft) {
                Some(profile) => {
                    flight.cruise_altitude_ft = Some(profile.altitude_ft);
                    flight.cruise_speed_kts = Some(profile.speed_kts);
                    profile.burn_kg_per_km
                }
                None => {
                    debug!(
                        "No cruise profile for aircraft '{}' on flight {}",
                        flight.aircraft, flight.id
                    );
                    self.default_burn_kg_per_km
                }
            };

            let baseline = distance * burn;
            let penalty = self.weather.penalty_at(flight.departure_time);
            let optimized = baseline * self.cruise_factor * (1.0 + penalty);
            let score = if baseline > 0.0 {
                (baseline - optimized) / baseline * 100.0
            } else {
                0.0
            };

            flight.baseline_fuel_kg = Some(baseline);
            flight.optimized_fuel_kg = Some(optimized);
            flight.weather_penalty = Some(penalty);
            flight.fuel_efficiency_score = Some(score);
            flight.suggested_shift =
                self.weather
                    .suggest_shift(flight.departure_time, baseline, self.cruise_factor);

            summary.flights += 1;
            summary.baseline_fuel_kg += baseline;
            summary.optimized_fuel_kg += optimized;
            if flight.suggested_shift.is_some() {
                summary.shifts_suggested += 1;
            }
        }
        summary
    }
}
