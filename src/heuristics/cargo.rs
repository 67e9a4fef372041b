//! Greedy cargo bin-packing.
//!
//! # Algorithm
//!
//! 1. Clear every flight's payload and cargo list, and every cargo
//!    item's assignment.
//! 2. Order cargo by priority (High first), then heavier first.
//! 3. For each item, score every flight with enough remaining capacity as
//!    a weighted sum of [`PlacementCriterion`]s and load it on the best
//!    one (first flight wins ties).
//! 4. Items that fit nowhere stay unassigned.
//!
//! # Complexity
//! O(c log c + c · f · k) for c cargo items, f flights, k criteria.
//!
//! # Reference
//! Martello & Toth (1990), "Knapsack Problems", Ch. 8 (greedy bin packing)

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Cargo, CargoType, Flight};

/// A term of the flight-selection score.
///
/// Returns a value in `0.0..=1.0`; higher means a better fit. The packer
/// multiplies it by the criterion's weight.
pub trait PlacementCriterion: Send + Sync + Debug {
    /// Criterion name.
    fn name(&self) -> &'static str;

    /// Fit of `cargo` on `flight` given the flight's current load.
    fn evaluate(&self, cargo: &Cargo, flight: &Flight) -> f64;
}

/// Flight utilization after loading the item.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedUtilization;

impl PlacementCriterion for ProjectedUtilization {
    fn name(&self) -> &'static str {
        "projected-utilization"
    }

    fn evaluate(&self, cargo: &Cargo, flight: &Flight) -> f64 {
        if flight.max_payload <= 0.0 {
            return 0.0;
        }
        (flight.current_payload + cargo.weight) / flight.max_payload
    }
}

/// Route suitability. Every route currently qualifies.
#[derive(Debug, Clone, Copy)]
pub struct RouteSuitability;

impl PlacementCriterion for RouteSuitability {
    fn name(&self) -> &'static str {
        "route-suitability"
    }

    fn evaluate(&self, _cargo: &Cargo, _flight: &Flight) -> f64 {
        1.0
    }
}

/// Perishable cargo on a temperature-controlled flight, or hazardous
/// cargo on a hazmat-certified one.
#[derive(Debug, Clone, Copy)]
pub struct SpecialHandling;

impl PlacementCriterion for SpecialHandling {
    fn name(&self) -> &'static str {
        "special-handling"
    }

    fn evaluate(&self, cargo: &Cargo, flight: &Flight) -> f64 {
        let matched = match cargo.cargo_type {
            CargoType::Perishable => flight.temperature_controlled,
            CargoType::Hazardous => flight.hazmat_certified,
            _ => false,
        };
        if matched {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
struct WeightedCriterion {
    criterion: Arc<dyn PlacementCriterion>,
    weight: f64,
}

/// Outcome of one packing pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingSummary {
    /// Items loaded onto a flight.
    pub assigned: usize,
    /// Ids of items no flight could take.
    pub unassigned: Vec<String>,
}

/// Weighted greedy cargo packer.
///
/// # Example
/// ```
/// use u_flightslot::heuristics::CargoPacker;
/// use u_flightslot::models::{Cargo, CargoPriority, ClockTime, Flight};
///
/// let mut flights = vec![
///     Flight::new("F1", "JFK", "LAX", ClockTime::new(9, 0).unwrap(), "B737")
///         .with_max_payload(5000.0),
/// ];
/// let mut cargo = vec![Cargo::new("C1", 1500.0, CargoPriority::High)];
///
/// let summary = CargoPacker::standard().pack(&mut flights, &mut cargo);
/// assert_eq!(summary.assigned, 1);
/// assert_eq!(cargo[0].assigned_flight.as_deref(), Some("F1"));
/// ```
#[derive(Debug, Clone)]
pub struct CargoPacker {
    criteria: Vec<WeightedCriterion>,
}

impl CargoPacker {
    /// Creates a packer with no criteria (first fitting flight wins).
    pub fn new() -> Self {
        Self {
            criteria: Vec::new(),
        }
    }

    /// Utilization ×10, route suitability ×5, special handling ×3.
    pub fn standard() -> Self {
        Self::new()
            .with_criterion(ProjectedUtilization, 10.0)
            .with_criterion(RouteSuitability, 5.0)
            .with_criterion(SpecialHandling, 3.0)
    }

    /// Adds a weighted criterion.
    pub fn with_criterion<C: PlacementCriterion + 'static>(mut self, criterion: C, weight: f64) -> Self {
        self.criteria.push(WeightedCriterion {
            criterion: Arc::new(criterion),
            weight,
        });
        self
    }

    /// Weighted score of loading `cargo` on `flight`.
    pub fn score(&self, cargo: &Cargo, flight: &Flight) -> f64 {
        self.criteria
            .iter()
            .map(|wc| wc.weight * wc.criterion.evaluate(cargo, flight))
            .sum()
    }

    /// Rebuilds all cargo assignments from scratch.
    ///
    /// Every flight ends with `capacity_utilization` set, including flights
    /// that received nothing.
    pub fn pack(&self, flights: &mut [Flight], cargo: &mut [Cargo]) -> PackingSummary {
        for flight in flights.iter_mut() {
            flight.current_payload = 0.0;
            flight.assigned_cargo.clear();
        }
        for item in cargo.iter_mut() {
            item.unassign();
        }

        let mut order: Vec<usize> = (0..cargo.len()).collect();
        order.sort_by(|&a, &b| {
            cargo[a]
                .priority
                .cmp(&cargo[b].priority)
                .then_with(|| cargo[b].weight.partial_cmp(&cargo[a].weight).unwrap_or(Ordering::Equal))
        });

        let mut summary = PackingSummary::default();
        for i in order {
            let item = &mut cargo[i];
            match self.best_flight(item, flights) {
                Some(fi) => {
                    let flight = &mut flights[fi];
                    flight.current_payload += item.weight;
                    flight.assigned_cargo.push(item.id.clone());
                    item.assigned_flight = Some(flight.id.clone());
                    item.efficiency = Some(flight.utilization_percent());
                    summary.assigned += 1;
                }
                None => {
                    debug!("Cargo {} ({} kg) fits on no flight", item.id, item.weight);
                    summary.unassigned.push(item.id.clone());
                }
            }
        }

        for flight in flights.iter_mut() {
            flight.capacity_utilization = Some(flight.utilization_percent());
        }
        summary
    }

    fn best_flight(&self, item: &Cargo, flights: &[Flight]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (fi, flight) in flights.iter().enumerate() {
            if flight.remaining_capacity() < item.weight {
                continue;
            }
            let score = self.score(item, flight);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((fi, score)),
            }
        }
        best.map(|(fi, _)| fi)
    }
}

impl Default for CargoPacker {
    fn default() -> Self {
        Self::standard()
    }
}
