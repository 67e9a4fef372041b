//! Compiles flights and rules into a CSP over departure slots.
//!
//! Builds one variable per flight with a window of candidate departure
//! times, one constraint per rule closed over the flights it concerns,
//! and a global minimum-separation constraint over every flight.
//!
//! # Reference
//! Baptiste et al. (2001), "Constraint-Based Scheduling"

use std::collections::HashMap;

use log::debug;

use super::Rule;
use crate::csp::{Assignment, CspConstraint, CspEngine, VarIndex};
use crate::models::{ClockTime, ClockWindow, Flight, RuleLimits};

/// Builds a [`CspEngine`] from flights and parsed rules.
///
/// Variable `i` is flight `i` of the input slice.
///
/// # Example
/// ```
/// use u_flightslot::compiler::{CspBuilder, Rule};
/// use u_flightslot::models::{ClockTime, Constraint, Flight};
///
/// let flights = vec![
///     Flight::new("F1", "JFK", "LAX", ClockTime::new(8, 0).unwrap(), "B737"),
///     Flight::new("F2", "JFK", "ORD", ClockTime::new(8, 10).unwrap(), "B737"),
/// ];
/// let rules = Rule::parse_all(&[Constraint::aircraft("K1", "B737 turnaround")]);
/// let mut engine = CspBuilder::new(&flights).with_rules(rules).build();
/// assert_eq!(engine.variable_count(), 2);
/// assert!(engine.backtracking_search(1_000).is_solved());
/// ```
#[derive(Debug, Clone)]
pub struct CspBuilder<'a> {
    flights: &'a [Flight],
    rules: Vec<Rule>,
    limits: RuleLimits,
}

impl<'a> CspBuilder<'a> {
    /// Creates a builder with default limits and no rules.
    pub fn new(flights: &'a [Flight]) -> Self {
        Self {
            flights,
            rules: Vec::new(),
            limits: RuleLimits::default(),
        }
    }

    /// Adds parsed rules.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Sets rule limits.
    pub fn with_limits(mut self, limits: RuleLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builds the engine.
    ///
    /// Creates:
    /// - A variable per flight, domain from [`candidate_departures`]
    /// - A constraint per rule (skipped when no flight matches)
    /// - The global minimum-separation constraint
    pub fn build(&self) -> CspEngine<ClockTime> {
        let mut engine = CspEngine::new();

        for flight in self.flights {
            engine.add_variable(
                flight.id.clone(),
                candidate_departures(flight.departure_time, &self.limits),
            );
        }

        for rule in &self.rules {
            match self.compile_rule(rule) {
                Some(constraint) => engine.add_constraint(constraint),
                None => debug!(
                    "Rule from constraint '{}' matches no flights",
                    rule.constraint_id()
                ),
            }
        }

        if !self.flights.is_empty() {
            engine.add_constraint(self.separation_constraint());
        }

        debug!(
            "Compiled {} flights, {} rules into {} constraints",
            self.flights.len(),
            self.rules.len(),
            engine.constraint_count()
        );
        engine
    }

    /// Compiles one rule, or `None` if its scope is empty.
    pub fn compile_rule(&self, rule: &Rule) -> Option<CspConstraint<ClockTime>> {
        match rule {
            Rule::Turnaround {
                constraint_id,
                aircraft,
            } => {
                let scope = self.scope_where(|f| f.aircraft.eq_ignore_ascii_case(aircraft));
                if scope.is_empty() {
                    return None;
                }
                let min_gap = self.limits.turnaround_minutes;
                let vars = scope.clone();
                Some(CspConstraint::new(
                    format!("turnaround:{constraint_id}"),
                    scope,
                    move |a: &Assignment<ClockTime>| {
                        turnaround_holds(a.values_of(&vars), min_gap)
                    },
                ))
            }
            Rule::CrewDuty {
                constraint_id,
                crew,
            } => {
                let scope = self.scope_where(|f| f.crew.eq_ignore_ascii_case(crew));
                if scope.is_empty() {
                    return None;
                }
                let per_flight = self.limits.crew_duty_per_flight_minutes;
                let max_duty = self.limits.max_crew_duty_minutes;
                let vars = scope.clone();
                Some(CspConstraint::new(
                    format!("crew-duty:{constraint_id}"),
                    scope,
                    move |a: &Assignment<ClockTime>| {
                        crew_duty_holds(a.values_of(&vars).count(), per_flight, max_duty)
                    },
                ))
            }
            Rule::AirportCapacity {
                constraint_id,
                airport,
                window,
            } => {
                let scope = self.scope_where(|f| f.serves(airport));
                if scope.is_empty() {
                    return None;
                }
                let max_ops = self.limits.max_airport_operations;
                let duration = self.limits.flight_duration_minutes as i64;
                let window = *window;
                // Offset from departure to the operation at this airport.
                let legs: Vec<(VarIndex, i64)> = scope
                    .iter()
                    .map(|&i| {
                        let offset = if self.flights[i].origin.eq_ignore_ascii_case(airport) {
                            0
                        } else {
                            duration
                        };
                        (i, offset)
                    })
                    .collect();
                Some(CspConstraint::new(
                    format!("airport-capacity:{constraint_id}"),
                    scope,
                    move |a: &Assignment<ClockTime>| {
                        let Some(window) = window else {
                            return true;
                        };
                        let operations = legs
                            .iter()
                            .filter_map(|&(var, offset)| a.get(var).map(|t| t.add_minutes(offset)));
                        window_count_holds(operations, window, max_ops)
                    },
                ))
            }
        }
    }

    /// Global minimum separation between operations at each airport.
    ///
    /// Departures happen at the assigned time at the origin; arrivals at
    /// assigned time + flight duration at the destination.
    pub fn separation_constraint(&self) -> CspConstraint<ClockTime> {
        // Airport codes compare case-insensitively, as in the rule scopes.
        let mut airport_index: HashMap<String, usize> = HashMap::new();
        let mut index_of = |code: &str| {
            let next = airport_index.len();
            *airport_index.entry(code.to_ascii_uppercase()).or_insert(next)
        };
        let legs: Vec<(usize, usize)> = self
            .flights
            .iter()
            .map(|flight| (index_of(&flight.origin), index_of(&flight.destination)))
            .collect();
        let airport_count = airport_index.len();
        let min_gap = self.limits.min_separation_minutes;
        let duration = self.limits.flight_duration_minutes as i64;

        CspConstraint::new(
            "min-separation",
            (0..self.flights.len()).collect(),
            move |a: &Assignment<ClockTime>| {
                let mut operations: Vec<Vec<u16>> = vec![Vec::new(); airport_count];
                for (var, departure) in a.iter_assigned() {
                    let (origin, destination) = legs[var];
                    operations[origin].push(departure.minutes());
                    operations[destination].push(departure.add_minutes(duration).minutes());
                }
                operations
                    .into_iter()
                    .all(|ops| gaps_hold(ops, min_gap))
            },
        )
    }

    fn scope_where(&self, predicate: impl Fn(&Flight) -> bool) -> Vec<VarIndex> {
        self.flights
            .iter()
            .enumerate()
            .filter(|(_, f)| predicate(f))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Candidate departure slots around a requested time.
///
/// Returns `original + k * step` for `k` in `-half/step ..= half/step`,
/// wrapped into the day. With the default limits this is nine slots from
/// two hours early to two hours late in 30-minute steps.
pub fn candidate_departures(original: ClockTime, limits: &RuleLimits) -> Vec<ClockTime> {
    let step = limits.slot_step_minutes.max(1) as i64;
    let reach = limits.slot_half_width_minutes as i64 / step;
    (-reach..=reach)
        .map(|k| original.add_minutes(k * step))
        .collect()
}

/// Sorted consecutive times (minutes since midnight, no wraparound) are
/// at least `min_gap` apart.
pub fn turnaround_holds(times: impl Iterator<Item = ClockTime>, min_gap: u16) -> bool {
    gaps_hold(times.map(ClockTime::minutes).collect(), min_gap)
}

/// Total duty of `flights` assigned flights stays within `max_duty`.
pub fn crew_duty_holds(flights: usize, per_flight_minutes: u32, max_duty_minutes: u32) -> bool {
    flights as u64 * per_flight_minutes as u64 <= max_duty_minutes as u64
}

/// At most `max_operations` of the times fall inside the window.
pub fn window_count_holds(
    times: impl Iterator<Item = ClockTime>,
    window: ClockWindow,
    max_operations: usize,
) -> bool {
    times.filter(|&t| window.contains(t)).count() <= max_operations
}

fn gaps_hold(mut minutes: Vec<u16>, min_gap: u16) -> bool {
    minutes.sort_unstable();
    minutes.windows(2).all(|pair| pair[1] - pair[0] >= min_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Constraint;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn flight(id: &str, from: &str, to: &str, dep: &str, aircraft: &str, crew: &str) -> Flight {
        Flight::new(id, from, to, t(dep), aircraft).with_crew(crew)
    }

    #[test]
    fn test_candidate_departures() {
        let slots = candidate_departures(t("08:10"), &RuleLimits::default());
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0], t("06:10"));
        assert_eq!(slots[4], t("08:10"));
        assert_eq!(slots[8], t("10:10"));
    }

    #[test]
    fn test_candidate_departures_wrap() {
        let slots = candidate_departures(t("23:30"), &RuleLimits::default());
        assert_eq!(slots[0], t("21:30"));
        assert_eq!(slots[5], t("00:00"));
        assert_eq!(slots[8], t("01:30"));
        let early = candidate_departures(t("00:45"), &RuleLimits::default());
        assert_eq!(early[0], t("22:45"));
    }

    #[test]
    fn test_build_domains_match_candidates() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "ORD", "DEN", "23:30", "A320", "C2"),
        ];
        let limits = RuleLimits::default();
        let engine = CspBuilder::new(&flights).build();
        for (i, f) in flights.iter().enumerate() {
            let expected = candidate_departures(f.departure_time, &limits);
            assert_eq!(engine.domain(i), Some(expected.as_slice()));
        }
        assert_eq!(engine.domain(flights.len()), None);
    }

    #[test]
    fn test_turnaround_boundary() {
        assert!(!turnaround_holds([t("08:00"), t("08:40")].into_iter(), 45));
        assert!(turnaround_holds([t("08:45"), t("08:00")].into_iter(), 45));
        assert!(turnaround_holds(std::iter::empty(), 45));
    }

    #[test]
    fn test_turnaround_ignores_midnight() {
        // 23:50 and 00:20 are 30 minutes apart on the ring, but the
        // turnaround check compares minutes since midnight.
        assert!(turnaround_holds([t("23:50"), t("00:20")].into_iter(), 45));
    }

    #[test]
    fn test_crew_duty() {
        assert!(crew_duty_holds(5, 120, 600));
        assert!(!crew_duty_holds(6, 120, 600));
        assert!(crew_duty_holds(0, 120, 0));
    }

    #[test]
    fn test_window_count_wraps() {
        let w = ClockWindow::new(t("22:00"), t("02:00"));
        let times = [t("23:30"), t("01:00"), t("12:00")];
        assert!(window_count_holds(times.into_iter(), w, 2));
        assert!(!window_count_holds(times.into_iter(), w, 1));
    }

    #[test]
    fn test_turnaround_constraint_scope() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "BOS", "ORD", "08:08", "b737", "C2"),
            flight("F3", "SEA", "SFO", "08:00", "A320", "C3"),
        ];
        let rule = Rule::parse(&Constraint::aircraft("K1", "B737")).unwrap();
        let builder = CspBuilder::new(&flights);
        let c = builder.compile_rule(&rule).unwrap();
        assert_eq!(c.scope(), &[0, 1]);

        let mut a = Assignment::new(3);
        a.bind(0, t("08:00"));
        assert!(c.is_satisfied(&a));
        a.bind(1, t("08:40"));
        assert!(!c.is_satisfied(&a));
        a.bind(1, t("08:45"));
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_empty_scope_not_compiled() {
        let flights = vec![flight("F1", "JFK", "LAX", "08:00", "B737", "C1")];
        let rule = Rule::parse(&Constraint::aircraft("K1", "A380")).unwrap();
        assert!(CspBuilder::new(&flights).compile_rule(&rule).is_none());
        // Only the separation constraint remains.
        let engine = CspBuilder::new(&flights).with_rules(vec![rule]).build();
        assert_eq!(engine.constraint_count(), 1);
    }

    #[test]
    fn test_crew_constraint() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "LAX", "SFO", "14:00", "A320", "C1"),
        ];
        let rule = Rule::parse(&Constraint::crew("K2", "Crew C1")).unwrap();
        let limits = RuleLimits::default().with_crew_duty(120, 200);
        let c = CspBuilder::new(&flights)
            .with_limits(limits)
            .compile_rule(&rule)
            .unwrap();
        let mut a = Assignment::new(2);
        a.bind(0, t("08:00"));
        assert!(c.is_satisfied(&a));
        a.bind(1, t("14:00"));
        assert!(!c.is_satisfied(&a));
    }

    #[test]
    fn test_separation_ignores_airport_case() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "jfk", "ORD", "08:00", "A320", "C2"),
        ];
        let c = CspBuilder::new(&flights).separation_constraint();
        let mut a = Assignment::new(2);
        a.bind(0, t("08:00"));
        a.bind(1, t("08:00"));
        assert!(!c.is_satisfied(&a));
        a.bind(1, t("08:15"));
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_airport_constraint_counts_arrivals_and_departures() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "06:30", "B737", "C1"),
            flight("F2", "BOS", "JFK", "05:00", "A320", "C2"),
            flight("F3", "ORD", "SEA", "06:30", "A320", "C3"),
        ];
        let rule = Rule::parse(&Constraint::airport("K3", "JFK 06:00-07:30")).unwrap();
        let limits = RuleLimits::default().with_max_airport_operations(1);
        let c = CspBuilder::new(&flights)
            .with_limits(limits)
            .compile_rule(&rule)
            .unwrap();
        assert_eq!(c.scope(), &[0, 1]);

        let mut a = Assignment::new(3);
        a.bind(0, t("06:30"));
        assert!(c.is_satisfied(&a));
        // Arrives 07:00 at JFK: second operation in the window.
        a.bind(1, t("05:00"));
        assert!(!c.is_satisfied(&a));
        // Arrives 08:00: outside.
        a.bind(1, t("06:00"));
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_airport_without_window_is_vacuous() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "06:30", "B737", "C1"),
            flight("F2", "JFK", "SFO", "06:30", "A320", "C2"),
        ];
        let rule = Rule::parse(&Constraint::airport("K3", "JFK busy")).unwrap();
        let limits = RuleLimits::default().with_max_airport_operations(0);
        let c = CspBuilder::new(&flights)
            .with_limits(limits)
            .compile_rule(&rule)
            .unwrap();
        let a = Assignment::from_values([t("06:30"), t("06:30")]);
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_separation_constraint() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "BOS", "JFK", "06:00", "A320", "C2"),
            flight("F3", "SEA", "SFO", "08:00", "A320", "C3"),
        ];
        let c = CspBuilder::new(&flights).separation_constraint();
        assert_eq!(c.scope(), &[0, 1, 2]);

        // F2 arrives JFK 08:10, F1 departs JFK 08:00: 10 min apart.
        let a = Assignment::from_values([t("08:00"), t("06:10"), t("08:00")]);
        assert!(!c.is_satisfied(&a));
        // 08:15 arrival: exactly 15 minutes.
        let a = Assignment::from_values([t("08:00"), t("06:15"), t("08:00")]);
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_separation_arrival_wraps_midnight() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "00:30", "B737", "C1"),
            flight("F2", "BOS", "JFK", "22:35", "A320", "C2"),
        ];
        let c = CspBuilder::new(&flights).separation_constraint();
        // F2 arrives JFK 00:35, five minutes after F1 departs.
        let a = Assignment::from_values([t("00:30"), t("22:35")]);
        assert!(!c.is_satisfied(&a));
        let a = Assignment::from_values([t("00:30"), t("22:45")]);
        assert!(c.is_satisfied(&a));
    }

    #[test]
    fn test_separation_partial_assignment() {
        let flights = vec![
            flight("F1", "JFK", "LAX", "08:00", "B737", "C1"),
            flight("F2", "JFK", "ORD", "08:00", "A320", "C2"),
        ];
        let c = CspBuilder::new(&flights).separation_constraint();
        let mut a = Assignment::new(2);
        a.bind(0, t("08:00"));
        assert!(c.is_satisfied(&a));
        a.bind(1, t("08:05"));
        assert!(!c.is_satisfied(&a));
    }
}
