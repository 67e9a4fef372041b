//! Named predicate registry.
//!
//! A declarative layer for authoring constraints by name: predicates are
//! boolean functions over typed [`Operand`]s registered under a string key.
//! The backtracking search does not go through this registry; compiled
//! constraints are plain closures (see [`crate::compiler`]).
//!
//! # Built-ins
//!
//! | Name | Operands | Holds when |
//! |------|----------|-----------|
//! | `has_capacity` | flight, [extra kg] | payload + extra ≤ max payload |
//! | `slot_available` | slots, airport, time, minutes | no overlapping occupied slot |
//! | `crew_rest_sufficient` | last end ms, next departure ms, hours | elapsed hours ≥ required |

use std::collections::HashMap;
use std::fmt;

use crate::error::PredicateError;
use crate::models::{ClockTime, Flight, MINUTES_PER_DAY};

/// Capacity sufficiency predicate name.
pub const HAS_CAPACITY: &str = "has_capacity";
/// Slot availability predicate name.
pub const SLOT_AVAILABLE: &str = "slot_available";
/// Crew rest predicate name.
pub const CREW_REST_SUFFICIENT: &str = "crew_rest_sufficient";

const MS_PER_HOUR: f64 = 3_600_000.0;

/// A typed predicate argument.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Flight(&'a Flight),
    Slots(&'a SlotBook),
    Text(&'a str),
    Time(ClockTime),
    Minutes(i64),
    /// Absolute instant or duration in milliseconds.
    Millis(i64),
    Number(f64),
}

impl Operand<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Flight(_) => "flight",
            Self::Slots(_) => "slots",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Minutes(_) => "minutes",
            Self::Millis(_) => "millis",
            Self::Number(_) => "number",
        }
    }
}

type Evaluator = Box<dyn Fn(&[Operand<'_>]) -> Result<bool, PredicateError> + Send + Sync>;

/// Occupied slots per airport.
///
/// Each slot is a `[start, start + duration)` interval on the 24h ring.
#[derive(Debug, Clone, Default)]
pub struct SlotBook {
    occupied: HashMap<String, Vec<(ClockTime, u16)>>,
}

impl SlotBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a slot as occupied.
    pub fn occupy(&mut self, airport: impl Into<String>, start: ClockTime, duration_minutes: u16) {
        self.occupied
            .entry(airport.into())
            .or_default()
            .push((start, duration_minutes));
    }

    /// Builder form of [`occupy`](Self::occupy).
    pub fn with_slot(mut self, airport: impl Into<String>, start: ClockTime, minutes: u16) -> Self {
        self.occupy(airport, start, minutes);
        self
    }

    /// Whether `[start, start + duration)` is free at the airport.
    pub fn is_free(&self, airport: &str, start: ClockTime, duration_minutes: u16) -> bool {
        let Some(slots) = self.occupied.get(airport) else {
            return true;
        };
        slots
            .iter()
            .all(|&(s, d)| !ring_overlap(start, duration_minutes, s, d))
    }

    /// Number of occupied slots at an airport.
    pub fn slot_count(&self, airport: &str) -> usize {
        self.occupied.get(airport).map_or(0, Vec::len)
    }
}

/// Overlap of two half-open intervals on the 24h ring.
fn ring_overlap(a: ClockTime, a_len: u16, b: ClockTime, b_len: u16) -> bool {
    let day = MINUTES_PER_DAY as i64;
    let a_start = a.minutes() as i64;
    let a_end = a_start + a_len as i64;
    [-day, 0, day].iter().any(|shift| {
        let b_start = b.minutes() as i64 + shift;
        let b_end = b_start + b_len as i64;
        a_start < b_end && b_start < a_end
    })
}

/// Registry of named predicates.
///
/// # Example
/// ```
/// use u_flightslot::predicates::{Operand, PredicateRegistry, HAS_CAPACITY};
/// use u_flightslot::models::{ClockTime, Flight};
///
/// let registry = PredicateRegistry::new();
/// let flight = Flight::new("F1", "JFK", "LAX", ClockTime::MIDNIGHT, "B737")
///     .with_max_payload(5000.0)
///     .with_current_payload(4500.0);
/// assert!(registry.evaluate(HAS_CAPACITY, &[Operand::Flight(&flight)]).unwrap());
/// assert!(registry.evaluate("no_such_rule", &[]).is_err());
/// ```
pub struct PredicateRegistry {
    predicates: HashMap<String, Evaluator>,
}

impl PredicateRegistry {
    /// Creates a registry pre-populated with the built-in predicates.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.define(HAS_CAPACITY, has_capacity);
        registry.define(SLOT_AVAILABLE, slot_available);
        registry.define(CREW_REST_SUFFICIENT, crew_rest_sufficient);
        registry
    }

    /// Creates a registry with no predicates.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Registers (or replaces) a predicate.
    pub fn define<F>(&mut self, name: impl Into<String>, evaluator: F)
    where
        F: Fn(&[Operand<'_>]) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Box::new(evaluator));
    }

    /// Evaluates a predicate by name.
    pub fn evaluate(&self, name: &str, operands: &[Operand<'_>]) -> Result<bool, PredicateError> {
        let evaluator = self
            .predicates
            .get(name)
            .ok_or_else(|| PredicateError::UnknownPredicate(name.to_string()))?;
        evaluator(operands)
    }

    /// Whether a predicate is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered predicate names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}

fn mismatch(predicate: &'static str, operands: &[Operand<'_>]) -> PredicateError {
    let kinds: Vec<&str> = operands.iter().map(Operand::kind).collect();
    PredicateError::OperandMismatch {
        predicate,
        reason: format!("got ({})", kinds.join(", ")),
    }
}

fn has_capacity(operands: &[Operand<'_>]) -> Result<bool, PredicateError> {
    match operands {
        [Operand::Flight(f)] => Ok(f.current_payload <= f.max_payload),
        [Operand::Flight(f), Operand::Number(extra)] => {
            Ok(f.current_payload + extra <= f.max_payload)
        }
        _ => Err(mismatch(HAS_CAPACITY, operands)),
    }
}

fn slot_available(operands: &[Operand<'_>]) -> Result<bool, PredicateError> {
    match operands {
        [Operand::Slots(book), Operand::Text(airport), Operand::Time(time), Operand::Minutes(len)] => {
            let len = u16::try_from(*len).map_err(|_| PredicateError::OperandMismatch {
                predicate: SLOT_AVAILABLE,
                reason: format!("duration {len} out of range"),
            })?;
            Ok(book.is_free(airport, *time, len))
        }
        _ => Err(mismatch(SLOT_AVAILABLE, operands)),
    }
}

fn crew_rest_sufficient(operands: &[Operand<'_>]) -> Result<bool, PredicateError> {
    match operands {
        [Operand::Millis(last_end), Operand::Millis(next_departure), Operand::Number(required_hours)] => {
            let elapsed = next_departure.checked_sub(*last_end).ok_or_else(|| {
                PredicateError::OperandMismatch {
                    predicate: CREW_REST_SUFFICIENT,
                    reason: format!("rest interval {last_end}..{next_departure} ms overflows"),
                }
            })?;
            Ok(elapsed as f64 / MS_PER_HOUR >= *required_hours)
        }
        _ => Err(mismatch(CREW_REST_SUFFICIENT, operands)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_builtins_registered() {
        let r = PredicateRegistry::new();
        assert_eq!(
            r.names(),
            vec![CREW_REST_SUFFICIENT, HAS_CAPACITY, SLOT_AVAILABLE]
        );
        assert!(PredicateRegistry::empty().names().is_empty());
    }

    #[test]
    fn test_unknown_predicate() {
        let r = PredicateRegistry::new();
        let err = r.evaluate("runway_dry", &[]).unwrap_err();
        assert_eq!(err, PredicateError::UnknownPredicate("runway_dry".into()));
    }

    #[test]
    fn test_has_capacity() {
        let r = PredicateRegistry::new();
        let f = Flight::new("F1", "A", "B", t("08:00"), "B737")
            .with_max_payload(5000.0)
            .with_current_payload(5000.0);
        assert!(r.evaluate(HAS_CAPACITY, &[Operand::Flight(&f)]).unwrap());
        assert!(!r
            .evaluate(HAS_CAPACITY, &[Operand::Flight(&f), Operand::Number(1.0)])
            .unwrap());
    }

    #[test]
    fn test_operand_mismatch() {
        let r = PredicateRegistry::new();
        let err = r.evaluate(HAS_CAPACITY, &[Operand::Number(1.0)]).unwrap_err();
        assert!(matches!(err, PredicateError::OperandMismatch { predicate: HAS_CAPACITY, .. }));
    }

    #[test]
    fn test_slot_available() {
        let r = PredicateRegistry::new();
        let book = SlotBook::new().with_slot("JFK", t("08:00"), 30);
        let check = |time: &str, len: i64| {
            r.evaluate(
                SLOT_AVAILABLE,
                &[
                    Operand::Slots(&book),
                    Operand::Text("JFK"),
                    Operand::Time(t(time)),
                    Operand::Minutes(len),
                ],
            )
            .unwrap()
        };
        assert!(!check("08:15", 10));
        assert!(!check("07:45", 30));
        assert!(check("07:30", 30));
        assert!(check("08:30", 30));
        assert_eq!(book.slot_count("JFK"), 1);
        assert_eq!(book.slot_count("LAX"), 0);
    }

    #[test]
    fn test_slot_overlap_across_midnight() {
        let book = SlotBook::new().with_slot("LHR", t("23:45"), 30);
        assert!(!book.is_free("LHR", t("00:05"), 10));
        assert!(book.is_free("LHR", t("00:15"), 10));
        assert!(book.is_free("CDG", t("23:50"), 10));
    }

    #[test]
    fn test_crew_rest() {
        let r = PredicateRegistry::new();
        let hour = 3_600_000;
        let ok = r
            .evaluate(
                CREW_REST_SUFFICIENT,
                &[Operand::Millis(0), Operand::Millis(10 * hour), Operand::Number(10.0)],
            )
            .unwrap();
        assert!(ok);
        let short = r
            .evaluate(
                CREW_REST_SUFFICIENT,
                &[Operand::Millis(0), Operand::Millis(10 * hour - 1), Operand::Number(10.0)],
            )
            .unwrap();
        assert!(!short);
    }

    #[test]
    fn test_crew_rest_overflow_is_error() {
        let r = PredicateRegistry::new();
        let err = r
            .evaluate(
                CREW_REST_SUFFICIENT,
                &[Operand::Millis(i64::MIN), Operand::Millis(i64::MAX), Operand::Number(1.0)],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PredicateError::OperandMismatch {
                predicate: CREW_REST_SUFFICIENT,
                ..
            }
        ));
    }

    #[test]
    fn test_define_custom() {
        let mut r = PredicateRegistry::empty();
        r.define("heavy", |ops: &[Operand<'_>]| match ops {
            [Operand::Number(w)] => Ok(*w > 1000.0),
            _ => Err(PredicateError::OperandMismatch {
                predicate: "heavy",
                reason: "expected one number".into(),
            }),
        });
        assert!(r.contains("heavy"));
        assert!(r.evaluate("heavy", &[Operand::Number(1500.0)]).unwrap());
        assert!(!r.evaluate("heavy", &[Operand::Number(10.0)]).unwrap());
    }
}
