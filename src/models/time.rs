//! Wall-clock time on a 24-hour ring.
//!
//! Flights carry departure times as `HH:MM` with no date component. All
//! reasoning happens within a single rolling 24h cycle, so arithmetic
//! wraps at midnight.
//!
//! # Time Model
//! A [`ClockTime`] is minutes since midnight in `0..1440`.
//! A [`ClockWindow`] is an inclusive `start..=end` range on the ring; when
//! `end < start` the window spans midnight.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimeParseError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day (minutes since midnight).
///
/// Serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight (`00:00`).
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a time from hour and minute, `None` if out of range.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Creates a time from minutes since midnight, wrapping into one day.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    #[inline]
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    #[inline]
    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Shifts by a signed number of minutes, wrapping past midnight.
    pub fn add_minutes(self, delta: i64) -> Self {
        Self::from_minutes(self.0 as i64 + delta)
    }

    /// Minutes elapsed from `self` forward to `later`.
    ///
    /// A `later` that is numerically smaller is taken to be on the next day:
    /// `24h - self + later`.
    pub fn minutes_until(self, later: Self) -> u16 {
        if later.0 >= self.0 {
            later.0 - self.0
        } else {
            MINUTES_PER_DAY - self.0 + later.0
        }
    }

    /// Shortest distance around the ring between two times.
    pub fn circular_distance(self, other: Self) -> u16 {
        self.minutes_until(other).min(other.minutes_until(self))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;
        let hour: u16 = h
            .parse()
            .map_err(|_| TimeParseError::Format(s.to_string()))?;
        if m.len() != 2 {
            return Err(TimeParseError::Format(s.to_string()));
        }
        let minute: u16 = m
            .parse()
            .map_err(|_| TimeParseError::Format(s.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// An inclusive time-of-day window `[start, end]`.
///
/// If `end < start` the window wraps past midnight and contains every
/// time `>= start` or `<= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockWindow {
    /// Window start (inclusive).
    pub start: ClockTime,
    /// Window end (inclusive).
    pub end: ClockTime,
}

impl ClockWindow {
    /// Creates a new window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Whether the window crosses midnight.
    #[inline]
    pub fn wraps_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Whether a time falls within this window.
    pub fn contains(&self, time: ClockTime) -> bool {
        if self.wraps_midnight() {
            time >= self.start || time <= self.end
        } else {
            time >= self.start && time <= self.end
        }
    }

    /// Window length in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.start.minutes_until(self.end)
    }
}

impl fmt::Display for ClockWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(t("08:05").minutes(), 485);
        assert_eq!(t("8:05").to_string(), "08:05");
        assert_eq!(t("23:59").hour(), 23);
        assert_eq!(t("23:59").minute(), 59);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("0805".parse::<ClockTime>(), Err(TimeParseError::Format(_))));
        assert!(matches!("08:5".parse::<ClockTime>(), Err(TimeParseError::Format(_))));
        assert!(matches!("24:00".parse::<ClockTime>(), Err(TimeParseError::OutOfRange(_))));
        assert!(matches!("12:60".parse::<ClockTime>(), Err(TimeParseError::OutOfRange(_))));
    }

    #[test]
    fn test_add_minutes_wraps() {
        assert_eq!(t("23:30").add_minutes(120), t("01:30"));
        assert_eq!(t("00:30").add_minutes(-60), t("23:30"));
        assert_eq!(t("12:00").add_minutes(0), t("12:00"));
    }

    #[test]
    fn test_minutes_until_crosses_midnight() {
        assert_eq!(t("08:00").minutes_until(t("08:45")), 45);
        assert_eq!(t("23:00").minutes_until(t("01:00")), 120);
        assert_eq!(t("01:00").circular_distance(t("23:00")), 120);
    }

    #[test]
    fn test_window_plain() {
        let w = ClockWindow::new(t("06:00"), t("09:00"));
        assert!(!w.wraps_midnight());
        assert!(w.contains(t("06:00")));
        assert!(w.contains(t("09:00")));
        assert!(!w.contains(t("09:01")));
        assert_eq!(w.duration_minutes(), 180);
    }

    #[test]
    fn test_window_wraps_midnight() {
        let w = ClockWindow::new(t("22:00"), t("02:00"));
        assert!(w.wraps_midnight());
        assert!(w.contains(t("23:30")));
        assert!(w.contains(t("01:00")));
        assert!(!w.contains(t("12:00")));
        assert_eq!(w.duration_minutes(), 240);
    }

    #[test]
    fn test_serde_as_hhmm() {
        let json = serde_json::to_string(&t("07:15")).unwrap();
        assert_eq!(json, "\"07:15\"");
        let back: ClockTime = serde_json::from_str("\"21:40\"").unwrap();
        assert_eq!(back, t("21:40"));
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }
}
