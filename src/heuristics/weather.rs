//! Time-of-day weather penalties.
//!
//! A fixed table stands in for real forecast data: each departure hour
//! falls into a period of the day, and each period carries a fractional
//! fuel penalty.

use serde::{Deserialize, Serialize};

use crate::models::{ClockTime, WeatherShift};

/// Hour offsets tried when looking for a calmer departure.
pub const SHIFT_OFFSETS: [i32; 4] = [-1, 0, 1, 2];

/// Period of the day, bucketed by departure hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    /// 06:00-11:59
    Morning,
    /// 12:00-17:59
    Afternoon,
    /// 18:00-21:59
    Evening,
    /// 22:00-05:59
    Night,
}

impl DayPeriod {
    /// Period containing an hour (taken modulo 24).
    pub fn from_hour(hour: i32) -> Self {
        match hour.rem_euclid(24) {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }
}

/// Penalty per period of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherModel {
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
    pub night: f64,
}

impl Default for WeatherModel {
    fn default() -> Self {
        Self {
            morning: 0.02,
            afternoon: 0.08,
            evening: 0.05,
            night: 0.03,
        }
    }
}

impl WeatherModel {
    /// Penalty for a period.
    pub fn penalty(&self, period: DayPeriod) -> f64 {
        match period {
            DayPeriod::Morning => self.morning,
            DayPeriod::Afternoon => self.afternoon,
            DayPeriod::Evening => self.evening,
            DayPeriod::Night => self.night,
        }
    }

    /// Penalty for a departure time.
    pub fn penalty_at(&self, departure: ClockTime) -> f64 {
        self.penalty(DayPeriod::from_hour(departure.hour() as i32))
    }

    /// Looks for an hour shift with a strictly lower penalty.
    ///
    /// Tries [`SHIFT_OFFSETS`] in order and keeps the first lowest. The
    /// saving is what the penalty difference costs on the cruise-adjusted
    /// baseline.
    pub fn suggest_shift(
        &self,
        departure: ClockTime,
        baseline_fuel_kg: f64,
        cruise_factor: f64,
    ) -> Option<WeatherShift> {
        let hour = departure.hour() as i32;
        let current = self.penalty(DayPeriod::from_hour(hour));

        let (hours, penalty) = SHIFT_OFFSETS
            .iter()
            .map(|&offset| (offset, self.penalty(DayPeriod::from_hour(hour + offset))))
            .fold(None, |best: Option<(i32, f64)>, candidate| match best {
                Some(b) if b.1 <= candidate.1 => Some(b),
                _ => Some(candidate),
            })?;

        (penalty < current).then(|| WeatherShift {
            hours,
            penalty,
            potential_savings_kg: baseline_fuel_kg * cruise_factor * (current - penalty),
        })
    }
}
