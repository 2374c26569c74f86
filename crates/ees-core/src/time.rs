//! Simulation time model.
//!
//! # Design
//!
//! The surrounding simulation advances a real-valued clock in a *native*
//! unit chosen per run (seconds by default).  Emergency broadcasts are
//! authored as an hour-minute of day and stored against an absolute minute
//! offset from the simulation epoch:
//!
//!   minutes = 60 * 24 * (day_of_year - 1) + 60 * hour + minute
//!
//! `TimestepUnit::convert` moves values between the two worlds.  `SimTime`
//! wraps the raw `f64` so it can key ordered maps.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

const MINUTES_PER_DAY: u32 = 60 * 24;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// A point on the simulation clock.
///
/// The unit is fixed by context: minutes inside the message store, the
/// native timestep unit inside the data server.  Comparison uses
/// [`f64::total_cmp`] so the type is `Ord` and usable as a `BTreeMap` key.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Re-express this time, currently in `from`, in `to`.
    #[inline]
    pub fn convert(self, from: TimestepUnit, to: TimestepUnit) -> SimTime {
        SimTime(TimestepUnit::convert(self.0, from, to))
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for SimTime {
    fn from(v: f64) -> Self {
        SimTime(v)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

// ── TimestepUnit ──────────────────────────────────────────────────────────────

/// The unit one clock value is expressed in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestepUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimestepUnit {
    /// Length of one unit in seconds.
    #[inline]
    pub fn seconds(self) -> f64 {
        match self {
            TimestepUnit::Seconds => 1.0,
            TimestepUnit::Minutes => 60.0,
            TimestepUnit::Hours   => 3_600.0,
            TimestepUnit::Days    => 86_400.0,
        }
    }

    /// Convert `value` expressed in `from` into `to`.
    #[inline]
    pub fn convert(value: f64, from: TimestepUnit, to: TimestepUnit) -> f64 {
        if from == to {
            return value;
        }
        value * from.seconds() / to.seconds()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimestepUnit::Seconds => "seconds",
            TimestepUnit::Minutes => "minutes",
            TimestepUnit::Hours   => "hours",
            TimestepUnit::Days    => "days",
        }
    }
}

impl FromStr for TimestepUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" => Ok(TimestepUnit::Seconds),
            "minutes" => Ok(TimestepUnit::Minutes),
            "hours"   => Ok(TimestepUnit::Hours),
            "days"    => Ok(TimestepUnit::Days),
            other     => Err(CoreError::UnknownUnit(other.to_owned())),
        }
    }
}

impl fmt::Display for TimestepUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── HhMm ──────────────────────────────────────────────────────────────────────

/// An hour-minute of day.
///
/// Values parsed from the compact broadcast form (`"0930"`) are not range
/// checked: an hour past 23 or a minute past 59 rolls forward into the next
/// hour or day, the same way a lenient calendar would.  The colon form used
/// for configuration (`"09:30"`) is strict.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct HhMm {
    pub hour:   u32,
    pub minute: u32,
}

impl HhMm {
    #[inline]
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Parse the broadcast form: exactly four ASCII digits, `HHmm`.
    pub fn parse_compact(s: &str) -> CoreResult<Self> {
        let raw = s.trim();
        if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::TimeOfDay {
                input:  s.to_owned(),
                reason: "expected four digits HHmm",
            });
        }
        // Four ASCII digits always fit in u32.
        let hour   = raw[..2].parse::<u32>().unwrap_or_default();
        let minute = raw[2..].parse::<u32>().unwrap_or_default();
        Ok(Self { hour, minute })
    }

    /// Parse the configuration form `HH:MM` with `hour < 24` and `minute < 60`.
    pub fn parse_colon(s: &str) -> CoreResult<Self> {
        let err = |reason| CoreError::TimeOfDay { input: s.to_owned(), reason };
        let (h, m) = s.trim().split_once(':').ok_or_else(|| err("expected HH:MM"))?;
        let hour   = h.trim().parse::<u32>().map_err(|_| err("hour is not a number"))?;
        let minute = m.trim().parse::<u32>().map_err(|_| err("minute is not a number"))?;
        if hour >= 24 {
            return Err(err("hour must be below 24"));
        }
        if minute >= 60 {
            return Err(err("minute must be below 60"));
        }
        Ok(Self { hour, minute })
    }

    /// Total minutes after midnight of day one, with rollover applied.
    #[inline]
    fn total_minutes(self) -> u32 {
        60 * self.hour + self.minute
    }

    /// Day of year (1-based) this time falls on after rollover.
    pub fn day_of_year(self) -> u32 {
        1 + self.total_minutes() / MINUTES_PER_DAY
    }

    /// Absolute minute offset from the simulation epoch.
    pub fn absolute_minutes(self) -> f64 {
        let total  = self.total_minutes();
        let in_day = total % MINUTES_PER_DAY;
        let (hour, minute) = (in_day / 60, in_day % 60);
        f64::from(MINUTES_PER_DAY * (self.day_of_year() - 1) + 60 * hour + minute)
    }

    /// Offset of this time of day from midnight, expressed in `unit`.
    pub fn to_unit(self, unit: TimestepUnit) -> f64 {
        TimestepUnit::convert(f64::from(self.hour), TimestepUnit::Hours, unit)
            + TimestepUnit::convert(f64::from(self.minute), TimestepUnit::Minutes, unit)
    }
}

impl fmt::Display for HhMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for HhMm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HhMm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HhMm::parse_colon(&s).map_err(serde::de::Error::custom)
    }
}
