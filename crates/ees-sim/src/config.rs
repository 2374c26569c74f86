use ees_core::{SimTime, TimestepUnit};
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// Clock settings for [`EvacSim`][crate::EvacSim].  All times are in `unit`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub unit:  TimestepUnit,
    /// First tick time.
    pub start: SimTime,
    /// The run stops before reaching this time.
    pub end:   SimTime,
    /// Tick length.
    pub step:  f64,
}

impl Default for SimConfig {
    /// One simulated day, ticking every minute, in seconds.
    fn default() -> Self {
        Self {
            unit:  TimestepUnit::Seconds,
            start: SimTime::ZERO,
            end:   SimTime(86_400.0),
            step:  60.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SimError::Config(format!("step must be positive, got {}", self.step)));
        }
        if !self.start.0.is_finite() || !self.end.0.is_finite() {
            return Err(SimError::Config("start and end must be finite".into()));
        }
        if self.end < self.start {
            return Err(SimError::Config(format!(
                "end {} is before start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Time of the `n`-th tick.
    pub fn tick_time(&self, n: u64) -> SimTime {
        SimTime(self.start.0 + self.step * n as f64)
    }
}
