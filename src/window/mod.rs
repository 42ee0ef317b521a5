//! Departure time window generation.
//!
//! A window is the evenly-spaced set of candidate departure instants
//! sampled for one commute leg. Windows are built for the day *after* the
//! anchor date: the tool plans tomorrow's commute relative to whatever
//! date the user picked.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Minutes between candidate departures.
pub const STEP_MINUTES: u32 = 30;

/// Errors building a time window.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("invalid hour: {0} (expected 0-23)")]
    InvalidHour(u32),
}

/// A bounded, evenly-spaced departure window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub step_minutes: u32,
}

impl TimeWindow {
    /// Build the commute window for the day after `date`.
    ///
    /// The first candidate is `date + 1 day` at `start_hour:30:00`; the
    /// last is `date + 1 day` at `end_hour:00:00`. The end is computed
    /// independently of the start, so an `end_hour` at or before
    /// `start_hour` simply yields a short or empty window.
    pub fn commute(date: NaiveDate, start_hour: u32, end_hour: u32) -> Result<Self, WindowError> {
        let day = date + Duration::days(1);
        let start = day
            .and_hms_opt(start_hour, 30, 0)
            .ok_or(WindowError::InvalidHour(start_hour))?;
        let end = day
            .and_hms_opt(end_hour, 0, 0)
            .ok_or(WindowError::InvalidHour(end_hour))?;

        Ok(Self {
            start,
            end,
            step_minutes: STEP_MINUTES,
        })
    }

    /// All candidate departure instants, ascending, endpoints inclusive.
    pub fn departures(&self) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let mut cursor = self.start;
        while cursor <= self.end {
            out.push(cursor);
            cursor += Duration::minutes(self.step_minutes as i64);
        }
        out
    }

    /// Progress denominator for a sampling run: the window span in steps,
    /// rounded up. Note this is one less than `departures().len()` for a
    /// span that divides evenly, because the endpoint is inclusive; the
    /// progress readout has always been counted this way.
    pub fn expected_attempts(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        let span = (self.end - self.start).num_minutes();
        let step = self.step_minutes as i64;
        ((span + step - 1) / step) as usize
    }
}
