//! # Commute When
//!
//! Finds the best time to leave for a commute by sampling travel times
//! under traffic across a window of candidate departures.
//!
//! ## Architecture
//!
//! - **directions**: Routing provider abstraction (Google Directions API)
//! - **duration**: Human-readable duration text parsing
//! - **window**: Departure time window generation
//! - **sampler**: Throttled sequential sampling of the provider
//! - **chart**: Textual bar chart rendering
//! - **analyze**: Orchestration of the two commute legs
//! - **config**: Persisted origin/destination configuration

pub mod analyze;
pub mod chart;
pub mod config;
pub mod directions;
pub mod duration;
pub mod sampler;
pub mod window;

pub use analyze::*;
pub use sampler::Sample;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Next strictly-future occurrence of a weekday.
///
/// If `from` already falls on `target`, returns the date a full week later.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let delta = target.num_days_from_sunday() as i64 - from.weekday().num_days_from_sunday() as i64;
    let delta = if delta <= 0 { delta + 7 } else { delta };
    from + Duration::days(delta)
}
