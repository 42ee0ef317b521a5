//! Parsing of provider duration text.
//!
//! The Directions API reports durations as human-readable strings like
//! "1 hour 12 mins" or "45 mins". Charting needs a plain minute count.

use regex::Regex;

/// Parse a duration string into total minutes.
///
/// Picks up the first integer before "hour" and the first before "min";
/// either component may be absent. Returns `None` when neither pattern
/// matches, so callers can tell unparseable text apart from a genuine
/// zero-minute duration and skip the sample instead of recording 0.
pub fn parse_minutes(text: &str) -> Option<u32> {
    let re_hours = Regex::new(r"(\d+) hour").unwrap();
    let re_mins = Regex::new(r"(\d+) min").unwrap();

    let hours = re_hours
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let mins = re_mins
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    match (hours, mins) {
        (None, None) => None,
        (h, m) => Some(h.unwrap_or(0) * 60 + m.unwrap_or(0)),
    }
}
