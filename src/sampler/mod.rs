//! Throttled sequential sampling of the routing provider.
//!
//! Walks a departure window one instant at a time, queries the provider,
//! and records a [`Sample`] per successful, parseable answer. Queries are
//! strictly sequential with a fixed delay after every attempt so the
//! provider's rate limits are respected.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::directions::{Departure, DirectionsClient, RouteQuery};
use crate::duration::parse_minutes;
use crate::window::TimeWindow;

/// One successfully sampled trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub departure: NaiveDateTime,
    pub duration_text: String,
    pub total_minutes: u32,
    pub distance_text: String,
}

/// Sampler tuning knobs.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Delay after every attempt, success or failure. A hard floor, not a
    /// backoff.
    pub request_delay: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
        }
    }
}

/// Drives the window and the provider together.
pub struct ThrottledSampler {
    client: Arc<dyn DirectionsClient>,
    config: SamplerConfig,
}

impl ThrottledSampler {
    pub fn new(client: Arc<dyn DirectionsClient>, config: SamplerConfig) -> Self {
        Self { client, config }
    }

    /// Sample every departure in the window, in ascending order.
    ///
    /// A failed query or unparseable duration skips that instant; the run
    /// never aborts and never retries. An empty result is a valid outcome
    /// for the caller to report as "no data", not an error.
    pub async fn run(&self, origin: &str, destination: &str, window: &TimeWindow) -> Vec<Sample> {
        let departures = window.departures();
        let expected = window.expected_attempts();
        let mut samples = Vec::with_capacity(departures.len());

        for (attempt, departure) in departures.into_iter().enumerate() {
            let query = RouteQuery {
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure: Departure::At(local_epoch_seconds(departure)),
            };

            match self.client.fetch(&query).await {
                Ok(route) => match parse_minutes(&route.duration_in_traffic_text) {
                    Some(total_minutes) => samples.push(Sample {
                        departure,
                        duration_text: route.duration_in_traffic_text,
                        total_minutes,
                        distance_text: route.distance_text,
                    }),
                    None => warn!(
                        "Skipping {}: unparseable duration {:?}",
                        departure.format("%H:%M"),
                        route.duration_in_traffic_text
                    ),
                },
                Err(e) => debug!("Skipping {}: {}", departure.format("%H:%M"), e),
            }

            info!("Checked departure [{}/{}]", attempt + 1, expected);
            sleep(self.config.request_delay).await;
        }

        samples
    }
}

/// Epoch seconds for a local wall-clock departure.
///
/// Falls back to a UTC reading for local times that do not exist (DST
/// gap) rather than dropping the instant.
fn local_epoch_seconds(departure: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&departure)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| Utc.from_utc_datetime(&departure).timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::{MockDirectionsClient, MockResponse};
    use chrono::NaiveDate;

    fn morning_window() -> TimeWindow {
        TimeWindow::commute(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(), 6, 10).unwrap()
    }

    fn sampler(script: Vec<MockResponse>) -> ThrottledSampler {
        ThrottledSampler::new(
            Arc::new(MockDirectionsClient::new(script)),
            SamplerConfig {
                request_delay: Duration::ZERO,
            },
        )
    }

    #[tokio::test]
    async fn test_all_queries_succeed() {
        let script = (0..8).map(|_| MockDirectionsClient::route("30 mins")).collect();
        let sampler = sampler(script);

        let samples = sampler.run("A", "B", &morning_window()).await;

        assert_eq!(samples.len(), 8);
        assert!(samples.iter().all(|s| s.total_minutes == 30));
        assert!(samples.windows(2).all(|p| p[0].departure < p[1].departure));
    }

    #[tokio::test]
    async fn test_all_queries_fail_yields_empty_run() {
        let script = (0..8)
            .map(|_| MockResponse::Failure("UNKNOWN_ERROR".to_string()))
            .collect();
        let sampler = sampler(script);

        let samples = sampler.run("A", "B", &morning_window()).await;

        // Empty is a valid terminal outcome, not an error.
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_skips_that_instant() {
        let mut script: Vec<MockResponse> =
            (0..8).map(|_| MockDirectionsClient::route("30 mins")).collect();
        script[3] = MockResponse::Failure("OVER_QUERY_LIMIT".to_string());
        let sampler = sampler(script);

        let window = morning_window();
        let samples = sampler.run("A", "B", &window).await;

        assert_eq!(samples.len(), 7);
        // The failed instant (08:00) is absent; order is preserved.
        let departures = window.departures();
        let expected: Vec<_> = departures
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3)
            .map(|(_, d)| *d)
            .collect();
        let sampled: Vec<_> = samples.iter().map(|s| s.departure).collect();
        assert_eq!(sampled, expected);
    }

    #[tokio::test]
    async fn test_unparseable_duration_skips_instant() {
        let script = vec![
            MockDirectionsClient::route("30 mins"),
            MockDirectionsClient::route("shortly"),
            MockDirectionsClient::route("1 hour 5 mins"),
        ];
        let window =
            TimeWindow::commute(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(), 6, 7).unwrap();
        // Window has 2 departures; third scripted response goes unused.
        let sampler = sampler(script);

        let samples = sampler.run("A", "B", &window).await;

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].total_minutes, 30);
    }

    #[tokio::test]
    async fn test_empty_window_never_queries() {
        let sampler = sampler(vec![]);
        let window =
            TimeWindow::commute(NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(), 14, 10).unwrap();

        let samples = sampler.run("A", "B", &window).await;
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn test_sample_fields_carried_through() {
        let sampler = sampler(vec![MockDirectionsClient::route("1 hour 15 mins")]);
        let window = TimeWindow {
            start: NaiveDate::from_ymd_opt(2026, 8, 25)
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 8, 25)
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap(),
            step_minutes: 30,
        };

        let samples = sampler.run("Home", "Work", &window).await;
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].total_minutes, 75);
        assert_eq!(samples[0].duration_text, "1 hour 15 mins");
        assert_eq!(samples[0].distance_text, "12.4 mi");
    }
}
