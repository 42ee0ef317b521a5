//! Commute analysis orchestration.
//!
//! Runs the throttled sampler and the chart renderer once per leg: the
//! morning leg out, then the afternoon leg back, both anchored to the
//! same analysis date and executed strictly one after the other.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::chart;
use crate::directions::DirectionsClient;
use crate::sampler::{Sample, SamplerConfig, ThrottledSampler};
use crate::window::{TimeWindow, WindowError};

/// The samples collected for one direction of the commute.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub direction: String,
    pub samples: Vec<Sample>,
}

impl AnalysisRun {
    /// Fastest sample; earliest departure breaks ties.
    pub fn best(&self) -> Option<&Sample> {
        let min = self.samples.iter().map(|s| s.total_minutes).min()?;
        self.samples.iter().find(|s| s.total_minutes == min)
    }

    /// Slowest sample; earliest departure breaks ties.
    pub fn worst(&self) -> Option<&Sample> {
        let max = self.samples.iter().map(|s| s.total_minutes).max()?;
        self.samples.iter().find(|s| s.total_minutes == max)
    }
}

/// Hour ranges and throttle settings for a full analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Outbound window, start/end hours.
    pub morning_hours: (u32, u32),
    /// Return window, start/end hours.
    pub afternoon_hours: (u32, u32),
    pub sampler: SamplerConfig,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            morning_hours: (6, 10),
            afternoon_hours: (13, 19),
            sampler: SamplerConfig::default(),
        }
    }
}

/// Orchestrates both legs of a commute analysis.
pub struct CommuteAnalysis {
    sampler: ThrottledSampler,
    options: AnalysisOptions,
}

impl CommuteAnalysis {
    pub fn new(client: Arc<dyn DirectionsClient>, options: AnalysisOptions) -> Self {
        let sampler = ThrottledSampler::new(client, options.sampler.clone());
        Self { sampler, options }
    }

    /// Analyze both commute legs for the day after `date`, printing a
    /// chart per leg and returning the raw runs.
    pub async fn analyze(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<AnalysisRun>, WindowError> {
        let legs = [
            (
                "Morning Commute (To Work)",
                origin,
                destination,
                self.options.morning_hours,
            ),
            (
                "Afternoon Commute (To Home)",
                destination,
                origin,
                self.options.afternoon_hours,
            ),
        ];

        let mut runs = Vec::with_capacity(legs.len());
        for (direction, from, to, (start_hour, end_hour)) in legs {
            info!("Analyzing {}...", direction.to_lowercase());
            let window = TimeWindow::commute(date, start_hour, end_hour)?;
            let samples = self.sampler.run(from, to, &window).await;
            info!("{} analysis completed", direction);

            print!("{}", chart::render(&samples, direction));

            runs.push(AnalysisRun {
                direction: direction.to_string(),
                samples,
            });
        }

        Ok(runs)
    }
}
