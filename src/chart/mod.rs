//! Textual bar chart rendering.
//!
//! Turns an ordered run of samples into a boxed chart: one row per
//! departure with a bar scaled at five minutes per block, plus a summary
//! line naming the best time to leave.

use std::fmt::Write;

use crate::sampler::Sample;

/// Minutes represented by one bar block.
pub const MINUTES_PER_BLOCK: u32 = 5;

const INNER_WIDTH: usize = 78;

/// Render a run of samples under the given title.
///
/// Every row at the minimum gets a `✓ BEST` marker and every row at the
/// maximum a `⚠ WORST` marker, so ties show multiple markers. The summary
/// line instead commits to a single winner: the earliest departure at the
/// minimum. That mismatch on ties is long-standing, deliberate behavior.
pub fn render(samples: &[Sample], title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ===", title);

    if samples.is_empty() {
        let _ = writeln!(out, "No valid trips found for this time period.");
        return out;
    }

    let min_minutes = samples.iter().map(|s| s.total_minutes).min().unwrap_or(0);
    let max_minutes = samples.iter().map(|s| s.total_minutes).max().unwrap_or(0);
    let bar_width = blocks(max_minutes);

    let _ = writeln!(out, "╭{}╮", "─".repeat(INNER_WIDTH));
    let _ = writeln!(
        out,
        "│{:<width$}│",
        " Duration in minutes (each █ = 5 minutes)",
        width = INNER_WIDTH
    );
    let _ = writeln!(out, "├{}┤", "─".repeat(INNER_WIDTH));

    for sample in samples {
        let time = sample.departure.format("%H:%M").to_string();
        let bar = "█".repeat(blocks(sample.total_minutes));
        let duration = format!("{}min", sample.total_minutes);
        let marker = if sample.total_minutes == min_minutes {
            "✓ BEST"
        } else if sample.total_minutes == max_minutes {
            "⚠ WORST"
        } else {
            ""
        };

        let row = format!(
            " {:<7}[{:<bar_width$}] {:<8} {:<8}",
            time, bar, duration, marker
        );
        let _ = writeln!(out, "│{:<width$}│", row, width = INNER_WIDTH);
    }

    let _ = writeln!(out, "├{}┤", "─".repeat(INNER_WIDTH));

    // First sample at the minimum wins; earliest departure breaks ties.
    if let Some(best) = samples.iter().find(|s| s.total_minutes == min_minutes) {
        let summary = format!(
            " Best time to leave: {} ({})",
            best.departure.format("%H:%M:%S"),
            best.duration_text
        );
        let _ = writeln!(out, "│{:<width$}│", summary, width = INNER_WIDTH);
    }

    let _ = writeln!(out, "╰{}╯", "─".repeat(INNER_WIDTH));
    out
}

/// Bar length for a minute count, rounded to the nearest block.
fn blocks(minutes: u32) -> usize {
    ((minutes as f64) / (MINUTES_PER_BLOCK as f64)).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn sample(hour: u32, minute: u32, total_minutes: u32) -> Sample {
        Sample {
            departure: departure(hour, minute),
            duration_text: format!("{} mins", total_minutes),
            total_minutes,
            distance_text: "12.4 mi".to_string(),
        }
    }

    fn departure(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 25)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_run_renders_notice() {
        let out = render(&[], "Morning Commute (To Work)");

        assert!(out.contains("=== Morning Commute (To Work) ==="));
        assert!(out.contains("No valid trips found for this time period."));
        assert!(!out.contains("BEST"));
    }

    #[test]
    fn test_single_best_and_worst_markers() {
        let minutes = [30, 32, 28, 35, 40, 38, 33, 31];
        let samples: Vec<Sample> = minutes
            .iter()
            .enumerate()
            .map(|(i, &m)| sample(6 + (i as u32 + 1) / 2, if i % 2 == 0 { 30 } else { 0 }, m))
            .collect();

        let out = render(&samples, "Morning Commute (To Work)");

        assert_eq!(out.matches("✓ BEST").count(), 1);
        assert_eq!(out.matches("⚠ WORST").count(), 1);
        // Best is the third departure (28 min), worst the fifth (40 min).
        assert!(out.contains("Best time to leave: 07:30:00 (28 mins)"));
    }

    #[test]
    fn test_tied_rows_all_marked_but_summary_picks_first() {
        let samples = vec![
            sample(6, 30, 30),
            sample(7, 0, 25),
            sample(7, 30, 25),
            sample(8, 0, 40),
            sample(8, 30, 40),
        ];

        let out = render(&samples, "Afternoon Commute (To Home)");

        // Row markers flag every tied row; the summary commits to the
        // earliest minimum only.
        assert_eq!(out.matches("✓ BEST").count(), 2);
        assert_eq!(out.matches("⚠ WORST").count(), 2);
        assert!(out.contains("Best time to leave: 07:00:00 (25 mins)"));
    }

    #[test]
    fn test_bar_lengths_scale_by_five_minutes() {
        let samples = vec![sample(6, 30, 30), sample(7, 0, 42)];
        let out = render(&samples, "t");

        // 30 min -> 6 blocks, 42 min -> round(8.4) = 8 blocks.
        assert!(out.contains(&"█".repeat(6)));
        assert!(out.contains(&"█".repeat(8)));
        assert!(!out.contains(&"█".repeat(9)));
    }

    #[test]
    fn test_summary_duration_equals_minimum() {
        let samples = vec![sample(13, 30, 55), sample(14, 0, 47), sample(14, 30, 61)];
        let out = render(&samples, "Afternoon Commute (To Home)");

        assert!(out.contains("(47 mins)"));
        assert!(out.contains("Best time to leave: 14:00:00"));
    }
}
