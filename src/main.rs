use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, Weekday};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commute_when::config::CommuteConfig;
use commute_when::directions::GoogleDirectionsClient;
use commute_when::{next_weekday, AnalysisOptions, CommuteAnalysis};

#[derive(Parser)]
#[command(name = "commute-when")]
#[command(about = "Analyze commute times for different days")]
#[command(version)]
struct Cli {
    /// Starting location
    origin: Option<String>,

    /// Destination location
    destination: Option<String>,

    /// Analyze commute for today
    #[arg(long)]
    today: bool,

    /// Analyze commute for tomorrow
    #[arg(long)]
    tomorrow: bool,

    /// Analyze commute for next Monday
    #[arg(long)]
    next_monday: bool,

    /// Analyze commute for next Tuesday
    #[arg(long)]
    next_tuesday: bool,

    /// Analyze commute for next Wednesday
    #[arg(long)]
    next_wednesday: bool,

    /// Analyze commute for next Thursday
    #[arg(long)]
    next_thursday: bool,

    /// Analyze commute for next Friday
    #[arg(long)]
    next_friday: bool,

    /// Analyze commute for next Saturday
    #[arg(long)]
    next_saturday: bool,

    /// Analyze commute for next Sunday
    #[arg(long)]
    next_sunday: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Resolve the analysis anchor date, flags in priority order.
    fn analysis_date(&self, today: NaiveDate) -> (NaiveDate, &'static str) {
        let weekday_flags = [
            (self.next_monday, Weekday::Mon, "Next Monday"),
            (self.next_tuesday, Weekday::Tue, "Next Tuesday"),
            (self.next_wednesday, Weekday::Wed, "Next Wednesday"),
            (self.next_thursday, Weekday::Thu, "Next Thursday"),
            (self.next_friday, Weekday::Fri, "Next Friday"),
            (self.next_saturday, Weekday::Sat, "Next Saturday"),
            (self.next_sunday, Weekday::Sun, "Next Sunday"),
        ];

        if self.today {
            return (today, "Today");
        }
        if self.tomorrow {
            return (today + chrono::Duration::days(1), "Tomorrow");
        }
        for (set, weekday, description) in weekday_flags {
            if set {
                return (next_weekday(today, weekday), description);
            }
        }
        (today, "Today")
    }
}

fn print_usage() {
    println!("Usage: commute-when <origin> <destination>");
    println!(
        "Example: commute-when \"1234 Culver Drive, Irvine, CA 92602\" \
         \"4077 Ince Blvd, Culver City, CA 90232\""
    );
    println!("\nOr create a config file at ~/.config/commute.json with the following format:");
    println!(
        "{{\n  \"origin\": \"your origin address\",\n  \"destination\": \"your destination address\"\n}}"
    );
}

/// Locations from positional args (persisted for next time) or the saved
/// config. `None` means the caller should print usage and exit non-zero.
fn resolve_locations(cli: &Cli) -> Option<CommuteConfig> {
    if let (Some(origin), Some(destination)) = (&cli.origin, &cli.destination) {
        let config = CommuteConfig {
            origin: origin.clone(),
            destination: destination.clone(),
        };
        if let Err(e) = config.save() {
            warn!("Failed to save configuration: {}", e);
        }
        return Some(config);
    }

    CommuteConfig::load()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Ok(api_key) = std::env::var("GOOGLE_MAPS_API_KEY") else {
        eprintln!("Please set the GOOGLE_MAPS_API_KEY environment variable.");
        std::process::exit(1);
    };

    let Some(locations) = resolve_locations(&cli) else {
        print_usage();
        std::process::exit(1);
    };

    let (date, description) = cli.analysis_date(Local::now().date_naive());
    println!("Traffic Analysis for Your Commute - {}\n", description);

    let client = GoogleDirectionsClient::new(api_key)?;
    let analysis = CommuteAnalysis::new(Arc::new(client), AnalysisOptions::default());
    analysis
        .analyze(&locations.origin, &locations.destination, date)
        .await?;

    println!("\nAnalysis complete!");
    Ok(())
}
