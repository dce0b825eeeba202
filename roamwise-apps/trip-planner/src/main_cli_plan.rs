//!  Roamwise Trip Planner
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for one-shot trip planning.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use roamwise_trip_planner::display::render_flight_table;
use roamwise_trip_planner::{
    Credentials, NoticeLevel, Planner, PlannerConfig, SubmissionOutcome, SubmissionStatus,
    TripRequest, ViewState,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "roamwise-plan")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Where the trip starts (city or airport code, e.g., JFK)
    #[arg(short, long)]
    from: String,

    /// Where the trip goes (city or airport code, e.g., CDG)
    #[arg(short, long)]
    to: String,

    /// First day of the trip (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short, long)]
    start: String,

    /// Last day of the trip (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short, long)]
    end: String,

    /// Budget in USD
    #[arg(short, long)]
    budget: Option<f64>,

    /// Number of travelers
    #[arg(short = 'n', long)]
    travelers: Option<u32>,

    /// Interests and preferences (e.g., "museums, food tours")
    #[arg(short, long, default_value = "")]
    interests: String,

    /// Look up flights and append the top options to the plan
    #[arg(long)]
    flights: bool,

    /// Gemini API key
    #[arg(long, default_value = "", hide_default_value = true)]
    gemini_key: String,

    /// SerpApi key, required with --flights
    #[arg(long, default_value = "", hide_default_value = true)]
    serpapi_key: String,

    /// Override the generative model
    #[arg(long, default_value = roamwise_trip_planner::config::DEFAULT_GENERATIVE_MODEL)]
    model: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = roamwise_trip_planner::config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Accept YYYY/MM/DD as well; anything unparseable is left for validation to report
fn normalize_date(s: &str) -> String {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y/%m/%d"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| s.to_string())
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn print_notices(outcome: &SubmissionOutcome) {
    for notice in &outcome.notices {
        let marker = match notice.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        eprintln!("{} {}: {}", marker, notice.title, notice.description);
    }
}

/// Render the published plan to stdout
fn render_results(request: &TripRequest, view: &ViewState, booking_base_url: &str) {
    let bar = "=".repeat(get_terminal_width().min(96));
    println!(
        "{}\n  🧳  {} → {}, {} to {}\n{}\n",
        bar, request.source, request.destination, request.start_date, request.end_date, bar
    );

    if let Some(itinerary) = &view.itinerary {
        println!("{}\n", itinerary);
    }

    if let Some(table) = render_flight_table(&view.flights, booking_base_url, get_terminal_width()) {
        println!("✈️  Available Flights\n{}\n{}", "-".repeat(get_terminal_width().min(96)), table);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let request = TripRequest {
        source: args.from,
        destination: args.to,
        start_date: normalize_date(&args.start),
        end_date: normalize_date(&args.end),
        budget: args.budget,
        travelers: args.travelers,
        interests: args.interests,
        include_transportation: args.flights,
    };
    let credentials = Credentials::new(args.gemini_key, args.serpapi_key);
    tracing::debug!("Request: {:?}, credentials: {:?}", request, credentials);

    let config = PlannerConfig {
        generative_model: args.model,
        timeout_secs: args.timeout,
        ..Default::default()
    };
    let planner = Planner::new(&config).context("Failed to create planner")?;

    eprintln!("Generating your travel plan...");
    let outcome = planner.submit(&request, &credentials).await;
    print_notices(&outcome);

    if outcome.status != SubmissionStatus::Published {
        anyhow::bail!("No travel plan generated ({:?})", outcome.status);
    }

    render_results(&request, &planner.view().await, planner.booking_base_url());
    Ok(())
}
