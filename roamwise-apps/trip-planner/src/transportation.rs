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

//! # Transportation Lookup
//!
//! Runs the flight search for a trip and turns the top results into the
//! markdown section appended to the itinerary. Every failure here degrades
//! to an empty section plus a warning; it never aborts the pipeline.

use std::fmt::Write as _;

use crate::display::{format_duration, format_price};
use crate::flights_query_builder::FlightSearchParams;
use crate::flights_results_parser::FlightOption;
use crate::flights_search::{FlightSearchClient, TransportationError};
use crate::planner::Notice;
use crate::trip_request::{Credential, TripRequest};

pub const MAX_TRANSPORTATION_OPTIONS: usize = 3;
pub const TRANSPORTATION_HEADING: &str = "\n\n## Transportation Options\n\n";
pub const NO_FLIGHTS_NOTICE: &str = "No flights were found for this route and these dates.";

#[derive(Debug, Clone, Default)]
pub struct TransportationOutcome {
    /// The options summarized in `fragment`, for the flight table
    pub flights: Vec<FlightOption>,
    /// Markdown appended after the itinerary; empty on failure
    pub fragment: String,
    pub warning: Option<Notice>,
}

impl TransportationOutcome {
    pub fn failed(err: &TransportationError) -> Self {
        Self {
            flights: Vec::new(),
            fragment: String::new(),
            warning: Some(Notice::warning(
                "Flight Search Unavailable",
                format!("{}. Your travel plan will be generated without flight options.", err),
            )),
        }
    }
}

/// The fixed section used when the search succeeds with zero results.
pub fn no_flights_fragment() -> String {
    format!("{}{}", TRANSPORTATION_HEADING, NO_FLIGHTS_NOTICE)
}

/// One "Option N" block per flight, in the order given.
pub fn format_transportation_fragment(flights: &[FlightOption]) -> String {
    if flights.is_empty() {
        return no_flights_fragment();
    }

    let blocks: Vec<String> = flights
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let mut block = String::new();
            let _ = writeln!(block, "### Option {}", i + 1);
            let _ = writeln!(block, "- Airline: {}", f.airline().unwrap_or("N/A"));
            let _ = writeln!(
                block,
                "- Price: {}",
                f.price.map(format_price).unwrap_or_else(|| "N/A".into())
            );
            let _ = writeln!(
                block,
                "- Duration: {}",
                f.duration_minutes()
                    .map(format_duration)
                    .unwrap_or_else(|| "N/A".into())
            );
            let _ = writeln!(block, "- Departure: {}", f.departure_time().unwrap_or("N/A"));
            let _ = write!(block, "- Arrival: {}", f.arrival_time().unwrap_or("N/A"));
            block
        })
        .collect();

    format!("{}{}", TRANSPORTATION_HEADING, blocks.join("\n\n"))
}

async fn search_top_flights(
    client: &FlightSearchClient,
    request: &TripRequest,
    credential: &Credential,
) -> Result<Vec<FlightOption>, TransportationError> {
    let params = FlightSearchParams::from_trip(request).map_err(TransportationError::InvalidParams)?;
    let result = client.search_flights(&params, credential).await?;
    Ok(result.top(MAX_TRANSPORTATION_OPTIONS).to_vec())
}

/// Search, keep at most three options, and format them. Never fails.
pub async fn lookup_transportation(
    client: &FlightSearchClient,
    request: &TripRequest,
    credential: &Credential,
) -> TransportationOutcome {
    match search_top_flights(client, request, credential).await {
        Ok(flights) => {
            if flights.is_empty() {
                tracing::info!("No flights found, using fallback notice");
            }
            TransportationOutcome {
                fragment: format_transportation_fragment(&flights),
                flights,
                warning: None,
            }
        }
        Err(e) => {
            tracing::warn!("Transportation lookup failed, continuing without it: {}", e);
            TransportationOutcome::failed(&e)
        }
    }
}
