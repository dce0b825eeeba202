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

//! # Flights Query Builder
//!
//! Side-effect free query construction for the Google Flights engine of the
//! flight-search API. Builds the `search.json` URL from trip fields.

use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;

use crate::config::join_url;
use crate::trip_request::{DATE_FORMAT, TripRequest};

pub const SEARCH_ENGINE: &str = "google_flights";
pub const SEARCH_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSearchParams {
    pub departure_id: String,
    pub arrival_id: String,
    pub outbound_date: String,
    pub return_date: String,
    pub currency: String,
}

impl FlightSearchParams {
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(!self.departure_id.is_empty(), "Departure location is required");
        ensure!(!self.arrival_id.is_empty(), "Arrival location is required");

        let outbound = NaiveDate::parse_from_str(&self.outbound_date, DATE_FORMAT)
            .context("Invalid outbound date")?;
        let inbound = NaiveDate::parse_from_str(&self.return_date, DATE_FORMAT)
            .context("Invalid return date")?;
        ensure!(
            inbound >= outbound,
            "Return date {} is before outbound date {}",
            self.return_date,
            self.outbound_date
        );
        Ok(())
    }

    /// Query pairs in the order the endpoint documents them, credential last.
    fn query_pairs<'a>(&'a self, api_key: &'a str) -> [(&'static str, &'a str); 7] {
        [
            ("engine", SEARCH_ENGINE),
            ("departure_id", self.departure_id.as_str()),
            ("arrival_id", self.arrival_id.as_str()),
            ("outbound_date", self.outbound_date.as_str()),
            ("return_date", self.return_date.as_str()),
            ("currency", self.currency.as_str()),
            ("api_key", api_key),
        ]
    }

    pub fn get_search_url(&self, base_url: &str, api_key: &str) -> String {
        let query = self
            .query_pairs(api_key)
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", join_url(base_url, "search.json"), query)
    }

    /// Same URL with the credential masked, for logs.
    pub fn get_redacted_url(&self, base_url: &str) -> String {
        self.get_search_url(base_url, "***")
    }

    pub fn builder(
        departure: impl AsRef<str>,
        arrival: impl AsRef<str>,
        outbound_date: NaiveDate,
        return_date: NaiveDate,
    ) -> FlightSearchParamsBuilder {
        FlightSearchParamsBuilder {
            departure_id: normalize_location_id(departure.as_ref()),
            arrival_id: normalize_location_id(arrival.as_ref()),
            outbound_date,
            return_date,
        }
    }

    /// Outbound on the start date, back on the end date.
    pub fn from_trip(request: &TripRequest) -> Result<Self> {
        let (start, end) = request.dates().context("Invalid travel dates")?;
        Self::builder(&request.source, &request.destination, start, end).build()
    }
}

#[derive(Debug, Clone)]
pub struct FlightSearchParamsBuilder {
    departure_id: String,
    arrival_id: String,
    outbound_date: NaiveDate,
    return_date: NaiveDate,
}

impl FlightSearchParamsBuilder {
    pub fn build(self) -> Result<FlightSearchParams> {
        let params = FlightSearchParams {
            departure_id: self.departure_id,
            arrival_id: self.arrival_id,
            outbound_date: self.outbound_date.format(DATE_FORMAT).to_string(),
            return_date: self.return_date.format(DATE_FORMAT).to_string(),
            currency: SEARCH_CURRENCY.to_string(),
        };
        params.validate()?;
        Ok(params)
    }
}

/// Trim, and upper-case anything that looks like an IATA airport code.
fn normalize_location_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        trimmed.to_ascii_uppercase()
    } else {
        trimmed.to_string()
    }
}
