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

//! # Flights Results Parser
//!
//! Side-effect free JSON decoding for flight-search responses.
//! Only `best_flights` is read; every field inside an entry is optional so a
//! sparse entry never sinks the whole response.

use serde::{Deserialize, Serialize};

use crate::flights_query_builder::FlightSearchParams;
use crate::flights_search::TransportationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportTime {
    pub name: Option<String>,
    pub id: Option<String>,
    /// Local date-time, `YYYY-MM-DD HH:MM`
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub departure_airport: Option<AirportTime>,
    pub arrival_airport: Option<AirportTime>,
    #[serde(rename = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "airplane")]
    pub aircraft: Option<String>,
    pub airline: Option<String>,
    pub flight_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    #[serde(rename = "flights", default)]
    pub segments: Vec<FlightSegment>,
    #[serde(rename = "total_duration")]
    pub total_duration_minutes: Option<u32>,
    pub price: Option<f64>,
    pub booking_token: Option<String>,
}

impl FlightOption {
    pub fn first_segment(&self) -> Option<&FlightSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&FlightSegment> {
        self.segments.last()
    }

    pub fn departure_time(&self) -> Option<&str> {
        self.first_segment()?.departure_airport.as_ref()?.time.as_deref()
    }

    pub fn arrival_time(&self) -> Option<&str> {
        self.last_segment()?.arrival_airport.as_ref()?.time.as_deref()
    }

    pub fn airline(&self) -> Option<&str> {
        self.first_segment()?.airline.as_deref()
    }

    /// Whole-trip duration, falling back to the sum of segment durations
    pub fn duration_minutes(&self) -> Option<u32> {
        self.total_duration_minutes.or_else(|| {
            self.segments
                .iter()
                .map(|s| s.duration_minutes)
                .sum::<Option<u32>>()
                .filter(|m| *m > 0)
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    best_flights: Option<Vec<FlightOption>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FlightSearchResult {
    pub search_params: FlightSearchParams,
    pub best_flights: Vec<FlightOption>,
}

impl FlightSearchResult {
    /// Decode a response body. A missing `best_flights` array means no
    /// results; an `error` field means the API refused the query.
    pub fn from_json(body: &str, search_params: FlightSearchParams) -> Result<Self, TransportationError> {
        let raw: RawSearchResponse =
            serde_json::from_str(body).map_err(TransportationError::Decode)?;

        if let Some(message) = raw.error {
            if raw.best_flights.is_none() {
                return Err(TransportationError::Api(message));
            }
            tracing::warn!("Flight search reported an error alongside results: {}", message);
        }

        Ok(Self {
            search_params,
            best_flights: raw.best_flights.unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.best_flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_flights.is_empty()
    }

    /// The first `n` options, in the order the API ranked them
    pub fn top(&self, n: usize) -> &[FlightOption] {
        &self.best_flights[..n.min(self.best_flights.len())]
    }
}
