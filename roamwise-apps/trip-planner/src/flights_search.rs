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

//! # Flight Search Client
//!
//! Effectful (network) operations against the flight-search API.

use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::PlannerConfig;
use crate::flights_query_builder::FlightSearchParams;
use crate::flights_results_parser::FlightSearchResult;
use crate::trip_request::Credential;

#[derive(Debug, Error)]
pub enum TransportationError {
    #[error("Invalid flight search parameters: {0:#}")]
    InvalidParams(anyhow::Error),
    #[error("Flight search request failed: {0}")]
    Transport(#[source] wreq::Error),
    #[error("Flight search returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Flight search API error: {0}")]
    Api(String),
    #[error("Unexpected flight search response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Clone)]
pub struct FlightSearchClient {
    client: Arc<wreq::Client>,
    base_url: String,
}

impl FlightSearchClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = wreq::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &PlannerConfig) -> anyhow::Result<Self> {
        Self::new(config.flight_search_base_url.clone(), config.timeout())
    }
}

impl FlightSearchClient {
    pub async fn fetch_raw(
        &self,
        params: &FlightSearchParams,
        credential: &Credential,
    ) -> Result<String, TransportationError> {
        let url = params.get_search_url(&self.base_url, credential.expose());
        tracing::debug!("[fetch_raw] GET {}", params.get_redacted_url(&self.base_url));

        let http_start = Instant::now();
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(TransportationError::Transport)?;

        let status = response.status();
        tracing::debug!(
            "[fetch_raw] HTTP Status: {} {} after {:?}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            http_start.elapsed()
        );

        let body = response
            .text()
            .await
            .map_err(TransportationError::Transport)?;
        tracing::debug!("[fetch_raw] Response body: {} KB", body.len() / 1024);

        if !status.is_success() {
            return Err(TransportationError::Status {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(body)
    }

    pub async fn search_flights(
        &self,
        params: &FlightSearchParams,
        credential: &Credential,
    ) -> Result<FlightSearchResult, TransportationError> {
        let overall_start = Instant::now();
        params
            .validate()
            .map_err(TransportationError::InvalidParams)?;

        tracing::info!(
            "Searching flights {} -> {} ({} to {})",
            params.departure_id,
            params.arrival_id,
            params.outbound_date,
            params.return_date
        );
        let body = self.fetch_raw(params, credential).await?;

        let result = FlightSearchResult::from_json(&body, params.clone())?;
        tracing::info!(
            "Flight search returned {} best flights in {:?}",
            result.len(),
            overall_start.elapsed()
        );
        Ok(result)
    }
}

/// Pull `{"error": "..."}` out of an error body, else a short preview.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(500).collect())
}
