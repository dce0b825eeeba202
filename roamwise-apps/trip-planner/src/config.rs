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

//! Endpoint and client settings shared by both front-ends.
//!
//! There is no config file: defaults live here and the binaries override
//! them through command-line flags.

use std::time::Duration;

pub const DEFAULT_GENERATIVE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATIVE_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_FLIGHT_SEARCH_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_BOOKING_BASE_URL: &str = "https://www.google.com/travel/flights/booking";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub generative_base_url: String,
    pub generative_model: String,
    pub flight_search_base_url: String,
    pub booking_base_url: String,
    pub timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            generative_base_url: DEFAULT_GENERATIVE_BASE_URL.to_string(),
            generative_model: DEFAULT_GENERATIVE_MODEL.to_string(),
            flight_search_base_url: DEFAULT_FLIGHT_SEARCH_BASE_URL.to_string(),
            booking_base_url: DEFAULT_BOOKING_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PlannerConfig {
    /// Point both APIs at one host, e.g. a local mock server.
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.generative_base_url = base_url.clone();
        self.flight_search_base_url = base_url;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
