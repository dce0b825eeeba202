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

// Library for roamwise-trip-planner
// Trip form -> flight lookup + generative itinerary -> rendered plan

pub mod config;
pub mod display;
mod flights_query_builder;
mod flights_results_parser;
mod flights_search;
mod itinerary_generator;
mod itinerary_prompt;
pub mod planner;
pub mod transportation;
mod trip_request;
#[cfg(feature = "web")]
pub mod web;

pub use config::PlannerConfig;

// Re-export the flight search pieces
pub use flights_query_builder::{FlightSearchParams, FlightSearchParamsBuilder};
pub use flights_results_parser::{AirportTime, FlightOption, FlightSearchResult, FlightSegment};
pub use flights_search::{FlightSearchClient, TransportationError};

// Re-export the generative pieces
pub use itinerary_generator::{GenerationError, GenerativeClient};
pub use itinerary_prompt::{GenerateContentResponse, build_prompt};

pub use planner::{
    Notice, NoticeLevel, Phase, Planner, SubmissionOutcome, SubmissionStatus, ViewState,
};
pub use trip_request::{
    Credential, Credentials, TripRequest, TripRequestBuilder, ValidationError, parse_budget,
    parse_travelers,
};
