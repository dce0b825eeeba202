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

//! # Planner
//!
//! The trip-request-to-itinerary pipeline. Owns the published view state and
//! moves it only through `submit`:
//!
//! ```text
//! Idle --(valid request)--> Submitting --(settled)--> Idle
//!   \--(validation notice, no network)--/
//! ```
//!
//! Every submission takes a ticket; only the latest ticket may publish, so a
//! slow, superseded submission can never overwrite a newer result.

use anyhow::Context;
use roamwise_submission_gate::{GateError, LatestWins, Ticket};
use serde::Serialize;
use std::time::Instant;

pub use roamwise_submission_gate::Phase;

use crate::config::PlannerConfig;
use crate::flights_results_parser::FlightOption;
use crate::flights_search::FlightSearchClient;
use crate::itinerary_generator::GenerativeClient;
use crate::transportation::{TransportationOutcome, lookup_transportation};
use crate::trip_request::{Credentials, TripRequest, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// User-facing message produced by a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, description)
    }
}

impl From<&ValidationError> for Notice {
    fn from(err: &ValidationError) -> Self {
        Notice::warning(err.title(), err.to_string())
    }
}

/// What the display component renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub itinerary: Option<String>,
    pub flights: Vec<FlightOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Validation failed before any network call
    Rejected,
    Published,
    /// Itinerary generation failed; the view is unchanged
    Failed,
    /// A newer submission was started; this result was discarded
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub ticket: Option<u64>,
    pub notices: Vec<Notice>,
}

pub struct Planner {
    generator: GenerativeClient,
    flights: FlightSearchClient,
    booking_base_url: String,
    view: LatestWins<ViewState>,
}

impl Planner {
    pub fn new(config: &PlannerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            generator: GenerativeClient::from_config(config)
                .context("Failed to create generative client")?,
            flights: FlightSearchClient::from_config(config)
                .context("Failed to create flight search client")?,
            booking_base_url: config.booking_base_url.clone(),
            view: LatestWins::default(),
        })
    }

    pub fn booking_base_url(&self) -> &str {
        &self.booking_base_url
    }

    pub fn phase(&self) -> Phase {
        self.view.phase()
    }

    /// Snapshot of the currently published itinerary and flights
    pub async fn view(&self) -> ViewState {
        self.view.snapshot().await
    }

    /// Validate, optionally look up flights, generate the itinerary, and
    /// publish the combined text if this is still the latest submission.
    pub async fn submit(&self, request: &TripRequest, credentials: &Credentials) -> SubmissionOutcome {
        if let Err(e) = request.validate(credentials) {
            tracing::info!("Submission rejected: {}", e);
            return SubmissionOutcome {
                status: SubmissionStatus::Rejected,
                ticket: None,
                notices: vec![Notice::from(&e)],
            };
        }

        let ticket = self.view.begin().await;
        let _pending = PendingTicket {
            view: &self.view,
            ticket,
        };
        let started = Instant::now();
        tracing::info!(
            "Submission #{}: {} -> {} ({} to {}), transportation={}",
            ticket.sequence(),
            request.source.trim(),
            request.destination.trim(),
            request.start_date.trim(),
            request.end_date.trim(),
            request.include_transportation
        );

        let mut notices = Vec::new();

        let transportation = if request.include_transportation {
            lookup_transportation(&self.flights, request, &credentials.flight_search).await
        } else {
            TransportationOutcome::default()
        };
        if let Some(warning) = transportation.warning.clone() {
            notices.push(warning);
        }

        let itinerary = match self
            .generator
            .generate_itinerary(request, &credentials.generative)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Submission #{} failed: {}", ticket.sequence(), e);
                let status = match self.view.settle(ticket, |_| {}).await {
                    Ok(()) => {
                        notices.push(Notice::error("Error", e.to_string()));
                        SubmissionStatus::Failed
                    }
                    Err(gate) => superseded(gate, &mut notices),
                };
                return SubmissionOutcome {
                    status,
                    ticket: Some(ticket.sequence()),
                    notices,
                };
            }
        };

        let mut combined = itinerary;
        if !transportation.fragment.is_empty() {
            combined.push_str(&transportation.fragment);
        }
        let flights = transportation.flights;

        let status = match self
            .view
            .settle(ticket, move |view| {
                view.itinerary = Some(combined);
                view.flights = flights;
            })
            .await
        {
            Ok(()) => {
                notices.push(Notice::success(
                    "Travel Plan Generated!",
                    "Your personalized travel itinerary is ready.",
                ));
                SubmissionStatus::Published
            }
            Err(gate) => superseded(gate, &mut notices),
        };
        tracing::info!(
            "Submission #{} settled as {:?} in {:?}",
            ticket.sequence(),
            status,
            started.elapsed()
        );

        SubmissionOutcome {
            status,
            ticket: Some(ticket.sequence()),
            notices,
        }
    }
}

/// Settles the ticket if `submit` is dropped mid-flight, e.g. when the
/// client disconnects, so the phase does not stay `Submitting`.
struct PendingTicket<'a> {
    view: &'a LatestWins<ViewState>,
    ticket: Ticket,
}

impl Drop for PendingTicket<'_> {
    fn drop(&mut self) {
        self.view.abandon(self.ticket);
    }
}

fn superseded(err: GateError, notices: &mut Vec<Notice>) -> SubmissionStatus {
    tracing::info!("Discarding stale result: {}", err);
    notices.push(Notice::info(
        "Request Superseded",
        "A newer travel plan request replaced this one.",
    ));
    SubmissionStatus::Superseded
}
