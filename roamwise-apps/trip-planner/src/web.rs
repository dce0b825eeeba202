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

//! # Web Form
//!
//! Local HTTP front-end: serves the trip form, runs the planner on POST and
//! renders the published itinerary and flight table as HTML.

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::display::{escape_html, render_flight_table_html, render_itinerary_html};
use crate::planner::{Notice, Phase, Planner, SubmissionOutcome, SubmissionStatus, ViewState};
use crate::trip_request::{Credentials, TripRequest, ValidationError, parse_budget, parse_travelers};

const PAGE_TEMPLATE: &str = include_str!("../assets/page.html");

/// Raw form fields, exactly as the browser posts them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub travelers: String,
    #[serde(default)]
    pub interests: String,
    /// Checkbox: present ("on") when ticked, absent otherwise
    #[serde(default)]
    pub include_transportation: Option<String>,
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(default)]
    pub serpapi_api_key: String,
}

impl TripForm {
    pub fn to_request(&self) -> Result<TripRequest, ValidationError> {
        Ok(TripRequest {
            source: self.source.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            budget: parse_budget(&self.budget)?,
            travelers: parse_travelers(&self.travelers)?,
            interests: self.interests.clone(),
            include_transportation: self.include_transportation.is_some(),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.gemini_api_key.as_str(), self.serpapi_api_key.as_str())
    }

    /// Checks that come before number parsing in the validation order:
    /// the generative key, then the required fields.
    fn check_key_and_required(&self) -> Result<(), ValidationError> {
        if !self.credentials().generative.is_present() {
            return Err(ValidationError::MissingGenerativeKey);
        }
        let missing =
            TripRequest::builder(&self.source, &self.destination, &self.start_date, &self.end_date)
                .build()
                .missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        Ok(())
    }

    /// Parse the form, reporting the first failure in validation order.
    pub fn to_checked_request(&self) -> Result<TripRequest, ValidationError> {
        self.check_key_and_required()?;
        self.to_request()
    }
}

#[derive(Debug, Serialize)]
struct StateResponse {
    submitting: bool,
    view: ViewState,
}

pub fn build_router(planner: Arc<Planner>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/plan", post(plan))
        .route("/api/state", get(state))
        .with_state(planner)
}

async fn index(State(planner): State<Arc<Planner>>) -> Html<String> {
    let view = planner.view().await;
    Html(render_page(&TripForm::default(), &[], &view, planner.booking_base_url()))
}

async fn plan(State(planner): State<Arc<Planner>>, Form(form): Form<TripForm>) -> Html<String> {
    let outcome = match form.to_checked_request() {
        Ok(request) => planner.submit(&request, &form.credentials()).await,
        Err(e) => SubmissionOutcome {
            status: SubmissionStatus::Rejected,
            ticket: None,
            notices: vec![Notice::from(&e)],
        },
    };
    let view = planner.view().await;
    Html(render_page(&form, &outcome.notices, &view, planner.booking_base_url()))
}

async fn state(State(planner): State<Arc<Planner>>) -> impl IntoResponse {
    Json(StateResponse {
        submitting: planner.phase() == Phase::Submitting,
        view: planner.view().await,
    })
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            format!(
                "<div class=\"notice {}\"><strong>{}</strong> {}</div>\n",
                n.level.as_str(),
                escape_html(&n.title),
                escape_html(&n.description)
            )
        })
        .collect()
}

/// Substitute `{{key}}` placeholders in one pass so inserted values are
/// never themselves expanded.
fn fill_template(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_page(form: &TripForm, notices: &[Notice], view: &ViewState, booking_base_url: &str) -> String {
    fill_template(PAGE_TEMPLATE, |key| {
        let value = match key {
            "notices" => return Some(render_notices(notices)),
            "results" => {
                let mut results = render_itinerary_html(view.itinerary.as_deref().unwrap_or(""));
                results.push_str(&render_flight_table_html(&view.flights, booking_base_url));
                return Some(results);
            }
            "include_transportation" => {
                return Some(if form.include_transportation.is_some() { "checked" } else { "" }.to_string());
            }
            "gemini_api_key" => &form.gemini_api_key,
            "serpapi_api_key" => &form.serpapi_api_key,
            "source" => &form.source,
            "destination" => &form.destination,
            "start_date" => &form.start_date,
            "end_date" => &form.end_date,
            "budget" => &form.budget,
            "travelers" => &form.travelers,
            "interests" => &form.interests,
            _ => return None,
        };
        Some(escape_html(value))
    })
}

/// Serve until `shutdown` is cancelled.
pub async fn serve(
    listener: tokio::net::TcpListener,
    planner: Arc<Planner>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!("Trip planner listening on http://{}", addr.map(|a| a.to_string()).unwrap_or_default());
    axum::serve(listener, build_router(planner))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
