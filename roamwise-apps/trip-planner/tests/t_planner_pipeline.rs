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

//! End-to-end submission tests against a local mock of both remote APIs.

use std::time::Duration;

use roamwise_trip_planner::transportation::{format_transportation_fragment, no_flights_fragment};
use roamwise_trip_planner::{
    Credentials, FlightOption, NoticeLevel, Phase, Planner, PlannerConfig, SubmissionStatus,
    TripRequest,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
const SEARCH_PATH: &str = "/search.json";

fn planner_for(server: &MockServer) -> Planner {
    let config = PlannerConfig::default().with_api_base_url(server.uri());
    Planner::new(&config).unwrap()
}

fn paris_trip(include_transportation: bool) -> TripRequest {
    TripRequest::builder("JFK", "CDG", "2026-05-01", "2026-05-08")
        .budget(2000.0)
        .travelers(2)
        .interests("museums, food tours")
        .include_transportation(include_transportation)
        .build()
}

fn keys() -> Credentials {
    Credentials::new("gem-key", "serp-key")
}

fn gemini_text(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 312, "candidatesTokenCount": 1804 }
    }))
}

fn fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures-flights-parsing/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path, e))
}

async fn mount_gemini(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "gem-key"))
        .respond_with(gemini_text(text))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_flights(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("engine", "google_flights"))
        .and(query_param("departure_id", "JFK"))
        .and(query_param("arrival_id", "CDG"))
        .and(query_param("outbound_date", "2026-05-01"))
        .and(query_param("return_date", "2026-05-08"))
        .and(query_param("currency", "USD"))
        .and(query_param("api_key", "serp-key"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
        .expect(1)
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}

#[tokio::test]
async fn missing_required_field_makes_no_network_call() {
    let server = MockServer::start().await;
    let planner = planner_for(&server);

    for (source, destination, start, end) in [
        ("", "CDG", "2026-05-01", "2026-05-08"),
        ("JFK", "  ", "2026-05-01", "2026-05-08"),
        ("JFK", "CDG", "", "2026-05-08"),
        ("JFK", "CDG", "2026-05-01", ""),
    ] {
        let request = TripRequest::builder(source, destination, start, end).build();
        let outcome = planner.submit(&request, &keys()).await;
        assert_eq!(outcome.status, SubmissionStatus::Rejected);
        assert_eq!(outcome.ticket, None);
        assert_eq!(outcome.notices[0].title, "Missing Information");
    }

    assert_eq!(request_count(&server).await, 0);
    assert_eq!(planner.phase(), Phase::Idle);
    assert_eq!(planner.view().await.itinerary, None);
}

#[tokio::test]
async fn missing_generative_key_makes_no_network_call() {
    let server = MockServer::start().await;
    let planner = planner_for(&server);

    let outcome = planner
        .submit(&paris_trip(false), &Credentials::new("   ", "serp-key"))
        .await;
    assert_eq!(outcome.status, SubmissionStatus::Rejected);
    assert_eq!(outcome.notices[0].title, "API Key Required");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn transportation_without_flight_key_makes_no_network_call() {
    let server = MockServer::start().await;
    let planner = planner_for(&server);

    let outcome = planner
        .submit(&paris_trip(true), &Credentials::new("gem-key", ""))
        .await;
    assert_eq!(outcome.status, SubmissionStatus::Rejected);
    assert_eq!(outcome.notices[0].title, "Flight Search Key Required");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn itinerary_only_is_published_verbatim() {
    let server = MockServer::start().await;
    mount_gemini(&server, "Day 1: Louvre.\nDay 2: Montmartre.").await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(false), &keys()).await;

    assert_eq!(outcome.status, SubmissionStatus::Published);
    assert_eq!(outcome.ticket, Some(1));
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].level, NoticeLevel::Success);
    assert_eq!(outcome.notices[0].title, "Travel Plan Generated!");

    let view = planner.view().await;
    assert_eq!(view.itinerary.as_deref(), Some("Day 1: Louvre.\nDay 2: Montmartre."));
    assert!(view.flights.is_empty());
    assert_eq!(planner.phase(), Phase::Idle);
}

#[tokio::test]
async fn prompt_carries_trip_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Destination: CDG"))
        .and(body_string_contains("Budget: $2000"))
        .and(body_string_contains("Number of Travelers: 2"))
        .and(body_string_contains("museums, food tours"))
        .respond_with(gemini_text("ok"))
        .expect(1)
        .mount(&server)
        .await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(false), &keys()).await;
    assert_eq!(outcome.status, SubmissionStatus::Published);
}

#[tokio::test]
async fn three_best_flights_are_appended_in_order() {
    let server = MockServer::start().await;
    mount_flights(&server, 200, fixture("jfk_cdg_three_best.json")).await;
    mount_gemini(&server, "X").await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(true), &keys()).await;
    assert_eq!(outcome.status, SubmissionStatus::Published);

    let view = planner.view().await;
    let itinerary = view.itinerary.unwrap();
    assert_eq!(itinerary, format!("X{}", format_transportation_fragment(&view.flights)));
    assert_eq!(itinerary.matches("### Option ").count(), 3);

    let first = itinerary.find("- Airline: Air France").unwrap();
    let second = itinerary.find("- Airline: Delta").unwrap();
    let third = itinerary.find("- Airline: Icelandair").unwrap();
    assert!(first < second && second < third);
    assert!(itinerary.contains("- Price: $612"));
    assert!(itinerary.contains("- Duration: 10h 50m"));
    assert!(itinerary.contains("- Departure: 2026-05-01 20:10"));
    assert!(itinerary.contains("- Arrival: 2026-05-02 13:00"));
}

#[tokio::test]
async fn more_than_three_flights_keeps_the_top_three() {
    let server = MockServer::start().await;
    mount_flights(&server, 200, fixture("jfk_cdg_five_best.json")).await;
    mount_gemini(&server, "X").await;
    let planner = planner_for(&server);

    planner.submit(&paris_trip(true), &keys()).await;

    let view = planner.view().await;
    let airlines: Vec<&str> = view.flights.iter().filter_map(FlightOption::airline).collect();
    assert_eq!(airlines, ["Air France", "Delta", "Icelandair"]);
    let itinerary = view.itinerary.unwrap();
    assert_eq!(itinerary.matches("### Option ").count(), 3);
    assert!(!itinerary.contains("British Airways"));
}

#[tokio::test]
async fn no_flights_appends_fallback_and_still_succeeds() {
    for name in ["empty_best_flights.json", "no_best_flights.json"] {
        let server = MockServer::start().await;
        mount_flights(&server, 200, fixture(name)).await;
        mount_gemini(&server, "X").await;
        let planner = planner_for(&server);

        let outcome = planner.submit(&paris_trip(true), &keys()).await;
        assert_eq!(outcome.status, SubmissionStatus::Published, "{}", name);

        let view = planner.view().await;
        assert_eq!(view.itinerary, Some(format!("X{}", no_flights_fragment())), "{}", name);
        assert!(view.flights.is_empty());
    }
}

#[tokio::test]
async fn flight_api_failure_still_publishes_itinerary() {
    let server = MockServer::start().await;
    mount_flights(&server, 401, fixture("invalid_api_key.json")).await;
    mount_gemini(&server, "X").await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(true), &keys()).await;

    assert_eq!(outcome.status, SubmissionStatus::Published);
    let warning = outcome
        .notices
        .iter()
        .find(|n| n.level == NoticeLevel::Warning)
        .expect("transportation warning");
    assert_eq!(warning.title, "Flight Search Unavailable");
    assert!(warning.description.contains("Invalid API key"));
    assert!(!warning.description.contains("serp-key"));

    let view = planner.view().await;
    assert_eq!(view.itinerary.as_deref(), Some("X"));
    assert!(view.flights.is_empty());
}

#[tokio::test]
async fn generation_failure_keeps_previous_result() {
    let server = MockServer::start().await;
    mount_gemini(&server, "X").await;
    let planner = planner_for(&server);
    planner.submit(&paris_trip(false), &keys()).await;
    server.verify().await;
    server.reset().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = planner.submit(&paris_trip(false), &keys()).await;

    assert_eq!(outcome.status, SubmissionStatus::Failed);
    assert_eq!(outcome.ticket, Some(2));
    let error = &outcome.notices[0];
    assert_eq!(error.level, NoticeLevel::Error);
    assert_eq!(error.title, "Error");
    assert_eq!(error.description, "API Error: 500 Internal Server Error");

    assert_eq!(planner.view().await.itinerary.as_deref(), Some("X"));
    assert_eq!(planner.phase(), Phase::Idle);
}

#[tokio::test]
async fn generation_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(false), &keys()).await;
    assert_eq!(outcome.status, SubmissionStatus::Failed);
    assert_eq!(
        outcome.notices[0].description,
        "API Error: 400 API key not valid. Please pass a valid API key."
    );
    assert_eq!(planner.view().await.itinerary, None);
}

#[tokio::test]
async fn response_without_candidates_is_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;
    let planner = planner_for(&server);

    let outcome = planner.submit(&paris_trip(false), &keys()).await;
    assert_eq!(outcome.status, SubmissionStatus::Failed);
    assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
    assert_eq!(planner.view().await.itinerary, None);
}

#[tokio::test]
async fn only_the_latest_submission_is_published() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Destination: Rome"))
        .respond_with(gemini_text("ROME PLAN").set_delay(Duration::from_millis(400)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Destination: Oslo"))
        .respond_with(gemini_text("OSLO PLAN"))
        .expect(1)
        .mount(&server)
        .await;
    let planner = planner_for(&server);

    let rome = TripRequest::builder("JFK", "Rome", "2026-06-01", "2026-06-05").build();
    let oslo = TripRequest::builder("JFK", "Oslo", "2026-06-01", "2026-06-05").build();
    let credentials = keys();

    let (first, second) = tokio::join!(planner.submit(&rome, &credentials), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(planner.phase(), Phase::Submitting);
        planner.submit(&oslo, &credentials).await
    });

    assert_eq!(first.ticket, Some(1));
    assert_eq!(first.status, SubmissionStatus::Superseded);
    assert!(first.notices.iter().all(|n| n.level != NoticeLevel::Success));
    assert_eq!(second.ticket, Some(2));
    assert_eq!(second.status, SubmissionStatus::Published);

    assert_eq!(planner.view().await.itinerary.as_deref(), Some("OSLO PLAN"));
    assert_eq!(planner.phase(), Phase::Idle);
}

#[tokio::test]
async fn dropped_submission_returns_to_idle() {
    let server = MockServer::start().await;
    mount_gemini(&server, "X").await;
    let planner = planner_for(&server);
    planner.submit(&paris_trip(false), &keys()).await;
    server.reset().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_text("LATE").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let credentials = keys();
    let request = paris_trip(false);
    let submit = planner.submit(&request, &credentials);
    let timed_out = tokio::time::timeout(Duration::from_millis(200), submit).await;
    assert!(timed_out.is_err());

    assert_eq!(planner.phase(), Phase::Idle);
    assert_eq!(planner.view().await.itinerary.as_deref(), Some("X"));
}
