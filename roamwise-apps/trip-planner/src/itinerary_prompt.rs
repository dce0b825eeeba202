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

//! # Itinerary Prompt
//!
//! Side-effect free pieces of the generative call: the prompt template,
//! the `generateContent` request body, and decoding of its response.

use serde::{Deserialize, Serialize};

use crate::trip_request::TripRequest;

const NOT_SPECIFIED: &str = "Not specified";

const PLAN_SECTIONS: [&str; 10] = [
    "Best time to visit and weather considerations",
    "Recommended accommodations within budget",
    "Must-visit attractions based on interests",
    "Daily itinerary suggestions",
    "Local cuisine recommendations",
    "Transportation options",
    "Budget breakdown",
    "Packing suggestions",
    "Cultural tips and local customs",
    "Emergency contacts and important information",
];

/// Render the fixed planning prompt with every trip field embedded.
pub fn build_prompt(request: &TripRequest) -> String {
    let budget = request
        .budget
        .map(|b| format!("${}", b))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let travelers = request
        .travelers
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let interests = match request.interests.trim() {
        "" => NOT_SPECIFIED,
        s => s,
    };

    let sections = PLAN_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create a detailed travel plan with the following information:\n\
         \n\
         Source: {source}\n\
         Destination: {destination}\n\
         Travel Dates: {start} to {end}\n\
         Budget: {budget}\n\
         Number of Travelers: {travelers}\n\
         Interests: {interests}\n\
         \n\
         Please provide a comprehensive travel itinerary including:\n\
         {sections}\n\
         \n\
         Format the response in a clear, organized manner with headings and bullet points.",
        source = request.source.trim(),
        destination = request.destination.trim(),
        start = request.start_date.trim(),
        end = request.end_date.trim(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if the response has that shape
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// `error.message` from a Google API error body, if present
pub(crate) fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_all_fields() {
        let req = TripRequest::builder("New York, NY", "Paris, France", "2026-05-01", "2026-05-08")
            .budget(2000.0)
            .travelers(2)
            .interests("museums, food tours")
            .build();
        let prompt = build_prompt(&req);
        assert!(prompt.starts_with("Create a detailed travel plan"));
        assert!(prompt.contains("Source: New York, NY\n"));
        assert!(prompt.contains("Destination: Paris, France\n"));
        assert!(prompt.contains("Travel Dates: 2026-05-01 to 2026-05-08\n"));
        assert!(prompt.contains("Budget: $2000\n"));
        assert!(prompt.contains("Number of Travelers: 2\n"));
        assert!(prompt.contains("Interests: museums, food tours\n"));
        assert!(prompt.contains("1. Best time to visit and weather considerations\n"));
        assert!(prompt.contains("10. Emergency contacts and important information\n"));
        assert!(prompt.ends_with("with headings and bullet points."));
    }

    #[test]
    fn test_prompt_optional_fields() {
        let req = TripRequest::builder("SFO", "LHR", "2026-01-01", "2026-01-02").build();
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Budget: Not specified\n"));
        assert!(prompt.contains("Number of Travelers: Not specified\n"));
        assert!(prompt.contains("Interests: Not specified\n"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hi")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_first_text_shapes() {
        let ok: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Day 1"}],"role":"model"},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(ok.first_text(), Some("Day 1"));

        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
        ] {
            let resp: GenerateContentResponse = serde_json::from_str(body).unwrap();
            assert_eq!(resp.first_text(), None, "{}", body);
        }
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body).as_deref(), Some("API key not valid."));
        assert_eq!(api_error_message("Internal Server Error"), None);
    }
}
