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

//! # Trip Request
//!
//! Side-effect free form model: the trip fields, the two per-session
//! credentials, and the checks that gate a submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// API key entered for the current session only. Never persisted, never logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// The key as it must be sent on the wire
    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            f.write_str("Credential(<redacted>)")
        } else {
            f.write_str("Credential(<empty>)")
        }
    }
}

impl From<String> for Credential {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for Credential {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Generative-language API key (Gemini)
    pub generative: Credential,
    /// Flight-search API key (SerpApi), only needed with transportation
    pub flight_search: Credential,
}

impl Credentials {
    pub fn new(generative: impl Into<Credential>, flight_search: impl Into<Credential>) -> Self {
        Self {
            generative: generative.into(),
            flight_search: flight_search.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub include_transportation: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter your Gemini API key to generate a travel plan.")]
    MissingGenerativeKey,
    #[error("Please fill in all required fields ({}).", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid {field}: '{value}'. Use YYYY-MM-DD.")]
    InvalidDate { field: &'static str, value: String },
    #[error("End date ({end}) cannot be before start date ({start}).")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("Invalid {field}: '{value}'.")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Number of travelers must be at least 1.")]
    NoTravelers,
    #[error("Please enter your SerpApi key to include flight options.")]
    MissingFlightSearchKey,
}

impl ValidationError {
    /// Short heading shown above the message
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingGenerativeKey => "API Key Required",
            Self::MissingFields(_) => "Missing Information",
            Self::InvalidDate { .. } | Self::EndBeforeStart { .. } => "Invalid Dates",
            Self::InvalidNumber { .. } | Self::NoTravelers => "Invalid Input",
            Self::MissingFlightSearchKey => "Flight Search Key Required",
        }
    }
}

impl TripRequest {
    pub fn builder(
        source: impl Into<String>,
        destination: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> TripRequestBuilder {
        TripRequestBuilder {
            request: TripRequest {
                source: source.into(),
                destination: destination.into(),
                start_date: start_date.into(),
                end_date: end_date.into(),
                ..Default::default()
            },
        }
    }

    /// Names of the required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("source", &self.source),
            ("destination", &self.destination),
            ("start date", &self.start_date),
            ("end date", &self.end_date),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Parsed travel window. Only meaningful once the fields are non-empty.
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let start = parse_date("start date", &self.start_date)?;
        let end = parse_date("end date", &self.end_date)?;
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok((start, end))
    }

    /// All preconditions for leaving the idle state, checked in order:
    /// generative key, required fields, field formats, flight-search key.
    pub fn validate(&self, credentials: &Credentials) -> Result<(), ValidationError> {
        if !credentials.generative.is_present() {
            return Err(ValidationError::MissingGenerativeKey);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        self.dates()?;

        if self.travelers == Some(0) {
            return Err(ValidationError::NoTravelers);
        }
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(ValidationError::InvalidNumber {
                    field: "budget",
                    value: budget.to_string(),
                });
            }
        }

        if self.include_transportation && !credentials.flight_search.is_present() {
            return Err(ValidationError::MissingFlightSearchKey);
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TripRequestBuilder {
    request: TripRequest,
}

impl TripRequestBuilder {
    pub fn budget(mut self, budget: f64) -> Self {
        self.request.budget = Some(budget);
        self
    }

    pub fn travelers(mut self, travelers: u32) -> Self {
        self.request.travelers = Some(travelers);
        self
    }

    pub fn interests(mut self, interests: impl Into<String>) -> Self {
        self.request.interests = interests.into();
        self
    }

    pub fn include_transportation(mut self, include: bool) -> Self {
        self.request.include_transportation = include;
        self
    }

    pub fn build(self) -> TripRequest {
        self.request
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

/// Parse an optional budget typed into a text field. Blank means "not given".
pub fn parse_budget(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim().trim_start_matches('$').replace(',', "");
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|b| b.is_finite() && *b >= 0.0)
        .map(Some)
        .ok_or(ValidationError::InvalidNumber {
            field: "budget",
            value: raw,
        })
}

/// Parse an optional traveler count typed into a text field.
pub fn parse_travelers(raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(0) => Err(ValidationError::NoTravelers),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ValidationError::InvalidNumber {
            field: "number of travelers",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Credentials {
        Credentials::new("gem-key", "")
    }

    fn paris() -> TripRequest {
        TripRequest::builder("JFK", "CDG", "2026-05-01", "2026-05-08").build()
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let c = Credential::new("super-secret");
        assert_eq!(format!("{:?}", c), "Credential(<redacted>)");
        assert_eq!(format!("{:?}", Credential::default()), "Credential(<empty>)");
        assert!(!Credential::new("   ").is_present());
        assert_eq!(Credential::new(" k ").expose(), "k");
    }

    #[test]
    fn test_generative_key_checked_first() {
        let err = TripRequest::default()
            .validate(&Credentials::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingGenerativeKey);
        assert_eq!(err.title(), "API Key Required");
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut req = paris();
        req.destination = " ".into();
        req.end_date.clear();
        let err = req.validate(&keys()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["destination", "end date"])
        );
        assert_eq!(err.title(), "Missing Information");
    }

    #[test]
    fn test_date_checks() {
        let mut req = paris();
        req.start_date = "05/01/2026".into();
        assert!(matches!(
            req.validate(&keys()),
            Err(ValidationError::InvalidDate { field: "start date", .. })
        ));

        let req = TripRequest::builder("JFK", "CDG", "2026-05-08", "2026-05-01").build();
        assert!(matches!(
            req.validate(&keys()),
            Err(ValidationError::EndBeforeStart { .. })
        ));

        let same_day = TripRequest::builder("JFK", "CDG", "2026-05-08", "2026-05-08").build();
        assert!(same_day.validate(&keys()).is_ok());
    }

    #[test]
    fn test_transportation_needs_second_key() {
        let req = TripRequest::builder("JFK", "CDG", "2026-05-01", "2026-05-08")
            .include_transportation(true)
            .build();
        assert_eq!(
            req.validate(&keys()),
            Err(ValidationError::MissingFlightSearchKey)
        );
        assert!(req.validate(&Credentials::new("a", "b")).is_ok());
    }

    #[test]
    fn test_zero_travelers_rejected() {
        let req = TripRequest::builder("JFK", "CDG", "2026-05-01", "2026-05-08")
            .travelers(0)
            .build();
        assert_eq!(req.validate(&keys()), Err(ValidationError::NoTravelers));
    }

    #[test]
    fn test_parse_form_numbers() {
        assert_eq!(parse_budget("").unwrap(), None);
        assert_eq!(parse_budget(" $2,500 ").unwrap(), Some(2500.0));
        assert!(parse_budget("lots").is_err());
        assert!(parse_budget("-5").is_err());

        assert_eq!(parse_travelers("").unwrap(), None);
        assert_eq!(parse_travelers("3").unwrap(), Some(3));
        assert_eq!(parse_travelers("0"), Err(ValidationError::NoTravelers));
        assert!(parse_travelers("two").is_err());
    }
}
