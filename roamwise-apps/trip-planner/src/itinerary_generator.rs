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

//! # Itinerary Generator
//!
//! Effectful (network) call to the generative-language `generateContent`
//! endpoint. Its failure is the only one that aborts a submission.

use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::{PlannerConfig, join_url};
use crate::itinerary_prompt::{
    GenerateContentRequest, GenerateContentResponse, api_error_message, build_prompt,
};
use crate::trip_request::{Credential, TripRequest};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Request to the generative API failed: {0}")]
    Transport(#[source] wreq::Error),
    #[error("API Error: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Invalid JSON from the generative API: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Invalid response format from the generative API")]
    UnexpectedShape,
}

#[derive(Clone)]
pub struct GenerativeClient {
    client: Arc<wreq::Client>,
    base_url: String,
    model: String,
}

impl GenerativeClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = wreq::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &PlannerConfig) -> anyhow::Result<Self> {
        Self::new(
            config.generative_base_url.clone(),
            config.generative_model.clone(),
            config.timeout(),
        )
    }

    fn endpoint(&self) -> String {
        join_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        )
    }

    pub async fn generate_text(
        &self,
        prompt: &str,
        credential: &Credential,
    ) -> Result<String, GenerationError> {
        let endpoint = self.endpoint();
        let url = format!("{}?key={}", endpoint, urlencoding::encode(credential.expose()));
        tracing::info!("Generating itinerary with {} ({} chars of prompt)", self.model, prompt.len());
        tracing::debug!("POST {}?key=***", endpoint);

        let http_start = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GenerationError::Transport)?;
        tracing::debug!(
            "Generative API answered {} in {:?} ({} KB)",
            status.as_u16(),
            http_start.elapsed(),
            body.len() / 1024
        );

        if !status.is_success() {
            let reason = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            tracing::error!("Generative API error {}: {}", status.as_u16(), reason);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_str(&body).map_err(GenerationError::Decode)?;
        match decoded.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                let finish = decoded
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .unwrap_or("none");
                tracing::warn!(
                    "Generative response had no candidate text ({} candidates, finish reason {})",
                    decoded.candidates.len(),
                    finish
                );
                Err(GenerationError::UnexpectedShape)
            }
        }
    }

    /// Prompt the model with the trip and return the first candidate's text.
    pub async fn generate_itinerary(
        &self,
        request: &TripRequest,
        credential: &Credential,
    ) -> Result<String, GenerationError> {
        self.generate_text(&build_prompt(request), credential).await
    }
}
