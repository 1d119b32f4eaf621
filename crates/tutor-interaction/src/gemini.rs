//! Direct REST implementation of the model gateway for Gemini.
//!
//! Calls the Gemini `generateContent` API with a bounded per-request
//! timeout. Each call is independent; a failure surfaces as
//! `ModelUnavailable` and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tutor_core::config::TutorConfig;
use tutor_core::error::{Result, TutorError};

use crate::gateway::{ImageData, ModelGateway};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiGateway {
    /// Creates a gateway from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the HTTP client cannot be constructed.
    pub fn new(config: &TutorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TutorError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    async fn send_request(&self, parts: Vec<Part>) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        };

        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        debug!("[GeminiGateway] sending generateContent request to {}", self.model);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| TutorError::model_unavailable(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            TutorError::model_unavailable(format!("failed to parse response: {err}"))
        })?;

        first_candidate_text(parsed)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.send_request(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }

    async fn generate_from_image(&self, prompt: &str, image: &ImageData) -> Result<String> {
        self.send_request(vec![
            Part::Text {
                text: prompt.to_string(),
            },
            Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type().to_string(),
                    data: BASE64_STANDARD.encode(image.data()),
                },
            },
        ])
        .await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn first_candidate_text(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            TutorError::model_unavailable("the API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: String) -> TutorError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    TutorError::model_unavailable_with_status(status.as_u16(), message)
}
