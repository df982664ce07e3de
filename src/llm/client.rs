//! Remote text generation
//!
//! `TextGenerator` is the single-shot prompt -> text capability the analyzer
//! depends on. `GeminiClient` implements it on top of the Gemini
//! `generateContent` REST endpoint.

use crate::config::{Credentials, ModelConfig};
use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub trait TextGenerator {
    fn generate(
        &self,
        prompt: &str,
        model: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                ResumeAnalyzerError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("POST {} ({} prompt chars)", self.endpoint(model), prompt.len());

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.credentials.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ResumeAnalyzerError::RemoteService(format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        parse_generate_response(&body)
    }
}

/// Pull the generated text out of a `generateContent` response body.
///
/// Text parts of the first candidate are concatenated.
pub fn parse_generate_response(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        ResumeAnalyzerError::RemoteService(format!("Failed to parse response: {}", e))
    })?;

    if let Some(error) = response.error {
        return Err(ResumeAnalyzerError::RemoteService(format!(
            "Gemini API error: {}",
            error.message
        )));
    }

    let parts = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        return Err(ResumeAnalyzerError::RemoteService(
            "No text in Gemini response".to_string(),
        ));
    }

    Ok(text)
}
