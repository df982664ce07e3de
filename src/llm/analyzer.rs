//! Resume analysis against the remote generation service

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::llm::client::{GeminiClient, TextGenerator};
use crate::llm::prompts::{AnalysisRequest, PromptBuilder};
use log::{debug, info};
use std::time::Instant;

/// Sends evaluation prompts to a fixed model.
///
/// The model and credential are settled when the client is built; each call
/// is a single request with no retry.
pub struct AnalysisClient<G = GeminiClient> {
    generator: G,
    model: String,
    prompt_builder: PromptBuilder,
}

impl AnalysisClient<GeminiClient> {
    /// Resolve the credential from the environment and build a Gemini-backed client
    pub fn from_env(config: &Config) -> Result<Self> {
        let credentials = Credentials::from_env(config)?;
        Self::from_config(config, credentials)
    }

    pub fn from_config(config: &Config, credentials: Credentials) -> Result<Self> {
        let generator = GeminiClient::new(&config.model, credentials)?;
        Ok(Self::new(generator, config.model.name.clone()))
    }
}

impl<G: TextGenerator> AnalysisClient<G> {
    pub fn new(generator: G, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a built request; the generated text comes back trimmed
    pub async fn generate(&self, request: &AnalysisRequest) -> Result<String> {
        let start = Instant::now();
        info!("Requesting analysis from {}", self.model);

        let text = self.generator.generate(request.as_str(), &self.model).await?;

        debug!(
            "Received {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text.trim().to_string())
    }

    /// Build the prompt for `resume_text` and generate the evaluation
    pub async fn analyze(&self, resume_text: &str, job_description: Option<&str>) -> Result<String> {
        let request = self.prompt_builder.build(resume_text, job_description)?;
        self.generate(&request).await
    }
}
