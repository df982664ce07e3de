//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub extraction: ExtractionConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub api_base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub ocr_language: String,
    /// Per-subprocess limit; an expired OCR step counts as a failed stage
    pub ocr_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the single transient resume slot
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub show_resume_preview: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let work_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("resume-analyzer");

        Self {
            model: ModelConfig {
                name: DEFAULT_MODEL.to_string(),
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                request_timeout_secs: 120,
            },
            extraction: ExtractionConfig {
                pdftoppm_path: "pdftoppm".to_string(),
                tesseract_path: "tesseract".to_string(),
                ocr_language: "eng".to_string(),
                ocr_timeout_secs: 120,
            },
            storage: StorageConfig { work_dir },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                show_resume_preview: false,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ResumeAnalyzerError::Configuration(format!(
                    "Failed to parse config '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    /// Fixed location the uploaded resume is copied to for the duration of a request
    pub fn resume_slot(&self) -> PathBuf {
        self.storage.work_dir.join("resume.pdf")
    }
}

/// Credential for the remote generation service, resolved once at startup
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Read the API key from the environment (and `.env`, if present).
    ///
    /// A missing or blank key is a configuration error so that it is reported
    /// before any request is processed.
    pub fn from_env(config: &Config) -> Result<Self> {
        if let Some(problem) = dotenv_problem(dotenvy::dotenv()) {
            warn!("Ignoring .env file: {}", problem);
        }

        let var = &config.model.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self {
                api_key: key.trim().to_string(),
            }),
            _ => Err(ResumeAnalyzerError::Configuration(format!(
                "API key is missing: set {} in the environment or a .env file",
                var
            ))),
        }
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// A missing .env file is fine since the variable may be set directly;
/// anything else (unreadable, malformed) is worth reporting
fn dotenv_problem<T>(loaded: dotenvy::Result<T>) -> Option<String> {
    match loaded {
        Err(e) if !e.not_found() => Some(e.to_string()),
        _ => None,
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
