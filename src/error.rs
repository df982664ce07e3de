//! Error handling for the resume analyzer application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured (text layer) extraction failed. Absorbed by the extractor.
    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    /// Rasterization or recognition failed. Absorbed by the extractor.
    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAnalyzerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeAnalyzerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeAnalyzerError::OutputFormatting(format!("{:#}", err))
    }
}

/// Transport failures from the HTTP client surface as remote service errors
impl From<reqwest::Error> for ResumeAnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        ResumeAnalyzerError::RemoteService(err.to_string())
    }
}
