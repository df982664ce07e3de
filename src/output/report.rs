//! Analysis report structure

use crate::input::text_extractor::{Extraction, ExtractionSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything rendered for one analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Generated evaluation text, as returned by the model
    pub analysis: String,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub resume_file: String,

    pub resume_chars: usize,

    /// Stage that produced the resume text
    pub extraction_source: ExtractionSource,

    /// Set when an extraction stage failed internally
    pub extraction_degraded: bool,

    pub job_description_provided: bool,

    pub model_used: String,

    pub generated_at: DateTime<Utc>,

    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn new(
        analysis: String,
        resume_file: impl Into<String>,
        extraction: &Extraction,
        job_description_provided: bool,
        model_used: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            analysis,
            metadata: ReportMetadata {
                resume_file: resume_file.into(),
                resume_chars: extraction.text.chars().count(),
                extraction_source: extraction.source,
                extraction_degraded: extraction.degraded,
                job_description_provided,
                model_used: model_used.into(),
                generated_at: Utc::now(),
                processing_time_ms,
            },
        }
    }
}
