//! Prompt construction for resume evaluation

use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use serde::{Deserialize, Serialize};

/// The composed prompt sent to the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub includes_job_description: bool,
}

impl AnalysisRequest {
    pub fn as_str(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the evaluation prompt.
    ///
    /// The resume section always comes first; the comparison section is only
    /// added for a non-blank job description. Both inputs are inserted verbatim.
    pub fn build(&self, resume_text: &str, job_description: Option<&str>) -> Result<AnalysisRequest> {
        if resume_text.trim().is_empty() {
            return Err(ResumeAnalyzerError::MissingInput(
                "Resume text is required for analysis.".to_string(),
            ));
        }

        // Each template is filled separately so placeholder-like text inside
        // the resume is never substituted a second time
        let mut prompt = REVIEW_TEMPLATE.replace("{resume}", resume_text);

        let job_description = job_description.filter(|jd| !jd.trim().is_empty());
        if let Some(jd) = job_description {
            prompt.push_str(&COMPARISON_TEMPLATE.replace("{job}", jd));
        }

        debug!(
            "Built prompt: {} chars (resume {} chars, job description: {})",
            prompt.len(),
            resume_text.len(),
            job_description.is_some()
        );

        Ok(AnalysisRequest {
            prompt,
            includes_job_description: job_description.is_some(),
        })
    }
}

const REVIEW_TEMPLATE: &str = r#"You are an experienced HR with technical expertise in various job roles.
Your task is to review the provided resume and provide insights.

Resume:
{resume}
"#;

const COMPARISON_TEMPLATE: &str = r#"
Compare this resume to the following job description:

Job Description:
{job}
"#;
