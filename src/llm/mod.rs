//! LLM integration module

pub mod analyzer;
pub mod client;
pub mod prompts;

pub use analyzer::AnalysisClient;
pub use client::{GeminiClient, TextGenerator};
pub use prompts::{AnalysisRequest, PromptBuilder};
