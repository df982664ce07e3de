//! Resume analyzer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;

pub use config::{Config, Credentials};
pub use error::{Result, ResumeAnalyzerError};
