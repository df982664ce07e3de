//! Report rendering

pub mod formatter;
pub mod report;

pub use report::AnalysisReport;
