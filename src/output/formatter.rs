//! Output formatters for console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::AnalysisReport;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let meta = &report.metadata;
        let mut out = String::new();

        out.push_str(&self.heading("📋 Resume Analysis"));
        out.push('\n');
        out.push_str(&self.dim(&format!(
            "Resume: {} ({} chars via {}) | Job description: {} | Model: {}",
            meta.resume_file,
            meta.resume_chars,
            meta.extraction_source,
            if meta.job_description_provided { "yes" } else { "no" },
            meta.model_used
        )));
        out.push_str("\n\n");
        out.push_str(&report.analysis);
        out.push_str("\n\n");
        out.push_str(&self.dim("---"));
        out.push('\n');
        out.push_str(&self.dim(&format!(
            "powered by Google Gemini AI · {}ms",
            meta.processing_time_ms
        )));
        out.push('\n');

        Ok(out)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let meta = &report.metadata;
        let mut out = String::from("# Resume Analysis\n\n");

        if self.include_metadata {
            out.push_str("| Field | Value |\n|---|---|\n");
            out.push_str(&format!("| Resume | `{}` |\n", meta.resume_file));
            out.push_str(&format!("| Text source | {} |\n", meta.extraction_source));
            out.push_str(&format!(
                "| Job description | {} |\n",
                if meta.job_description_provided { "provided" } else { "not provided" }
            ));
            out.push_str(&format!("| Model | {} |\n", meta.model_used));
            out.push_str(&format!(
                "| Generated | {} |\n\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        out.push_str(&report.analysis);
        out.push('\n');
        Ok(out)
    }
}

/// Render a report in the requested format
pub fn render(report: &AnalysisReport, format: OutputFormat, use_colors: bool) -> Result<String> {
    match format {
        OutputFormat::Console => ConsoleFormatter::new(use_colors).format_report(report),
        OutputFormat::Json => JsonFormatter::new(true).format_report(report),
        OutputFormat::Markdown => MarkdownFormatter::new(true).format_report(report),
    }
}

/// Write a rendered report to disk
pub fn save_report(rendered: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
