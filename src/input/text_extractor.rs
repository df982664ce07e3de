//! Text extraction from resumes and job descriptions

use crate::error::{Result, ResumeAnalyzerError};
use crate::input::ocr::{OcrEngine, TesseractOcr};
use log::{debug, info, warn};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Source of the embedded text layer of a paginated document
pub trait PageTextSource {
    /// Text of every page, in document order
    fn page_texts(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

/// Reads the text layer with `pdf-extract`
pub struct PdfTextLayer;

impl PageTextSource for PdfTextLayer {
    async fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).await?;
        let display = path.display().to_string();

        // pdf-extract may panic on malformed input; a panic in the blocking
        // task comes back as a JoinError and is reported like any other failure
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| {
            ResumeAnalyzerError::PdfExtraction(format!("Parser aborted on '{}': {}", display, e))
        })?
        .map_err(|e| {
            ResumeAnalyzerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                display, e
            ))
        })
    }
}

/// Which stage produced the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionSource {
    Structured,
    Ocr,
    Empty,
}

impl std::fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionSource::Structured => write!(f, "text layer"),
            ExtractionSource::Ocr => write!(f, "OCR"),
            ExtractionSource::Empty => write!(f, "none"),
        }
    }
}

/// Result of a resume extraction.
///
/// `degraded` is set when a stage failed internally, which lets callers tell
/// an empty resume apart from a failed extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub text: String,
    pub source: ExtractionSource,
    pub degraded: bool,
}

/// Two-stage PDF extractor: text layer first, OCR only when that yields nothing.
///
/// Never fails. Errors in either stage are logged and count as empty text.
pub struct PdfExtractor<S = PdfTextLayer, O = TesseractOcr> {
    text_layer: S,
    ocr: O,
}

impl<O: OcrEngine> PdfExtractor<PdfTextLayer, O> {
    pub fn new(ocr: O) -> Self {
        Self::with_stages(PdfTextLayer, ocr)
    }
}

impl<S: PageTextSource, O: OcrEngine> PdfExtractor<S, O> {
    pub fn with_stages(text_layer: S, ocr: O) -> Self {
        Self { text_layer, ocr }
    }

    /// Best-effort plain text of the document, trimmed
    pub async fn extract_text(&self, path: &Path) -> String {
        self.extract_detailed(path).await.text
    }

    pub async fn extract_detailed(&self, path: &Path) -> Extraction {
        let mut degraded = false;

        match self.text_layer.page_texts(path).await {
            Ok(pages) => {
                debug!("Text layer returned {} pages", pages.len());
                let text: String = pages.concat();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Extraction {
                        text: trimmed.to_string(),
                        source: ExtractionSource::Structured,
                        degraded,
                    };
                }
            }
            Err(e) => {
                warn!("Direct text extraction failed: {}", e);
                degraded = true;
            }
        }

        info!("Falling back to OCR for image-based PDF: {}", path.display());
        let mut text = String::new();
        if let Err(e) = self.ocr_pages(path, &mut text).await {
            warn!("OCR failed: {}", e);
            degraded = true;
        }

        let trimmed = text.trim();
        let source = if trimmed.is_empty() {
            ExtractionSource::Empty
        } else {
            ExtractionSource::Ocr
        };

        Extraction {
            text: trimmed.to_string(),
            source,
            degraded,
        }
    }

    /// Appends each recognized page followed by a newline. Pages recognized
    /// before a failure stay in `text`.
    async fn ocr_pages(&self, path: &Path, text: &mut String) -> Result<()> {
        let scratch = tempfile::tempdir()?;
        let images = self.ocr.rasterize(path, scratch.path()).await?;
        info!("Rendered {} pages, starting OCR", images.len());

        for (i, image) in images.iter().enumerate() {
            let page_text = self.ocr.recognize(image).await?;
            debug!("OCR page {}: {} chars", i + 1, page_text.len());
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

fn html_tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern is valid"))
}

/// Flatten markdown to plain text lines
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ");

    let clean_text = html_tag_regex().replace_all(&text, "");

    // Entities last so escaped angle brackets are not taken for tags
    let clean_text = clean_text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<String> = clean_text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}
