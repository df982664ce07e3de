//! Input manager: stores the uploaded resume and reads the job description

use crate::config::Config;
use crate::error::{Result, ResumeAnalyzerError};
use crate::input::file_detector::FileType;
use crate::input::ocr::{OcrEngine, TesseractOcr};
use crate::input::text_extractor::{
    Extraction, MarkdownExtractor, PageTextSource, PdfExtractor, PdfTextLayer, PlainTextExtractor,
    TextExtractor,
};
use log::info;
use std::path::{Path, PathBuf};

pub struct InputManager<S = PdfTextLayer, O = TesseractOcr> {
    resume_slot: PathBuf,
    extractor: PdfExtractor<S, O>,
}

impl InputManager {
    pub fn new(config: &Config) -> Self {
        Self {
            resume_slot: config.resume_slot(),
            extractor: PdfExtractor::new(TesseractOcr::new(&config.extraction)),
        }
    }
}

impl<S: PageTextSource, O: OcrEngine> InputManager<S, O> {
    pub fn with_extractor(resume_slot: PathBuf, extractor: PdfExtractor<S, O>) -> Self {
        Self {
            resume_slot,
            extractor,
        }
    }

    pub fn resume_slot(&self) -> &Path {
        &self.resume_slot
    }

    /// Copy an uploaded resume into the single transient slot, replacing
    /// whatever the previous upload left there.
    pub async fn store_upload(&self, upload: &Path) -> Result<PathBuf> {
        if !upload.exists() {
            return Err(ResumeAnalyzerError::InvalidInput(format!(
                "File does not exist: {}",
                upload.display()
            )));
        }

        if FileType::from_path(upload) != FileType::Pdf {
            return Err(ResumeAnalyzerError::UnsupportedFormat(format!(
                "Resume must be a PDF: {}",
                upload.display()
            )));
        }

        if let Some(parent) = self.resume_slot.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Copying a file onto itself truncates it before it is read
        if self.is_slot(upload).await {
            info!("Upload is already in the slot: {}", self.resume_slot.display());
            return Ok(self.resume_slot.clone());
        }

        let bytes = tokio::fs::copy(upload, &self.resume_slot).await?;
        info!(
            "Stored {} ({} bytes) at {}",
            upload.display(),
            bytes,
            self.resume_slot.display()
        );

        Ok(self.resume_slot.clone())
    }

    async fn is_slot(&self, path: &Path) -> bool {
        match (
            tokio::fs::canonicalize(path).await,
            tokio::fs::canonicalize(&self.resume_slot).await,
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Extract resume text. Never fails; see [`PdfExtractor`].
    pub async fn extract_resume(&self, path: &Path) -> Extraction {
        info!("Extracting text from PDF: {}", path.display());
        self.extractor.extract_detailed(path).await
    }

    /// Read a job description file (plain text or markdown)
    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeAnalyzerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Pdf | FileType::Unknown => Err(ResumeAnalyzerError::UnsupportedFormat(
                format!("Unsupported job description file: {}", path.display()),
            )),
        }
    }

    /// Resolve the optional job description from either a file or inline text.
    ///
    /// Blank descriptions are treated as absent.
    pub async fn job_description(
        &self,
        file: Option<&Path>,
        text: Option<&str>,
    ) -> Result<Option<String>> {
        let description = match (file, text) {
            (Some(_), Some(_)) => {
                return Err(ResumeAnalyzerError::InvalidInput(
                    "Provide the job description either as a file or as text, not both".to_string(),
                ))
            }
            (Some(path), None) => Some(self.read_job_description(path).await?),
            (None, Some(text)) => Some(text.to_string()),
            (None, None) => None,
        };

        Ok(description.filter(|d| !d.trim().is_empty()))
    }
}
