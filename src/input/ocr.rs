//! OCR fallback for image-only PDFs
//!
//! Pages are rendered with `pdftoppm` (poppler-utils) and recognized with the
//! `tesseract` command-line tool, one page at a time.

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub trait OcrEngine {
    /// Render every page of `pdf` into `out_dir`, returning image paths in page order
    fn rasterize(
        &self,
        pdf: &Path,
        out_dir: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;

    /// Recognize the text on a single page image
    fn recognize(&self, image: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct TesseractOcr {
    pdftoppm: String,
    tesseract: String,
    language: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            pdftoppm: config.pdftoppm_path.clone(),
            tesseract: config.tesseract_path.clone(),
            language: config.ocr_language.clone(),
            timeout: Duration::from_secs(config.ocr_timeout_secs),
        }
    }

    async fn run(&self, command: &mut Command, tool: &str, install_hint: &str) -> Result<Output> {
        command.kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(ResumeAnalyzerError::Ocr(
                format!("{} not found (install {})", tool, install_hint),
            )),
            Ok(Err(e)) => Err(ResumeAnalyzerError::Io(e)),
            Err(_) => Err(ResumeAnalyzerError::Ocr(format!(
                "{} timed out after {}s",
                tool,
                self.timeout.as_secs()
            ))),
        }
    }
}

impl OcrEngine for TesseractOcr {
    async fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        // No -r flag: render at pdftoppm's default resolution
        let mut command = Command::new(&self.pdftoppm);
        command.arg("-png").arg(pdf).arg(out_dir.join("page"));

        let output = self.run(&mut command, "pdftoppm", "poppler-utils").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResumeAnalyzerError::Ocr(format!(
                "pdftoppm failed: {}",
                stderr.trim()
            )));
        }

        let images = collect_page_images(out_dir)?;
        debug!("pdftoppm rendered {} pages", images.len());
        Ok(images)
    }

    async fn recognize(&self, image: &Path) -> Result<String> {
        let mut command = Command::new(&self.tesseract);
        command
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language]);

        let output = self.run(&mut command, "tesseract", "tesseract-ocr").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResumeAnalyzerError::Ocr(format!(
                "tesseract failed on {}: {}",
                image.display(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// PNG files in `dir`, sorted by name.
///
/// pdftoppm zero-pads page numbers to a common width (page-01.png ...
/// page-12.png), so lexical order is page order.
pub fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();

    images.sort();
    Ok(images)
}
