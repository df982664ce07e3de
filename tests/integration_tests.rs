//! Integration tests for the resume analyzer

use resume_analyzer::config::Config;
use resume_analyzer::error::{Result, ResumeAnalyzerError};
use resume_analyzer::input::ocr::{OcrEngine, TesseractOcr};
use resume_analyzer::input::text_extractor::{PageTextSource, PdfExtractor, PdfTextLayer};
use resume_analyzer::input::{ExtractionSource, InputManager};
use resume_analyzer::llm::{AnalysisClient, TextGenerator};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const RESUME_TEXT: &str = "Experienced engineer with 5 years in backend systems.";

/// Text layer returning fixed pages, or failing like an unreadable document
enum FakeTextLayer {
    Pages(Vec<&'static str>),
    Broken,
}

impl PageTextSource for FakeTextLayer {
    async fn page_texts(&self, _path: &Path) -> Result<Vec<String>> {
        match self {
            FakeTextLayer::Pages(pages) => Ok(pages.iter().map(|p| p.to_string()).collect()),
            FakeTextLayer::Broken => Err(ResumeAnalyzerError::PdfExtraction(
                "invalid cross-reference table".to_string(),
            )),
        }
    }
}

/// OCR engine recognizing one fixed string per page
struct FakeOcr {
    pages: Vec<&'static str>,
    fail_on_page: Option<usize>,
    rasterize_calls: Arc<AtomicUsize>,
    recognized: AtomicUsize,
}

impl FakeOcr {
    fn new(pages: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let ocr = Self {
            pages,
            fail_on_page: None,
            rasterize_calls: Arc::clone(&calls),
            recognized: AtomicUsize::new(0),
        };
        (ocr, calls)
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }
}

impl OcrEngine for FakeOcr {
    async fn rasterize(&self, _pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        self.rasterize_calls.fetch_add(1, Ordering::SeqCst);
        Ok((1..=self.pages.len())
            .map(|i| out_dir.join(format!("page-{:02}.png", i)))
            .collect())
    }

    async fn recognize(&self, _image: &Path) -> Result<String> {
        let index = self.recognized.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_page == Some(index) {
            return Err(ResumeAnalyzerError::Ocr("tesseract crashed".to_string()));
        }
        Ok(self.pages[index].to_string())
    }
}

/// Generator that records every prompt it receives
#[derive(Clone, Default)]
struct RecordingGenerator {
    prompts: Arc<Mutex<Vec<String>>>,
}

impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str, _model: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("  The candidate shows solid backend experience.\n".to_string())
    }
}

#[tokio::test]
async fn test_text_layer_wins_and_ocr_is_skipped() {
    let (ocr, ocr_calls) = FakeOcr::new(vec!["should not be used"]);
    let extractor = PdfExtractor::with_stages(
        FakeTextLayer::Pages(vec!["  Jane Doe\n", "Backend Engineer  \n"]),
        ocr,
    );

    let extraction = extractor.extract_detailed(Path::new("resume.pdf")).await;

    assert_eq!(extraction.text, "Jane Doe\nBackend Engineer");
    assert_eq!(extraction.source, ExtractionSource::Structured);
    assert!(!extraction.degraded);
    assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pages_are_joined_without_separator() {
    let (ocr, _) = FakeOcr::new(vec![]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Pages(vec!["Rust", "acean"]), ocr);

    assert_eq!(extractor.extract_text(Path::new("resume.pdf")).await, "Rustacean");
}

#[tokio::test]
async fn test_blank_text_layer_falls_back_to_ocr() {
    let (ocr, ocr_calls) = FakeOcr::new(vec!["Jane Doe", "Backend Engineer"]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Pages(vec!["   ", "\n"]), ocr);

    let extraction = extractor.extract_detailed(Path::new("scanned.pdf")).await;

    assert_eq!(extraction.text, "Jane Doe\nBackend Engineer");
    assert_eq!(extraction.source, ExtractionSource::Ocr);
    assert!(!extraction.degraded);
    assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_text_layer_falls_back_to_ocr() {
    let (ocr, _) = FakeOcr::new(vec![RESUME_TEXT]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Broken, ocr);

    let extraction = extractor.extract_detailed(Path::new("scanned.pdf")).await;

    assert_eq!(extraction.text, RESUME_TEXT);
    assert_eq!(extraction.source, ExtractionSource::Ocr);
    assert!(extraction.degraded);
}

#[tokio::test]
async fn test_both_stages_empty_yield_empty_text() {
    let (ocr, _) = FakeOcr::new(vec!["  ", "\n\n"]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Pages(vec![]), ocr);

    let extraction = extractor.extract_detailed(Path::new("blank.pdf")).await;

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.source, ExtractionSource::Empty);
    assert!(!extraction.degraded);
}

#[tokio::test]
async fn test_zero_pages_yield_empty_text() {
    let (ocr, _) = FakeOcr::new(vec![]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Pages(vec![]), ocr);

    assert_eq!(extractor.extract_text(Path::new("empty.pdf")).await, "");
}

#[tokio::test]
async fn test_ocr_failure_keeps_recognized_pages() {
    let (ocr, _) = FakeOcr::new(vec!["Page one", "Page two", "Page three"]);
    let extractor = PdfExtractor::with_stages(FakeTextLayer::Broken, ocr.failing_on(1));

    let extraction = extractor.extract_detailed(Path::new("scanned.pdf")).await;

    assert_eq!(extraction.text, "Page one");
    assert!(extraction.degraded);
}

#[tokio::test]
async fn test_unopenable_document_yields_empty_text() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("corrupt.pdf");
    std::fs::write(&path, b"this is not a pdf at all").unwrap();

    let config = Config::default();
    let extractor = PdfExtractor::new(TesseractOcr::new(&config.extraction));
    let extraction = extractor.extract_detailed(&path).await;

    assert_eq!(extraction.text, "");
    assert_eq!(extraction.source, ExtractionSource::Empty);
    assert!(extraction.degraded);
}

#[tokio::test]
async fn test_missing_document_yields_empty_text() {
    let config = Config::default();
    let extractor = PdfExtractor::new(TesseractOcr::new(&config.extraction));

    let text = extractor
        .extract_text(Path::new("tests/fixtures/nonexistent.pdf"))
        .await;
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_text_layer_of_real_pdf() {
    let (ocr, ocr_calls) = FakeOcr::new(vec!["should not be used"]);
    let extractor = PdfExtractor::with_stages(PdfTextLayer, ocr);

    let extraction = extractor
        .extract_detailed(Path::new("tests/fixtures/text_resume.pdf"))
        .await;

    assert_eq!(extraction.text, RESUME_TEXT);
    assert_eq!(extraction.source, ExtractionSource::Structured);
    assert!(!extraction.degraded);
    assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_real_pdf_with_default_extractor() {
    let config = Config::default();
    let extractor = PdfExtractor::new(TesseractOcr::new(&config.extraction));

    let text = extractor
        .extract_text(Path::new("tests/fixtures/text_resume.pdf"))
        .await;
    assert_eq!(text, RESUME_TEXT);
}

fn manager_in(temp: &TempDir, layer: FakeTextLayer) -> InputManager<FakeTextLayer, FakeOcr> {
    let (ocr, _) = FakeOcr::new(vec![]);
    InputManager::with_extractor(
        temp.path().join("slot").join("resume.pdf"),
        PdfExtractor::with_stages(layer, ocr),
    )
}

#[tokio::test]
async fn test_upload_overwrites_single_slot() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let first = temp.path().join("first.pdf");
    let second = temp.path().join("second.pdf");
    std::fs::write(&first, b"%PDF-1.4 first").unwrap();
    std::fs::write(&second, b"%PDF-1.4 second").unwrap();

    let slot_a = manager.store_upload(&first).await.unwrap();
    let slot_b = manager.store_upload(&second).await.unwrap();

    assert_eq!(slot_a, slot_b);
    assert_eq!(slot_b, manager.resume_slot());
    assert_eq!(std::fs::read(&slot_b).unwrap(), b"%PDF-1.4 second");
}

#[tokio::test]
async fn test_upload_of_slot_onto_itself_keeps_document() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let slot = manager.resume_slot().to_path_buf();
    std::fs::create_dir_all(slot.parent().unwrap()).unwrap();
    std::fs::write(&slot, b"%PDF-1.4 original").unwrap();

    let stored = manager.store_upload(&slot).await.unwrap();

    assert_eq!(stored, slot);
    assert_eq!(std::fs::read(&slot).unwrap(), b"%PDF-1.4 original");
}

#[tokio::test]
async fn test_upload_rejects_missing_and_non_pdf() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let err = manager
        .store_upload(Path::new("tests/fixtures/nonexistent.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InvalidInput(_)));

    let err = manager
        .store_upload(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_job_description_sources() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let from_txt = manager
        .job_description(Some(Path::new("tests/fixtures/sample_job.txt")), None)
        .await
        .unwrap()
        .unwrap();
    assert!(from_txt.contains("Senior Backend Engineer"));

    let from_md = manager
        .job_description(Some(Path::new("tests/fixtures/sample_job.md")), None)
        .await
        .unwrap()
        .unwrap();
    assert!(from_md.contains("5+ years"));
    assert!(!from_md.contains("**"));
    assert!(!from_md.contains('#'));

    let inline = manager.job_description(None, Some("Go developer")).await.unwrap();
    assert_eq!(inline.as_deref(), Some("Go developer"));

    assert!(manager.job_description(None, None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_blank_job_description_is_absent() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let blank_file = manager
        .job_description(Some(Path::new("tests/fixtures/blank_job.txt")), None)
        .await
        .unwrap();
    assert!(blank_file.is_none());

    let blank_text = manager.job_description(None, Some("  \n")).await.unwrap();
    assert!(blank_text.is_none());
}

#[tokio::test]
async fn test_job_description_file_and_text_conflict() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![]));

    let err = manager
        .job_description(Some(Path::new("tests/fixtures/sample_job.txt")), Some("Go developer"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_end_to_end_without_job_description() {
    let temp = TempDir::new().unwrap();
    let upload = temp.path().join("resume.pdf");
    std::fs::write(&upload, b"%PDF-1.4").unwrap();

    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![RESUME_TEXT]));
    let generator = RecordingGenerator::default();
    let client = AnalysisClient::new(generator.clone(), "gemini-2.0-flash");

    let slot = manager.store_upload(&upload).await.unwrap();
    let extraction = manager.extract_resume(&slot).await;
    let job = manager.job_description(None, None).await.unwrap();
    let result = client.analyze(&extraction.text, job.as_deref()).await.unwrap();

    assert!(!result.is_empty());
    assert_eq!(result, "The candidate shows solid backend experience.");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(RESUME_TEXT));
    assert!(!prompts[0].contains("Job Description:"));
}

#[tokio::test]
async fn test_end_to_end_with_job_description() {
    let temp = TempDir::new().unwrap();
    let upload = temp.path().join("resume.pdf");
    std::fs::write(&upload, b"%PDF-1.4").unwrap();

    let manager = manager_in(&temp, FakeTextLayer::Pages(vec![RESUME_TEXT]));
    let generator = RecordingGenerator::default();
    let client = AnalysisClient::new(generator.clone(), "gemini-2.0-flash");

    let slot = manager.store_upload(&upload).await.unwrap();
    let extraction = manager.extract_resume(&slot).await;
    let job = manager
        .job_description(Some(Path::new("tests/fixtures/sample_job.txt")), None)
        .await
        .unwrap();
    client.analyze(&extraction.text, job.as_deref()).await.unwrap();

    let prompts = generator.prompts.lock().unwrap();
    let prompt = &prompts[0];
    let resume_at = prompt.find(RESUME_TEXT).unwrap();
    let job_at = prompt.find("Job Description:").unwrap();
    assert!(resume_at < job_at);
    assert!(prompt.contains("distributed backend systems"));
}

#[tokio::test]
async fn test_empty_extraction_is_rejected_before_generation() {
    let temp = TempDir::new().unwrap();
    let manager = manager_in(&temp, FakeTextLayer::Broken);
    let generator = RecordingGenerator::default();
    let client = AnalysisClient::new(generator.clone(), "gemini-2.0-flash");

    let extraction = manager.extract_resume(Path::new("scanned.pdf")).await;
    assert_eq!(extraction.text, "");

    let err = client
        .analyze(&extraction.text, Some("Backend role"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::MissingInput(_)));
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[test]
fn test_missing_credential_fails_at_construction() {
    let mut config = Config::default();
    config.model.api_key_env = "RESUME_ANALYZER_INTEGRATION_UNSET_KEY".to_string();

    let err = AnalysisClient::from_env(&config).err().unwrap();
    assert!(matches!(err, ResumeAnalyzerError::Configuration(_)));
}
