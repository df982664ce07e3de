//! Input processing module
//! Handles file detection, resume storage, and two-stage text extraction

pub mod file_detector;
pub mod manager;
pub mod ocr;
pub mod text_extractor;

pub use manager::InputManager;
pub use text_extractor::{Extraction, ExtractionSource, PdfExtractor};
