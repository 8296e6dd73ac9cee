//! Receipt text extraction.
//!
//! Turns OCR output into a candidate expense. Extraction never fails: when
//! there is no usable text, a simulated receipt is produced instead.
//!
//! # Modules
//!
//! - `types` - OCR output and the extracted draft
//! - `patterns` - Compiled amount and date patterns, keyword table
//! - `extractor` - Line-by-line parsing
//! - `simulation` - Randomized fallback receipts

pub mod extractor;
pub mod patterns;
pub mod simulation;
pub mod types;

pub use extractor::ReceiptExtractor;
pub use types::{OcrOutput, ReceiptDraft};
