//! Core library for bank category report extraction.
//!
//! This crate provides:
//! - Raw transcription cleanup and label/amount line merging
//! - Category/amount grammar with unit-aware amount conversion
//! - HTML table parsing for two-column and year-comparison reports
//! - A transcription seam for vision models that read report images

pub mod error;
pub mod models;
pub mod report;
pub mod transcribe;

pub use error::{BankcatError, ExtractionError, Result, TranscriptionError};
pub use models::config::{BankcatConfig, ExtractionConfig, TranscriptionConfig};
pub use models::report::{CategoryAmountRecord, ExtractionResult, ReportType, TabularReport};
pub use report::{InputKind, ParseOutcome, ReportAnalysis, ReportExtractor, ReportParser};
pub use transcribe::{ReportAnalyzer, TranscriptionRequest, TranscriptionService};
