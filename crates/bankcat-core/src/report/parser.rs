//! Entry point that routes raw transcriptions to the text or table extractor.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::report::{ExtractionResult, ReportType};

use super::grammar::GrammarParser;
use super::rules::{labels::ReservedLabels, merge::merge_lines, normalize::normalize_lines, patterns::TABLE_START};
use super::table::TableParser;
use super::{ParseOutcome, ReportParser, Result};

/// What kind of content a transcription holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Free-form lines of categories and amounts.
    Text,
    /// An HTML fragment with a `<table>`.
    Table,
}

impl InputKind {
    /// Classify raw input by looking for a table start tag.
    pub fn sniff(raw: &str) -> Self {
        if raw.to_ascii_lowercase().contains(TABLE_START) {
            InputKind::Table
        } else {
            InputKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Table => "table",
        }
    }
}

/// Extraction result with every intermediate stage kept for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAnalysis {
    /// Input as received.
    pub raw_content: String,
    /// Normalized lines joined with newlines. Same as the raw content for tables.
    pub cleaned_content: String,
    /// Merged lines joined with newlines. Same as the raw content for tables.
    pub merged_content: String,
    /// Extracted records.
    pub structured_data: ExtractionResult,
    /// Path that produced the records.
    pub source: InputKind,
    /// Skipped pairs and rows.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Processing timer. Reads zero on wasm32, where `Instant::now` panics.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
}

impl Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    fn start() -> Self {
        Self { start: Instant::now() }
    }

    #[cfg(target_arch = "wasm32")]
    fn start() -> Self {
        Self {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> u64 {
        0
    }
}

/// Routes input to the text pipeline or the table parser.
pub struct ReportExtractor {
    grammar: GrammarParser,
    table: TableParser,
    table_fallback_to_text: bool,
}

impl ReportExtractor {
    /// Create an extractor with default reserved labels and table fallback.
    pub fn new() -> Self {
        Self {
            grammar: GrammarParser::new(),
            table: TableParser::new(),
            table_fallback_to_text: true,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_reserved_labels(ReservedLabels::new(&config.reserved_labels))
            .with_table_fallback(config.table_fallback_to_text)
    }

    /// Set the reserved aggregate labels for both paths.
    pub fn with_reserved_labels(mut self, reserved: ReservedLabels) -> Self {
        self.grammar = self.grammar.with_reserved_labels(reserved.clone());
        self.table = self.table.with_reserved_labels(reserved);
        self
    }

    /// Whether table input without data rows goes through the text pipeline.
    pub fn with_table_fallback(mut self, enabled: bool) -> Self {
        self.table_fallback_to_text = enabled;
        self
    }

    /// Run the text pipeline: normalize, merge, parse.
    pub fn extract_text(&self, raw: &str, report_type: ReportType) -> ExtractionResult {
        self.text_stages(raw, report_type).2.into_result(report_type)
    }

    /// Re-extract `raw` and keep only the records at `indices`.
    ///
    /// Extraction is deterministic, so indices shown to a reviewer for the
    /// same content stay valid.
    pub fn confirm(&self, raw: &str, report_type: ReportType, indices: &[usize]) -> Result<ExtractionResult> {
        Ok(self.extract(raw, report_type)?.select(indices))
    }

    fn text_stages(&self, raw: &str, report_type: ReportType) -> (Vec<String>, Vec<String>, ParseOutcome) {
        let cleaned = normalize_lines(raw);
        let merged = merge_lines(&cleaned);
        debug!("Normalized {} lines, merged into {}", cleaned.len(), merged.len());

        let outcome = self.grammar.parse_lines(&merged, report_type);
        (cleaned, merged, outcome)
    }
}

impl Default for ReportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser for ReportExtractor {
    fn analyze(&self, raw: &str, report_type: ReportType) -> Result<ReportAnalysis> {
        let timer = Stopwatch::start();
        let mut source = InputKind::sniff(raw);
        let mut warnings = Vec::new();

        info!("Extracting {} report from {} characters of {:?} input", report_type, raw.len(), source);

        if source == InputKind::Table {
            match self.table.parse_html(raw, report_type) {
                Ok(outcome) => {
                    warnings.extend(outcome.warnings.iter().cloned());
                    let structured_data = outcome.into_result(report_type);
                    debug!("Table yielded {} categories", structured_data.category_count);

                    return Ok(ReportAnalysis {
                        raw_content: raw.to_string(),
                        cleaned_content: raw.to_string(),
                        merged_content: raw.to_string(),
                        structured_data,
                        source,
                        warnings,
                        processing_time_ms: timer.elapsed_ms(),
                    });
                }
                Err(ExtractionError::NoTableFound) if self.table_fallback_to_text => {
                    warn!("Table marker present but no table rows found, using text pipeline");
                    warnings.push("no table found, parsed as text".to_string());
                    source = InputKind::Text;
                }
                Err(e) => return Err(e),
            }
        }

        let (cleaned, merged, outcome) = self.text_stages(raw, report_type);
        warnings.extend(outcome.warnings.iter().cloned());
        let structured_data = outcome.into_result(report_type);

        debug!("Text yielded {} categories", structured_data.category_count);

        Ok(ReportAnalysis {
            raw_content: raw.to_string(),
            cleaned_content: cleaned.join("\n"),
            merged_content: merged.join("\n"),
            structured_data,
            source,
            warnings,
            processing_time_ms: timer.elapsed_ms(),
        })
    }
}
