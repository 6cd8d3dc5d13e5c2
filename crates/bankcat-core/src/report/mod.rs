//! Category report extraction.

pub mod grammar;
mod parser;
pub mod rules;
pub mod table;

pub use grammar::{BlockPairStrategy, CandidatePair, FallbackStrategy, GrammarParser, PairStrategy};
pub use parser::{InputKind, ReportAnalysis, ReportExtractor};
pub use table::{parse_html_table, TableEntry, TableParser, TableShape, YearAmount};

use crate::error::ExtractionError;
use crate::models::report::{CategoryAmountRecord, ExtractionResult, ReportType};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for category report extractors.
pub trait ReportParser {
    /// Extract records and keep all intermediate stages.
    fn analyze(&self, raw: &str, report_type: ReportType) -> Result<ReportAnalysis>;

    /// Extract records only.
    fn extract(&self, raw: &str, report_type: ReportType) -> Result<ExtractionResult> {
        self.analyze(raw, report_type).map(|a| a.structured_data)
    }
}

/// Records kept by one extraction path, plus the pairs or rows it skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub records: Vec<CategoryAmountRecord>,
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    /// Assemble the final result. Totals are computed from the records.
    pub fn into_result(self, report_type: ReportType) -> ExtractionResult {
        ExtractionResult::from_records(report_type, self.records)
    }
}
