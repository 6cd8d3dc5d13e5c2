//! HTML table reports.
//!
//! Vision models sometimes answer with an HTML `<table>` instead of plain
//! lines. Two layouts show up in practice: a two-column `category | amount`
//! table, and a year-comparison table with one amount column per year.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::report::{CategoryAmountRecord, ReportType, TabularReport};

use super::rules::{
    amounts::convert_scaled,
    labels::{LabelRejection, ReservedLabels},
    patterns::{AMOUNT_HEADER_HINTS, DINING_LABEL, MORE_CATEGORIES, PRIOR_YEAR_MARKER, TEN_THOUSAND_UNIT},
};
use super::ParseOutcome;

fn table_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("table").expect("invalid table selector"))
}

fn tr_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("tr").expect("invalid tr selector"))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

/// Read the first `<table>` of an HTML fragment.
///
/// The first row is the header; short rows are padded to the header width.
/// Fails with [`ExtractionError::NoTableFound`] when there is no table or
/// it has no data rows.
pub fn parse_html_table(html: &str) -> Result<TabularReport, ExtractionError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(table_selector())
        .next()
        .ok_or(ExtractionError::NoTableFound)?;

    let mut rows = table.select(tr_selector()).map(|tr| {
        tr.children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| {
                let name = cell.value().name();
                name.eq_ignore_ascii_case("td") || name.eq_ignore_ascii_case("th")
            })
            .map(cell_text)
            .collect::<Vec<_>>()
    });

    let headers = rows.next().ok_or(ExtractionError::NoTableFound)?;
    let data: Vec<Vec<String>> = rows.collect();
    if data.is_empty() {
        return Err(ExtractionError::NoTableFound);
    }

    debug!("Parsed table with {} columns and {} data rows", headers.len(), data.len());

    Ok(TabularReport::new(headers, data))
}

/// Table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableShape {
    /// `category | amount`, optionally with amounts in units of 万.
    TwoColumn { ten_thousand_unit: bool },
    /// `category | year | year | ...`.
    YearComparison,
}

impl TableShape {
    /// Detect the layout from the header row.
    pub fn detect(table: &TabularReport) -> Self {
        if let [_, amount_header] = table.headers.as_slice() {
            if AMOUNT_HEADER_HINTS.iter().any(|hint| amount_header.contains(hint)) {
                return TableShape::TwoColumn {
                    ten_thousand_unit: amount_header.contains(TEN_THOUSAND_UNIT),
                };
            }
        }
        TableShape::YearComparison
    }
}

/// An amount tagged with the column it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAmount {
    pub year: String,
    pub amount: f64,
}

/// A kept table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Sanitized category label.
    pub label: String,

    /// Converted amounts, in column order. Never empty.
    pub amounts: Vec<YearAmount>,
}

impl TableEntry {
    /// The amount with the greatest year label; the leftmost one on ties.
    pub fn representative(&self) -> Option<&YearAmount> {
        self.amounts.iter().fold(None, |best, candidate| match best {
            Some(b) if b.year >= candidate.year => Some(b),
            _ => Some(candidate),
        })
    }
}

/// Extracts category records from tabular reports.
#[derive(Debug, Clone, Default)]
pub struct TableParser {
    reserved: ReservedLabels,
}

impl TableParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reserved aggregate labels.
    pub fn with_reserved_labels(mut self, reserved: ReservedLabels) -> Self {
        self.reserved = reserved;
        self
    }

    /// Parse the first table of an HTML fragment into records.
    pub fn parse_html(&self, html: &str, report_type: ReportType) -> Result<ParseOutcome, ExtractionError> {
        let table = parse_html_table(html)?;
        Ok(self.parse(&table, report_type))
    }

    /// Turn a table into records, one per kept row.
    pub fn parse(&self, table: &TabularReport, report_type: ReportType) -> ParseOutcome {
        let (entries, warnings) = self.entries(table);

        let records = entries
            .into_iter()
            .filter_map(|entry| {
                let amount = entry.representative()?.amount;
                Some(CategoryAmountRecord::new(entry.label, amount, report_type))
            })
            .collect();

        ParseOutcome { records, warnings }
    }

    /// Kept rows with all of their converted amounts, plus warnings.
    pub fn entries(&self, table: &TabularReport) -> (Vec<TableEntry>, Vec<String>) {
        let shape = TableShape::detect(table);
        debug!("Detected table shape {:?}", shape);

        match shape {
            TableShape::TwoColumn { ten_thousand_unit } => self.two_column_entries(table, ten_thousand_unit),
            TableShape::YearComparison => self.year_comparison_entries(table),
        }
    }

    fn two_column_entries(&self, table: &TabularReport, ten_thousand_unit: bool) -> (Vec<TableEntry>, Vec<String>) {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        let column = table.headers[1].clone();

        for row in &table.rows {
            let (label, amount_text) = (row[0].as_str(), row[1].as_str());
            if label.is_empty() || amount_text.is_empty() {
                continue;
            }

            let amount = match convert_scaled(amount_text, ten_thousand_unit) {
                Some(amount) if amount == 0.0 => {
                    debug!("Skipping zero amount for row {:?}", label);
                    continue;
                }
                Some(amount) => amount,
                None => {
                    warn!("Cannot convert amount {:?} for row {:?}, skipping", amount_text, label);
                    warnings.push(format!("unparsable amount {} for {}", amount_text, label));
                    continue;
                }
            };

            if let Some(label) = self.accept_label(label, &mut warnings) {
                entries.push(TableEntry {
                    label,
                    amounts: vec![YearAmount {
                        year: column.clone(),
                        amount,
                    }],
                });
            }
        }

        (entries, warnings)
    }

    fn year_comparison_entries(&self, table: &TabularReport) -> (Vec<TableEntry>, Vec<String>) {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        let start = table
            .rows
            .iter()
            .position(|row| row.first().is_some_and(|c| c == PRIOR_YEAR_MARKER))
            .map_or(0, |idx| idx + 1);

        for row in &table.rows[start..] {
            let Some(label) = row.first().map(String::as_str) else {
                continue;
            };
            if label.is_empty() {
                continue;
            }

            if label == DINING_LABEL && row.last().is_some_and(|c| MORE_CATEGORIES.is_match(c)) {
                debug!("Skipping dining drill-down row");
                continue;
            }

            let amounts: Vec<YearAmount> = row
                .iter()
                .zip(&table.headers)
                .skip(1)
                .filter(|(cell, _)| !cell.is_empty())
                .filter_map(|(cell, year)| {
                    let amount = convert_cell(cell);
                    if amount.is_none() {
                        debug!("Ignoring cell {:?} in column {:?} of row {:?}", cell, year, label);
                    }
                    Some(YearAmount {
                        year: year.clone(),
                        amount: amount?,
                    })
                })
                .collect();

            if amounts.is_empty() {
                debug!("Row {:?} has no amounts", label);
                continue;
            }

            if let Some(label) = self.accept_label(label, &mut warnings) {
                entries.push(TableEntry { label, amounts });
            }
        }

        (entries, warnings)
    }

    fn accept_label(&self, raw: &str, warnings: &mut Vec<String>) -> Option<String> {
        match self.reserved.accept(raw) {
            Ok(label) => Some(label),
            Err(LabelRejection::Reserved(label)) => {
                debug!("Skipping aggregate row {:?}", label);
                None
            }
            Err(LabelRejection::Empty) => {
                warn!("Row label {:?} is empty after cleanup, skipping", raw);
                warnings.push(format!("empty category label in row {}", raw));
                None
            }
        }
    }
}

/// Convert a table cell. Zero amounts count as blank cells.
fn convert_cell(cell: &str) -> Option<f64> {
    convert_scaled(cell, false).filter(|amount| *amount != 0.0)
}
