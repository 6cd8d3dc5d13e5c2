//! Category report data models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Whether a report lists income or expense categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Income categories (salary, interest, ...).
    Income,
    /// Expense categories (dining, transport, ...).
    #[default]
    Expense,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Income => "income",
            ReportType::Expense => "expense",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(ReportType::Income),
            "expense" => Ok(ReportType::Expense),
            other => Err(ExtractionError::InvalidReportType(other.to_string())),
        }
    }
}

/// One category with its amount, as read from a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmountRecord {
    /// Sanitized category label.
    pub category_name: String,

    /// Amount in base currency units.
    pub amount: f64,

    /// Report type the record was extracted under.
    #[serde(rename = "type")]
    pub record_type: ReportType,
}

impl CategoryAmountRecord {
    pub fn new(category_name: impl Into<String>, amount: f64, record_type: ReportType) -> Self {
        Self {
            category_name: category_name.into(),
            amount,
            record_type,
        }
    }
}

/// Records extracted from one report together with their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Report type.
    pub report_type: ReportType,

    /// Sum of all record amounts, in record order.
    pub total_amount: f64,

    /// Number of records.
    pub category_count: usize,

    /// Records in first-seen order.
    pub categories: Vec<CategoryAmountRecord>,
}

impl ExtractionResult {
    /// Build a result from records, computing the total and count.
    pub fn from_records(report_type: ReportType, categories: Vec<CategoryAmountRecord>) -> Self {
        let total_amount = sum_amounts(&categories);
        Self {
            report_type,
            total_amount,
            category_count: categories.len(),
            categories,
        }
    }

    /// An empty result for the given report type.
    pub fn empty(report_type: ReportType) -> Self {
        Self::from_records(report_type, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Keep only the records at `indices`.
    ///
    /// Indices are applied in ascending order, duplicates collapse and
    /// out-of-range indices are ignored.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut wanted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.categories.len())
            .collect();
        wanted.sort_unstable();
        wanted.dedup();

        let categories = wanted
            .into_iter()
            .map(|i| self.categories[i].clone())
            .collect();

        Self::from_records(self.report_type, categories)
    }
}

fn sum_amounts(records: &[CategoryAmountRecord]) -> f64 {
    records.iter().fold(0.0, |acc, r| acc + r.amount)
}

/// A table split into its header row and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularReport {
    /// Header cell texts.
    pub headers: Vec<String>,

    /// Data rows, each exactly `headers.len()` cells long.
    pub rows: Vec<Vec<String>>,
}

impl TabularReport {
    /// Create a table, padding short rows with empty cells and cutting
    /// long rows down to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}
