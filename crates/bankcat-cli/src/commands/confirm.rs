//! Confirm command - keep reviewed categories and emit commit-ready rows.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use bankcat_core::{ExtractionResult, ReportExtractor, ReportParser, ReportType};

use super::{OutputFormat, load_config, read_input, write_output};

/// Arguments for the confirm command.
#[derive(Args)]
pub struct ConfirmArgs {
    /// Transcribed report, plain text or HTML table ("-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Indices of the categories to keep, as listed by `extract`
    #[arg(short, long, required = true, value_delimiter = ',')]
    select: Vec<usize>,

    /// Report month (YYYY-MM)
    #[arg(short, long)]
    month: String,

    /// Account owner recorded on every row
    #[arg(long)]
    owner: Option<String>,

    /// Report type (income or expense)
    #[arg(short = 't', long = "type")]
    report_type: Option<ReportType>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// One confirmed category, ready to be stored as a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRow {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub record_type: ReportType,
    pub owner: Option<String>,
    pub description: String,
}

pub async fn run(args: ConfirmArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let date = parse_month(&args.month)?;

    let content = read_input(&args.input)?;
    let report_type = args.report_type.unwrap_or(config.extraction.default_report_type);

    let extractor = ReportExtractor::from_config(&config.extraction);
    let extracted = extractor.extract(&content, report_type)?;

    for &index in &args.select {
        if index >= extracted.category_count {
            warn!("Ignoring index {}, report has {} categories", index, extracted.category_count);
        }
    }

    let confirmed = extracted.select(&args.select);
    if confirmed.is_empty() {
        anyhow::bail!("No categories selected from {} extracted", extracted.category_count);
    }

    info!(
        "Confirmed {} of {} categories, total {:.2}",
        confirmed.category_count, extracted.category_count, confirmed.total_amount
    );

    let rows = commit_rows(&confirmed, date, &args.month, args.owner.as_deref());

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        OutputFormat::Csv => format_rows_csv(&rows)?,
        OutputFormat::Text => format_rows_text(&rows),
    };

    write_output(args.output.as_deref(), &output)
}

/// First day of a `YYYY-MM` month.
fn parse_month(month: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid month {:?}, expected YYYY-MM", month))
}

fn commit_rows(result: &ExtractionResult, date: NaiveDate, month: &str, owner: Option<&str>) -> Vec<CommitRow> {
    let description = format!("OCR import: {} {} category summary", month.trim(), result.report_type);

    result
        .categories
        .iter()
        .map(|record| CommitRow {
            date,
            category: record.category_name.clone(),
            amount: record.amount,
            record_type: record.record_type,
            owner: owner.map(str::to_string),
            description: description.clone(),
        })
        .collect()
}

fn format_rows_csv(rows: &[CommitRow]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for row in rows {
        wtr.serialize(row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_rows_text(rows: &[CommitRow]) -> String {
    let mut output = String::new();

    for row in rows {
        output.push_str(&format!(
            "{}  {:<12} {:>12.2}  {}\n",
            row.date, row.category, row.amount, row.record_type
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankcat_core::CategoryAmountRecord;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-05").unwrap(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("May 2024").is_err());
    }

    #[test]
    fn test_commit_rows() {
        let result = ExtractionResult::from_records(
            ReportType::Income,
            vec![CategoryAmountRecord::new("工资", 9000.0, ReportType::Income)],
        );
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let rows = commit_rows(&result, date, "2024-05", Some("alice"));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "OCR import: 2024-05 income category summary");
        assert_eq!(rows[0].owner.as_deref(), Some("alice"));

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["type"], "income");
    }

    #[test]
    fn test_rows_csv() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let rows = vec![CommitRow {
            date,
            category: "餐饮".to_string(),
            amount: 120.5,
            record_type: ReportType::Expense,
            owner: None,
            description: "OCR import: 2024-05 expense category summary".to_string(),
        }];

        let csv = format_rows_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,category,amount,type,owner,description");
        assert_eq!(lines[1], "2024-05-01,餐饮,120.5,expense,,OCR import: 2024-05 expense category summary");
    }
}
