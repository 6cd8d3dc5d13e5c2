//! CLI subcommands and the helpers they share.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod confirm;
pub mod extract;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use bankcat_core::{BankcatConfig, ExtractionResult, ReportAnalysis};

/// Output options shared by the extracting commands.
#[derive(Args)]
pub struct OutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Print every intermediate stage as JSON instead of the bare result
    #[arg(long)]
    pub stages: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bankcat")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; the default location
/// falls back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BankcatConfig> {
    if let Some(path) = config_path {
        return BankcatConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(BankcatConfig::from_file(&path)?)
    } else {
        Ok(BankcatConfig::default())
    }
}

/// Read a text input file, or stdin when the path is `-`.
pub fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Write to the output file, or print to stdout.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Print skipped pairs and rows to stderr.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }

    eprintln!("{}", style("Skipped:").yellow());
    for warning in warnings {
        eprintln!("  - {}", warning);
    }
}

/// Render an analysis according to the output options.
pub fn render_analysis(analysis: &ReportAnalysis, args: &OutputArgs) -> anyhow::Result<String> {
    if args.stages {
        return Ok(serde_json::to_string_pretty(analysis)?);
    }
    format_result(&analysis.structured_data, args.format)
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["index", "category_name", "amount", "type"])?;

    for (i, record) in result.categories.iter().enumerate() {
        wtr.write_record([
            &i.to_string(),
            &record.category_name,
            &format!("{:.2}", record.amount),
            record.record_type.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} report: {} categories\n",
        result.report_type, result.category_count
    ));
    output.push('\n');

    for (i, record) in result.categories.iter().enumerate() {
        output.push_str(&format!("  [{}] {}  {:.2}\n", i, record.category_name, record.amount));
    }

    output.push('\n');
    output.push_str(&format!("Total: {:.2}\n", result.total_amount));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankcat_core::{CategoryAmountRecord, ReportType};

    fn result() -> ExtractionResult {
        ExtractionResult::from_records(
            ReportType::Expense,
            vec![
                CategoryAmountRecord::new("还款", 12800.0, ReportType::Expense),
                CategoryAmountRecord::new("购物", 3850.0, ReportType::Expense),
            ],
        )
    }

    #[test]
    fn test_format_csv() {
        let csv = format_result(&result(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "index,category_name,amount,type");
        assert_eq!(lines[1], "0,还款,12800.00,expense");
        assert_eq!(lines[2], "1,购物,3850.00,expense");
    }

    #[test]
    fn test_format_text() {
        let text = format_result(&result(), OutputFormat::Text).unwrap();

        assert!(text.starts_with("expense report: 2 categories"));
        assert!(text.contains("[1] 购物  3850.00"));
        assert!(text.ends_with("Total: 16650.00\n"));
    }
}
