//! Extract command - read categories from a transcribed report.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::{debug, info};

use bankcat_core::{ReportExtractor, ReportParser, ReportType};

use super::{OutputArgs, load_config, print_warnings, read_input, render_analysis, write_output};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Transcribed report, plain text or HTML table ("-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Report type (income or expense)
    #[arg(short = 't', long = "type")]
    report_type: Option<ReportType>,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let content = read_input(&args.input)?;
    let report_type = args.report_type.unwrap_or(config.extraction.default_report_type);

    info!("Extracting {} categories from {}", report_type, args.input.display());

    let extractor = ReportExtractor::from_config(&config.extraction);
    let analysis = extractor.analyze(&content, report_type)?;

    print_warnings(&analysis.warnings);

    let rendered = render_analysis(&analysis, &args.output)?;
    write_output(args.output.output.as_deref(), &rendered)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
