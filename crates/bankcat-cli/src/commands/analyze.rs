//! Analyze command - transcribe a report image, then extract categories.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use bankcat_core::{ReportAnalyzer, ReportExtractor, ReportType, TranscriptionRequest};

use super::{OutputArgs, load_config, print_warnings, render_analysis, write_output};
use crate::client::VisionClient;

const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Report screenshot (PNG, JPEG, WebP, ...)
    #[arg(required = true)]
    image: PathBuf,

    /// Report type (income or expense)
    #[arg(short = 't', long = "type")]
    report_type: Option<ReportType>,

    /// Vision model name (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Chat-completions endpoint (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Also save the raw transcription for later confirmation
    #[arg(long)]
    transcript: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(model) = args.model {
        config.transcription.model = model;
    }
    if let Some(api_url) = args.api_url {
        config.transcription.api_url = api_url;
    }

    if !args.image.exists() {
        anyhow::bail!("Input file not found: {}", args.image.display());
    }

    let image = fs::read(&args.image)?;
    let mime_type = detect_mime_type(&image);
    let report_type = args.report_type.unwrap_or(config.extraction.default_report_type);

    info!("Analyzing {} ({})", args.image.display(), mime_type);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Transcribing with {}...", config.transcription.model));

    let client = VisionClient::new(&config.transcription)?;
    let analyzer = ReportAnalyzer::new(&client, ReportExtractor::from_config(&config.extraction));
    let request = TranscriptionRequest::new(image, mime_type, &config.transcription);

    let analysis = analyzer.analyze(&request, report_type).await;
    pb.finish_and_clear();
    let analysis = analysis?;

    if let Some(path) = &args.transcript {
        fs::write(path, &analysis.raw_content)?;
        eprintln!("{} Transcription saved to {}", style("✓").green(), path.display());
    }

    print_warnings(&analysis.warnings);

    let rendered = render_analysis(&analysis, &args.output)?;
    write_output(args.output.output.as_deref(), &rendered)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn detect_mime_type(image: &[u8]) -> &'static str {
    image::guess_format(image)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_type() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        assert_eq!(detect_mime_type(&png), "image/png");
        assert_eq!(detect_mime_type(b"not an image"), FALLBACK_MIME_TYPE);
    }
}
