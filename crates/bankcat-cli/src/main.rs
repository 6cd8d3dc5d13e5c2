//! CLI application for bank category report extraction.

mod client;
mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{analyze, batch, config, confirm, extract};

/// Bank category reports - Extract category totals from transcribed reports
#[derive(Parser)]
#[command(name = "bankcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract categories from a transcribed report (text or HTML table)
    Extract(extract::ExtractArgs),

    /// Transcribe a report image with a vision model, then extract
    Analyze(analyze::AnalyzeArgs),

    /// Select reviewed categories and print commit-ready rows
    Confirm(confirm::ConfirmArgs),

    /// Extract categories from multiple files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Analyze(args) => analyze::run(args, config_path).await,
        Commands::Confirm(args) => confirm::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
