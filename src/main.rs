//! nomenclator CLI - title a photo album from its capture metadata

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use nomenclator::input::read_rows;
use nomenclator::logging::init_tracing;
use nomenclator::{NomenclatorConfig, PositionstackLocator, Processor, VisualCrossingWeatherman};

/// Generate a title for a photo album from a CSV of `timestamp,latitude,longitude` rows.
///
/// Requires LOCATOR_API_KEY (positionstack) and WEATHER_API_KEY (Visual Crossing).
#[derive(Parser, Debug)]
#[command(name = "nomenclator", author, version)]
struct Cli {
    /// CSV file with one photo per row
    file: PathBuf,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, env = "NOMENCLATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = NomenclatorConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose)?;
    config.require_api_keys()?;

    let rows = read_rows(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    debug!("Processing {} photos from {}", rows.len(), cli.file.display());

    let processor = Processor::new(
        PositionstackLocator::new(&config.locator)?,
        VisualCrossingWeatherman::new(&config.weather)?,
    );
    let outcome = processor.process(&rows).await;

    for err in &outcome.errors {
        eprintln!("{err}");
    }

    match outcome.require_title() {
        Ok(title) => {
            println!("Album title: {title}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
