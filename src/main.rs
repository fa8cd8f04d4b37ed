//! CLI entry point for the NYC fatality aggregation pipeline.
//!
//! Provides subcommands for exporting every aggregate view, inspecting a
//! single view, and filtering the rolling series by borough.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use nyc_fatalities::{
    config::{AggregationSettings, PipelineConfig},
    models::Borough,
    output::{export_dashboard, print_json, print_pretty},
    pipeline::{self, Dashboard},
    selection::{BoroughSelection, SelectionCommand},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "nyc_fatalities")]
#[command(about = "Aggregate NYC pedestrian and cyclist fatality data", long_about = None)]
struct Cli {
    #[command(flatten)]
    inputs: Inputs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Inputs {
    /// Incident CSV (falls back to $INCIDENTS_PATH)
    #[arg(long, global = true)]
    incidents: Option<PathBuf>,

    /// Borough population CSV (falls back to $POPULATION_PATH)
    #[arg(long, global = true)]
    population: Option<PathBuf>,

    /// Optional JSON file with aggregation settings
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write every view as CSV
    Export {
        /// Directory to write the CSV files into
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,

        /// Gzip compress the CSV files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Run the pipeline and log one view as JSON
    Inspect {
        #[arg(value_enum)]
        view: View,
    },
    /// Log the rolling totals for the selected boroughs only
    Rolling {
        /// Borough to include; repeat for several (default: all)
        #[arg(short, long = "borough", value_parser = Borough::from_str)]
        boroughs: Vec<Borough>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Summary,
    Monthly,
    Yearly,
    Factors,
    Vehicles,
    Grid,
    Rolling,
    Incidents,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nyc_fatalities.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nyc_fatalities.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = pipeline_config(&cli.inputs)?;
    let dashboard = pipeline::run(&config)?;

    match cli.command {
        Commands::Export { output_dir, gzip } => {
            let paths = export_dashboard(&dashboard, &output_dir, gzip)?;
            for path in &paths {
                info!(path = %path.display(), "Wrote view");
            }
            print_json(&dashboard.summary())?;
        }
        Commands::Inspect { view } => {
            print_pretty(&dashboard.summary());
            inspect(&dashboard, view)?;
        }
        Commands::Rolling { boroughs } => {
            let mut selection = BoroughSelection::default();
            if !boroughs.is_empty() {
                selection.apply_command(SelectionCommand::SetActive(boroughs));
            }
            let points = selection.apply(&dashboard.rolling);
            info!(
                active = ?selection.active().collect::<Vec<_>>(),
                points = points.len(),
                "Filtered rolling totals"
            );
            print_json(&points)?;
        }
    }

    Ok(())
}

/// Resolves input paths from flags, then environment, and loads settings.
fn pipeline_config(inputs: &Inputs) -> Result<PipelineConfig> {
    let Some(incidents) = inputs
        .incidents
        .clone()
        .or_else(|| std::env::var_os("INCIDENTS_PATH").map(PathBuf::from))
    else {
        bail!("no incident file given (use --incidents or set INCIDENTS_PATH)");
    };
    let Some(population) = inputs
        .population
        .clone()
        .or_else(|| std::env::var_os("POPULATION_PATH").map(PathBuf::from))
    else {
        bail!("no population file given (use --population or set POPULATION_PATH)");
    };

    let settings = match &inputs.settings {
        Some(path) => AggregationSettings::load(path)?,
        None => AggregationSettings::default(),
    };
    info!(?settings, "Aggregation settings");

    Ok(PipelineConfig::new(incidents, population).with_settings(settings))
}

fn inspect(dashboard: &Dashboard, view: View) -> Result<()> {
    match view {
        View::Summary => print_json(&dashboard.summary()),
        View::Monthly => print_json(&dashboard.monthly),
        View::Yearly => print_json(&dashboard.yearly),
        View::Factors => print_json(&dashboard.factor_ranking),
        View::Vehicles => print_json(&dashboard.vehicle_ranking),
        View::Grid => print_json(&dashboard.borough_year),
        View::Rolling => print_json(&dashboard.rolling),
        View::Incidents => print_json(&dashboard.incidents),
    }
}
