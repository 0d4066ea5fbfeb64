use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use consilium_client::ApiClient;
use consilium_core::ClientConfig;
use consilium_export::Exporter;
use consilium_search::{MovementSearch, ProcessSearch};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Search the unified court process API and export the results.
#[derive(Parser)]
#[command(name = "consilium", version, about)]
struct Args {
    /// Search query: CNJ number, CPF, CNPJ, OAB registration, party name
    /// (double-quoted for exact match), or INQ:<year>.<number>.
    query: String,

    /// Directory for CSV exports.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Directory for JSON exports.
    #[arg(long)]
    json_dir: Option<PathBuf>,

    /// Which export formats to write.
    #[arg(long, value_enum, default_value = "both")]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum Format {
    Csv,
    Json,
    Both,
}

fn main() -> anyhow::Result<()> {
    init_tracing().context("setting up logging")?;
    let args = Args::parse();

    let config = ClientConfig::default();
    let client = ApiClient::new(config.clone()).context("building HTTP client")?;
    let search = ProcessSearch::new(&client, &config);
    let movements = MovementSearch::new(&client, &config);

    info!(query = %args.query, "searching processes");
    let mut processes = search.resolve(&args.query)?;
    if processes.is_empty() {
        warn!(query = %args.query, "no processes found");
        return Ok(());
    }
    info!(count = processes.len(), "found processes");

    let exporter = Exporter::new(
        args.csv_dir.unwrap_or_else(|| config.csv_export_dir.clone()),
        args.json_dir
            .unwrap_or_else(|| config.json_export_dir.clone()),
    );

    let total = processes.len();
    for (index, process) in processes.iter_mut().enumerate() {
        info!(
            current = index + 1,
            total,
            number = %process.number,
            "fetching movements and exporting"
        );
        process.movements =
            movements.resolve(&process.number, &process.cd_doc_process, &process.cd_instance)?;
        match args.format {
            Format::Csv => {
                exporter.export_csv(process)?;
            }
            Format::Json => {
                exporter.export_json(process)?;
            }
            Format::Both => exporter.export(process)?,
        }
    }

    info!("export complete");
    Ok(())
}

/// Console layer filtered by `RUST_LOG` (default `info`), plus a full log
/// file per run under `logs/`.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = Path::new("logs");
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(format!(
        "consilium_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    let log_file = Arc::new(File::create(&log_path)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_file),
        )
        .init();
    Ok(())
}
