//! ARGO profile ingester.
//!
//! Reads ARGO core-profile NetCDF files, derives oceanographic parameters,
//! and stores the results in PostgreSQL together with a searchable summary.

mod config;
mod ingest;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::IngesterConfig;
use ingest::IngestionPipeline;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "ARGO float profile ingester")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Use in-memory storage and print the records as JSON
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Ingest every profile file in a directory (default: RAW_DATA_DIR)
    Ingest { dir: Option<PathBuf> },

    /// Ingest a single profile file
    IngestFile { path: PathBuf },

    /// Print stored profile and index counts
    Stats,

    /// Remove duplicate (platform, cycle) profiles, keeping the latest
    Dedupe,

    /// Search profile summaries
    Search {
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    netcdf_parser::silence_hdf5_errors();
    info!("Starting ARGO profile ingester");

    // Load configuration
    let config = IngesterConfig::from_env()?;
    info!(config = ?config.summary(), "Loaded configuration");

    let pipeline = if args.dry_run {
        IngestionPipeline::dry_run(&config)
    } else {
        IngestionPipeline::connect(&config).await?
    };

    run(args.command, &config, &pipeline).await
}

async fn run(
    command: Command,
    config: &IngesterConfig,
    pipeline: &IngestionPipeline,
) -> Result<()> {
    let ingester = pipeline.ingester();

    match command {
        Command::Ingest { dir } => {
            let dir = dir.unwrap_or_else(|| config.raw_data_dir.clone());
            let summary = ingester.ingest_directory(&dir).await;
            print_dry_run_records(pipeline).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::IngestFile { path } => {
            let ok = ingester.ingest_single_file(&path).await;
            print_dry_run_records(pipeline).await?;
            if !ok {
                bail!("Failed to ingest {}", path.display());
            }
        }
        Command::Stats => {
            let stats = ingester.get_ingestion_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Dedupe => {
            let removed = ingester.cleanup_duplicates().await?;
            println!("{}", serde_json::json!({ "removed": removed }));
        }
        Command::Search { query, limit } => {
            let hits = ingester.search(&query, limit).await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
    }

    Ok(())
}

async fn print_dry_run_records(pipeline: &IngestionPipeline) -> Result<()> {
    if !pipeline.is_dry_run() {
        return Ok(());
    }
    for record in pipeline.dry_run_records().await {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_subcommands() {
        let args = Args::try_parse_from(["ingester", "ingest", "/data/argo"]).unwrap();
        assert_eq!(
            args.command,
            Command::Ingest {
                dir: Some(PathBuf::from("/data/argo"))
            }
        );
        assert!(!args.dry_run);

        let args = Args::try_parse_from(["ingester", "search", "warm indian", "-l", "3"]).unwrap();
        assert_eq!(
            args.command,
            Command::Search {
                query: "warm indian".to_string(),
                limit: 3
            }
        );

        let args =
            Args::try_parse_from(["ingester", "ingest-file", "R1_001.nc", "--dry-run"]).unwrap();
        assert!(args.dry_run);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["ingester"]).is_err());
    }

    #[tokio::test]
    async fn test_dry_run_on_missing_directory() {
        let config = IngesterConfig::from_lookup(|_| None).unwrap();
        let pipeline = IngestionPipeline::dry_run(&config);

        let summary = pipeline
            .ingester()
            .ingest_directory(std::path::Path::new("/nonexistent/argo"))
            .await;
        assert_eq!(summary.errors, 1);
        assert!(pipeline.dry_run_records().await.is_empty());
    }
}
