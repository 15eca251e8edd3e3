//! Catalog Cleaner CLI - Clean product catalog CSV files
//!
//! # Commands
//!
//! ```bash
//! catalog-cleaner clean -i products.csv -o products_clean.csv   # One-shot run
//! catalog-cleaner watch inbox/ outbox/                          # Poll a directory
//! catalog-cleaner serve                                         # HTTP server (port 3000)
//! ```
//!
//! Reports go to standard output; logs go to standard error
//! (`RUST_LOG` controls the level).

use catalog_cleaner::config::{ServerConfig, WatchConfig, DEFAULT_POLL_INTERVAL_SECS};
use catalog_cleaner::{process_csv, report_to_json, save_report, CleanOptions, DEFAULT_ID_COLUMN};
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog-cleaner")]
#[command(about = "Clean product catalog CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a single CSV file
    Clean {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Column used to detect duplicates
        #[arg(long, default_value = DEFAULT_ID_COLUMN)]
        id_column: String,

        /// Print the report on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Watch a directory and clean every CSV dropped into it
    Watch {
        /// Directory to scan for CSV files
        input_dir: PathBuf,

        /// Directory receiving cleaned files and reports
        output_dir: PathBuf,

        /// Where processed inputs are moved (default: <input_dir>/processed)
        #[arg(long)]
        archive_dir: Option<PathBuf>,

        /// Seconds between scans
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,

        /// Column used to detect duplicates
        #[arg(long, default_value = DEFAULT_ID_COLUMN)]
        id_column: String,

        /// Run a single scan and exit
        #[arg(long)]
        once: bool,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides CATALOG_CLEANER_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides CATALOG_CLEANER_HOST)
        #[arg(long)]
        host: Option<IpAddr>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            report,
            id_column,
            compact,
        } => cmd_clean(&input, &output, report.as_deref(), id_column, compact),

        Commands::Watch {
            input_dir,
            output_dir,
            archive_dir,
            interval,
            id_column,
            once,
        } => {
            let mut config = WatchConfig::new(input_dir, output_dir)
                .with_interval(Duration::from_secs(interval))
                .with_id_column(id_column);
            if let Some(dir) = archive_dir {
                config = config.with_archive_dir(dir);
            }
            cmd_watch(config, once).await
        }

        Commands::Serve { port, host } => cmd_serve(port, host).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_clean(
    input: &Path,
    output: &Path,
    report_path: Option<&Path>,
    id_column: String,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = CleanOptions::with_id_column(id_column);
    let report = process_csv(input, output, &options)?;

    let json = match report_path {
        Some(path) => {
            let json = save_report(&report, path, !compact)?;
            tracing::info!(report = %path.display(), "report written");
            json
        }
        None => report_to_json(&report, !compact)?,
    };

    println!("{}", json);
    Ok(())
}

async fn cmd_watch(config: WatchConfig, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    if once {
        let summary = tokio::task::spawn_blocking(move || {
            catalog_cleaner::watch::prepare_dirs(&config)?;
            catalog_cleaner::watch::run_cycle(&config)
        })
        .await??;
        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            "single scan finished"
        );
        return Ok(());
    }

    // The handler is installed on first poll, which `watch` does before scanning.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for interrupt");
            std::future::pending::<()>().await;
        }
    };
    catalog_cleaner::watch::watch(config, shutdown).await?;
    Ok(())
}

async fn cmd_serve(port: Option<u16>, host: Option<IpAddr>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(host) = host {
        config.host = host;
    }
    catalog_cleaner::server::start_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_cleaner::Report;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_clean_args() {
        let cli = Cli::try_parse_from([
            "catalog-cleaner", "clean", "-i", "in.csv", "-o", "out.csv", "--compact",
        ])
        .unwrap();

        match cli.command {
            Commands::Clean { id_column, compact, report, .. } => {
                assert_eq!(id_column, "id");
                assert!(compact);
                assert!(report.is_none());
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_clean_requires_output() {
        assert!(Cli::try_parse_from(["catalog-cleaner", "clean", "-i", "in.csv"]).is_err());
    }

    #[test]
    fn test_clean_writes_report_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("products.csv");
        let output = dir.path().join("out/products_clean.csv");
        let report_path = dir.path().join("reports/products.json");
        fs::write(&input, "sku,name\nA,Lamp\nA,Lamp\n").unwrap();

        cmd_clean(&input, &output, Some(&report_path), "sku".to_string(), true).unwrap();

        let written = fs::read_to_string(&report_path).unwrap();
        assert_eq!(written.lines().count(), 1);
        let report: Report = serde_json::from_str(&written).unwrap();
        assert_eq!(report.id_column_used.as_deref(), Some("sku"));
        assert_eq!(report.cleaned_rows, 1);
        assert!(output.exists());
    }

    #[test]
    fn test_clean_missing_input_fails() {
        let dir = tempdir().unwrap();
        let result = cmd_clean(
            &dir.path().join("nope.csv"),
            &dir.path().join("out.csv"),
            None,
            "id".to_string(),
            false,
        );
        assert!(result.is_err());
    }
}
