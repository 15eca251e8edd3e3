//! Directory watcher for batch cleaning.
//!
//! Polls an input directory for `*.csv` files, cleans each one into the
//! output directory and moves the original into an archive directory.
//!
//! ```text
//! inbox/products.csv  →  outbox/products_clean.csv
//!                        outbox/products_report.json
//!                        inbox/processed/products.csv
//! ```
//!
//! Files are handled one at a time, in name order. A failing file is logged
//! and left in place; the loop keeps going.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::config::WatchConfig;
use crate::error::{WatchError, WatchResult};
use crate::transform::pipeline::{process_csv, save_report, CleanOptions};
use crate::transform::report::{report_to_json, Report};

/// Prefix of editor lock/temp files to skip.
const TEMP_FILE_PREFIX: &str = "~$";

/// Outcome of one scan cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Output paths for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cleaned: PathBuf,
    pub report: PathBuf,
    pub archived: PathBuf,
}

impl OutputPaths {
    pub fn for_input(input: &Path, config: &WatchConfig) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let file_name = input
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{stem}.csv")));

        Self {
            cleaned: config.output_dir.join(format!("{stem}_clean.csv")),
            report: config.output_dir.join(format!("{stem}_report.json")),
            archived: config.archive_dir.join(file_name),
        }
    }
}

fn is_candidate(path: &Path) -> bool {
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let is_temp = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_FILE_PREFIX));
    is_csv && !is_temp && path.is_file()
}

/// List CSV files waiting in `dir`, sorted by name.
pub fn scan_input_dir(dir: &Path) -> WatchResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| WatchError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_candidate(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Make sure the input directory exists and create output and archive ones.
pub fn prepare_dirs(config: &WatchConfig) -> WatchResult<()> {
    if !config.input_dir.is_dir() {
        return Err(WatchError::MissingInputDir(config.input_dir.clone()));
    }
    for dir in [&config.output_dir, &config.archive_dir] {
        fs::create_dir_all(dir).map_err(|source| WatchError::Directory {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Move `from` to `to`, replacing any existing file.
///
/// The previous archive entry is only replaced once the new copy is complete.
fn archive_file(from: &Path, to: &Path) -> WatchResult<()> {
    let archive_err = |source| WatchError::Archive {
        path: from.to_path_buf(),
        source,
    };

    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // Cross-device moves need a copy, staged next to the target.
    let staged_name = format!(
        ".{}.partial",
        to.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
    );
    let staged = to.with_file_name(staged_name);
    if let Err(source) = fs::copy(from, &staged).and_then(|_| fs::rename(&staged, to)) {
        let _ = fs::remove_file(&staged);
        return Err(archive_err(source));
    }
    fs::remove_file(from).map_err(archive_err)
}

/// Clean one file, write its report and archive the original.
pub fn process_file(input: &Path, config: &WatchConfig) -> WatchResult<Report> {
    let paths = OutputPaths::for_input(input, config);
    let options = CleanOptions::with_id_column(config.id_column.clone());

    let report = process_csv(input, &paths.cleaned, &options)?;
    save_report(&report, &paths.report, true)?;

    archive_file(input, &paths.archived)?;
    tracing::info!(file = %input.display(), archive = %paths.archived.display(), "archived input");
    Ok(report)
}

/// Run one scan over the input directory.
///
/// Each report is printed to standard output; failures are logged and
/// counted.
pub fn run_cycle(config: &WatchConfig) -> WatchResult<CycleSummary> {
    let files = scan_input_dir(&config.input_dir)?;
    let mut summary = CycleSummary::default();

    if !files.is_empty() {
        tracing::info!(count = files.len(), dir = %config.input_dir.display(), "found CSV files");
    }

    for file in files {
        tracing::info!(file = %file.display(), "processing");
        match process_file(&file, config) {
            Ok(report) => {
                summary.processed += 1;
                match report_to_json(&report, true) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::error!(error = %e, "failed to render report"),
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(file = %file.display(), error = %e, "failed to process file");
            }
        }
    }

    Ok(summary)
}

fn log_cycle(result: Result<WatchResult<CycleSummary>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(summary)) if summary.failed > 0 => {
            tracing::warn!(processed = summary.processed, failed = summary.failed, "cycle finished with failures");
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "scan failed"),
        Err(e) => tracing::error!(error = %e, "scan task panicked"),
    }
}

/// Poll until `shutdown` resolves.
///
/// Scans immediately, then once per `config.interval`. `shutdown` is polled
/// before the first scan so signal handlers it installs are in place while
/// scanning. A stop requested mid-scan lets that scan finish, then returns.
pub async fn watch<F>(config: WatchConfig, shutdown: F) -> WatchResult<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    tokio::select! {
        biased;
        _ = &mut shutdown => {
            tracing::info!("stop requested before first scan");
            return Ok(());
        }
        _ = std::future::ready(()) => {}
    }

    prepare_dirs(&config)?;
    tracing::info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        archive = %config.archive_dir.display(),
        interval_secs = config.interval.as_secs(),
        "watching for CSV files"
    );

    loop {
        let cycle_config = config.clone();
        let mut cycle = tokio::task::spawn_blocking(move || run_cycle(&cycle_config));

        let stopped = tokio::select! {
            biased;
            _ = &mut shutdown => true,
            result = &mut cycle => {
                log_cycle(result);
                false
            }
        };
        if stopped {
            tracing::info!("stop requested, finishing current scan");
            log_cycle(cycle.await);
            return Ok(());
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("stop requested, leaving watch loop");
                return Ok(());
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
