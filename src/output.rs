//! Output formatting and export for aggregate series.
//!
//! Supports pretty-printing, JSON logging, and CSV export (plain or gzip).

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::pipeline::Dashboard;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` to `<dir>/<name>.csv`, or `<name>.csv.gz` when `gzip` is set.
///
/// Existing files are overwritten. Returns the path written.
pub fn write_series<T: Serialize>(
    dir: &Path,
    name: &str,
    rows: &[T],
    gzip: bool,
) -> Result<PathBuf> {
    let file_name = if gzip {
        format!("{name}.csv.gz")
    } else {
        format!("{name}.csv")
    };
    let path = dir.join(file_name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    if gzip {
        let encoder = write_rows(GzEncoder::new(file, Compression::default()), rows)?;
        encoder.finish()?;
    } else {
        write_rows(file, rows)?;
    }

    debug!(path = %path.display(), rows = rows.len(), gzip, "Wrote series");
    Ok(path)
}

fn write_rows<W: Write, T: Serialize>(sink: W, rows: &[T]) -> Result<W> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV output: {}", e.error()))
}

/// Writes every view of `dashboard` into `dir`, creating it if needed.
pub fn export_dashboard(dashboard: &Dashboard, dir: &Path, gzip: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let paths = vec![
        write_series(dir, "monthly", &dashboard.monthly, gzip)?,
        write_series(dir, "yearly", &dashboard.yearly, gzip)?,
        write_series(dir, "factor_ranking", &dashboard.factor_ranking, gzip)?,
        write_series(dir, "vehicle_ranking", &dashboard.vehicle_ranking, gzip)?,
        write_series(dir, "borough_year", &dashboard.borough_year.cells, gzip)?,
        write_series(dir, "year_baselines", &dashboard.borough_year.baselines, gzip)?,
        write_series(dir, "rolling", &dashboard.rolling, gzip)?,
        write_series(dir, "incidents", &dashboard.incidents, gzip)?,
    ];

    info!(dir = %dir.display(), files = paths.len(), gzip, "Exported dashboard");
    Ok(paths)
}
