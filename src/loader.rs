//! CSV loading for the incident and population tables.
//!
//! Columns are matched by header name, so extra columns (the unnamed index
//! column, `borough_gps`, `location`, collision ids) are never read. Paths
//! ending in `.gz` are decompressed on the fly.

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Older extracts spell the cyclist column in the singular.
const CYCLIST_COLUMN_SINGULAR: &str = "number_of_cyclist_killed";
const CYCLIST_COLUMN_PLURAL: &str = "number_of_cyclists_killed";

/// An incident row as it appears on disk. Every field is kept as text so
/// the cleaner can reject bad values one row at a time.
///
/// The cyclist count is read from either spelling of its column, but not
/// both: [`read_incidents`] rejects a header that carries the two.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncident {
    pub date: Option<String>,
    pub borough: Option<String>,
    pub number_of_pedestrians_killed: Option<String>,
    #[serde(alias = "number_of_cyclist_killed")]
    pub number_of_cyclists_killed: Option<String>,
    pub contributing_factor_vehicle_1: Option<String>,
    pub vehicle_type_code1: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPopulation {
    pub borough: Option<String>,
    pub year: Option<String>,
    pub population: Option<String>,
}

/// Rows read from one file, plus the number of malformed CSV rows skipped.
#[derive(Debug)]
pub struct LoadedTable<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

pub fn load_incidents(path: impl AsRef<Path>) -> Result<LoadedTable<RawIncident>> {
    load_table(path.as_ref(), read_incidents)
}

pub fn load_population(path: impl AsRef<Path>) -> Result<LoadedTable<RawPopulation>> {
    load_table(path.as_ref(), read_table)
}

fn load_table<T>(
    path: &Path,
    read: fn(Box<dyn Read>) -> Result<LoadedTable<T>>,
) -> Result<LoadedTable<T>> {
    let reader = open_input(path)?;
    let table = read(reader).with_context(|| format!("reading {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        skipped = table.skipped,
        "Loaded table"
    );
    Ok(table)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(path = %path.display(), gzipped, "Opening input");
    if gzipped {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Deserializes every row of a headed CSV stream.
///
/// I/O failures abort the read; a row that fails to deserialize is logged
/// and counted in [`LoadedTable::skipped`].
pub fn read_table<T: DeserializeOwned, R: Read>(reader: R) -> Result<LoadedTable<T>> {
    collect_rows(&mut csv_reader(reader))
}

/// Like [`read_table`], but fails up front when the header names the
/// cyclist column in both spellings. Serde would see a duplicate field on
/// every row and each one would be skipped.
pub fn read_incidents<R: Read>(reader: R) -> Result<LoadedTable<RawIncident>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?;
    let has = |name: &str| headers.iter().any(|h| h == name);
    if has(CYCLIST_COLUMN_SINGULAR) && has(CYCLIST_COLUMN_PLURAL) {
        bail!(
            "incident header has both {CYCLIST_COLUMN_SINGULAR} and {CYCLIST_COLUMN_PLURAL} columns"
        );
    }
    collect_rows(&mut rdr)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn collect_rows<T: DeserializeOwned, R: Read>(rdr: &mut csv::Reader<R>) -> Result<LoadedTable<T>> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for result in rdr.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping malformed CSV row");
            }
        }
    }

    Ok(LoadedTable { rows, skipped })
}
