//! Turns raw CSV rows into validated domain records.
//!
//! Rows outside the five boroughs are dropped as out of scope. Rows with
//! a bad date or death count are rejected with a [`RecordError`]. Neither
//! case stops the run.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::error::RecordError;
use crate::loader::{RawIncident, RawPopulation};
use crate::models::{Borough, GeoPoint, IncidentRecord, NOT_NYC, PopulationRecord};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug)]
pub struct CleanOutcome<T> {
    pub records: Vec<T>,
    /// Rows with a missing or "NOT NYC" borough.
    pub out_of_scope: usize,
    /// Rejected rows, keyed by [`RecordError::kind`].
    pub rejected: BTreeMap<&'static str, usize>,
}

impl<T> CleanOutcome<T> {
    fn new() -> Self {
        CleanOutcome {
            records: Vec::new(),
            out_of_scope: 0,
            rejected: BTreeMap::new(),
        }
    }

    fn reject(&mut self, err: &RecordError) {
        *self.rejected.entry(err.kind()).or_default() += 1;
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

pub fn clean_incidents(raw: &[RawIncident]) -> CleanOutcome<IncidentRecord> {
    let mut outcome = CleanOutcome::new();

    for (idx, row) in raw.iter().enumerate() {
        match clean_incident(row) {
            Ok(Some(record)) => outcome.records.push(record),
            Ok(None) => outcome.out_of_scope += 1,
            Err(e) => {
                debug!(row = idx, error = %e, "Rejecting incident row");
                outcome.reject(&e);
            }
        }
    }

    info!(
        kept = outcome.records.len(),
        out_of_scope = outcome.out_of_scope,
        rejected = outcome.rejected_total(),
        "Cleaned incident rows"
    );
    outcome
}

/// Validates one incident row. `Ok(None)` means the row is out of scope.
pub fn clean_incident(raw: &RawIncident) -> Result<Option<IncidentRecord>, RecordError> {
    let borough = match field(&raw.borough) {
        None => return Ok(None),
        Some(b) if b.eq_ignore_ascii_case(NOT_NYC) => return Ok(None),
        Some(b) => b.parse::<Borough>()?,
    };

    let date = field(&raw.date)
        .ok_or(RecordError::MissingField { field: "date" })
        .and_then(parse_date)?;
    let pedestrians = parse_count(
        "number_of_pedestrians_killed",
        field(&raw.number_of_pedestrians_killed),
    )?;
    let cyclists = parse_count(
        "number_of_cyclists_killed",
        field(&raw.number_of_cyclists_killed),
    )?;

    let location = match (
        field(&raw.latitude).and_then(parse_coordinate),
        field(&raw.longitude).and_then(parse_coordinate),
    ) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let record = IncidentRecord::new(date, borough, pedestrians, cyclists)
        .with_categories(
            field(&raw.contributing_factor_vehicle_1),
            field(&raw.vehicle_type_code1),
        )
        .with_location(location);

    Ok(Some(record))
}

pub fn clean_population(raw: &[RawPopulation]) -> CleanOutcome<PopulationRecord> {
    let mut outcome = CleanOutcome::new();

    for (idx, row) in raw.iter().enumerate() {
        match clean_population_row(row) {
            Ok(Some(record)) => outcome.records.push(record),
            Ok(None) => outcome.out_of_scope += 1,
            Err(e) => {
                warn!(row = idx, error = %e, "Rejecting population row");
                outcome.reject(&e);
            }
        }
    }

    info!(
        kept = outcome.records.len(),
        rejected = outcome.rejected_total(),
        "Cleaned population rows"
    );
    outcome
}

fn clean_population_row(raw: &RawPopulation) -> Result<Option<PopulationRecord>, RecordError> {
    let borough = match field(&raw.borough) {
        None => return Ok(None),
        Some(b) if b.eq_ignore_ascii_case(NOT_NYC) => return Ok(None),
        Some(b) => b.parse::<Borough>()?,
    };

    let year_text = field(&raw.year).ok_or(RecordError::MissingField { field: "year" })?;
    let year = parse_whole(year_text)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| RecordError::InvalidYear {
            value: year_text.to_string(),
        })?;

    let pop_text = field(&raw.population).ok_or(RecordError::MissingField {
        field: "population",
    })?;
    let population = parse_whole(pop_text).ok_or_else(|| RecordError::InvalidPopulation {
        value: pop_text.to_string(),
    })?;

    Ok(Some(PopulationRecord {
        borough,
        year,
        population,
    }))
}

fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RecordError> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt.date());
        }
    }
    Err(RecordError::InvalidDate {
        value: value.to_string(),
    })
}

fn parse_count(name: &'static str, value: Option<&str>) -> Result<u32, RecordError> {
    let value = value.ok_or(RecordError::MissingField { field: name })?;
    parse_whole(value)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| RecordError::InvalidCount {
            field: name,
            value: value.to_string(),
        })
}

/// Parses a non-negative whole number, accepting float spellings like `2.0`.
fn parse_whole(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let f = value.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}
