use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use crate::aggregators::types::RollingPoint;
use crate::models::{Borough, IncidentRecord};

/// What the rolling sum reports before a full window of days is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingMinPeriods {
    /// Sum whatever days are available.
    Partial,
    /// Report `None` until the window is full.
    FullWindow,
}

/// Trailing `window`-day death totals per borough.
///
/// The calendar spans the earliest to the latest incident date across all
/// boroughs. Days without incidents count as zero, so every borough present
/// in `records` gets exactly one point per calendar day.
pub fn rolling_totals(
    records: &[IncidentRecord],
    window: NonZeroUsize,
    min_periods: RollingMinPeriods,
) -> Vec<RollingPoint> {
    let (Some(start), Some(end)) = (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) else {
        return Vec::new();
    };

    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let boroughs: BTreeSet<Borough> = records.iter().map(|r| r.borough).collect();

    let mut daily: BTreeMap<Borough, Vec<u64>> = boroughs
        .iter()
        .map(|b| (*b, vec![0; days.len()]))
        .collect();
    for r in records {
        let offset = (r.date - start).num_days() as usize;
        if let Some(series) = daily.get_mut(&r.borough) {
            series[offset] += r.total_deaths;
        }
    }

    let mut points = Vec::with_capacity(days.len() * daily.len());
    for (borough, series) in &daily {
        let sums = trailing_sums(series, window.get(), min_periods);
        points.extend(
            days.iter()
                .zip(sums)
                .map(|(date, rolling_total)| RollingPoint {
                    date: *date,
                    borough: *borough,
                    rolling_total,
                }),
        );
    }
    points
}

/// Running window sum: value `i` covers `values[i + 1 - window ..= i]`.
fn trailing_sums(
    values: &[u64],
    window: usize,
    min_periods: RollingMinPeriods,
) -> Vec<Option<u64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0u64;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let full = i + 1 >= window;
        out.push(match min_periods {
            RollingMinPeriods::FullWindow if !full => None,
            _ => Some(sum),
        });
    }
    out
}
