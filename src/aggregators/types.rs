//! Row types produced by the aggregators.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Borough, VictimCategory, YearMonth};

/// Deaths in one borough during one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub borough: Borough,
    pub total_deaths: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyTotal {
    pub year: i32,
    pub total_deaths: u64,
}

/// One bar of a contributing-factor or vehicle-type ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_deaths: u64,
}

/// One (borough, year) cell of the grouped-bar grid.
///
/// The `year_mean_*` fields repeat the year's cross-borough baseline on
/// every cell so each row can be charted on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub borough: Borough,
    pub year: i32,
    pub total_deaths: u64,
    pub population: Option<u64>,
    /// `None` when the population is missing or zero.
    pub rate_per_10000: Option<f64>,
    pub year_mean_deaths: f64,
    pub year_mean_rate_per_10000: Option<f64>,
}

/// Cross-borough reference values for a single year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBaseline {
    pub year: i32,
    pub mean_deaths: f64,
    pub mean_population: Option<f64>,
    pub mean_rate_per_10000: Option<f64>,
}

/// Cells are ordered borough first, then year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoroughYearGrid {
    pub cells: Vec<GridCell>,
    pub baselines: Vec<YearBaseline>,
}

impl BoroughYearGrid {
    pub fn cell(&self, borough: Borough, year: i32) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|c| c.borough == borough && c.year == year)
    }

    pub fn baseline(&self, year: i32) -> Option<&YearBaseline> {
        self.baselines.iter().find(|b| b.year == year)
    }
}

/// Trailing-window death total for one borough on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub borough: Borough,
    /// `None` only under the full-window policy, before a full window exists.
    pub rolling_total: Option<u64>,
}

/// An incident with known coordinates, for the map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentPoint {
    pub date: NaiveDate,
    pub month: YearMonth,
    pub borough: Borough,
    pub latitude: f64,
    pub longitude: f64,
    pub total_deaths: u64,
    pub victim: VictimCategory,
    pub vehicle_type: Option<String>,
    pub contributing_factor: Option<String>,
}
