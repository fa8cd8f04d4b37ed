use std::collections::BTreeMap;

use crate::aggregators::types::{MonthlyTotal, YearlyTotal};
use crate::config::AggregationSettings;
use crate::models::{Borough, IncidentRecord, YearMonth};

/// Sums deaths per (month, borough), ordered by month then borough.
///
/// Pairs with no incidents are absent rather than zero.
pub fn monthly_totals(records: &[IncidentRecord]) -> Vec<MonthlyTotal> {
    let mut groups: BTreeMap<(YearMonth, Borough), u64> = BTreeMap::new();
    for r in records {
        *groups.entry((r.month, r.borough)).or_default() += r.total_deaths;
    }

    groups
        .into_iter()
        .map(|((month, borough), total_deaths)| MonthlyTotal {
            month,
            borough,
            total_deaths,
        })
        .collect()
}

/// Sums deaths per calendar year, skipping the configured incomplete years.
pub fn yearly_totals(
    records: &[IncidentRecord],
    settings: &AggregationSettings,
) -> Vec<YearlyTotal> {
    let mut groups: BTreeMap<i32, u64> = BTreeMap::new();
    for r in records.iter().filter(|r| !settings.is_excluded_year(r.year())) {
        *groups.entry(r.year()).or_default() += r.total_deaths;
    }

    groups
        .into_iter()
        .map(|(year, total_deaths)| YearlyTotal { year, total_deaths })
        .collect()
}
