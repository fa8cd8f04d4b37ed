//! One-shot load → clean → aggregate run.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::aggregators::grid::borough_year_grid;
use crate::aggregators::incidents::incident_points;
use crate::aggregators::ranking::{CategoryField, rank_categories};
use crate::aggregators::rolling::rolling_totals;
use crate::aggregators::totals::{monthly_totals, yearly_totals};
use crate::aggregators::types::{
    BoroughYearGrid, CategoryTotal, IncidentPoint, MonthlyTotal, RollingPoint, YearlyTotal,
};
use crate::cleaner::{clean_incidents, clean_population};
use crate::config::{AggregationSettings, PipelineConfig};
use crate::loader::{load_incidents, load_population};
use crate::models::{IncidentRecord, PopulationRecord};

/// Every aggregate view computed by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub monthly: Vec<MonthlyTotal>,
    pub yearly: Vec<YearlyTotal>,
    pub factor_ranking: Vec<CategoryTotal>,
    pub vehicle_ranking: Vec<CategoryTotal>,
    pub borough_year: BoroughYearGrid,
    pub rolling: Vec<RollingPoint>,
    pub incidents: Vec<IncidentPoint>,
}

/// Row counts per view, for logging.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub monthly: usize,
    pub yearly: usize,
    pub factor_ranking: usize,
    pub vehicle_ranking: usize,
    pub borough_year_cells: usize,
    pub rolling: usize,
    pub incidents: usize,
}

impl Dashboard {
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            monthly: self.monthly.len(),
            yearly: self.yearly.len(),
            factor_ranking: self.factor_ranking.len(),
            vehicle_ranking: self.vehicle_ranking.len(),
            borough_year_cells: self.borough_year.cells.len(),
            rolling: self.rolling.len(),
            incidents: self.incidents.len(),
        }
    }
}

/// Loads both input tables, cleans them and computes every view.
///
/// # Errors
///
/// Fails if either input file cannot be opened or read. Bad rows are
/// dropped and logged, not returned as errors.
#[tracing::instrument(skip(config), fields(
    incidents = %config.incidents_path.display(),
    population = %config.population_path.display()
))]
pub fn run(config: &PipelineConfig) -> Result<Dashboard> {
    let raw_incidents = load_incidents(&config.incidents_path)?;
    let raw_population = load_population(&config.population_path)?;

    let incidents = clean_incidents(&raw_incidents.rows);
    let population = clean_population(&raw_population.rows);

    let dashboard = build_dashboard(&incidents.records, &population.records, &config.settings);
    info!(summary = ?dashboard.summary(), "Pipeline run complete");
    Ok(dashboard)
}

/// Computes every view from already-cleaned records.
pub fn build_dashboard(
    incidents: &[IncidentRecord],
    population: &[PopulationRecord],
    settings: &AggregationSettings,
) -> Dashboard {
    Dashboard {
        monthly: monthly_totals(incidents),
        yearly: yearly_totals(incidents, settings),
        factor_ranking: rank_categories(
            incidents,
            CategoryField::ContributingFactor,
            settings.ranking_min_total,
        ),
        vehicle_ranking: rank_categories(
            incidents,
            CategoryField::VehicleType,
            settings.ranking_min_total,
        ),
        borough_year: borough_year_grid(incidents, population, settings),
        rolling: rolling_totals(
            incidents,
            settings.rolling_window_days,
            settings.rolling_min_periods,
        ),
        incidents: incident_points(incidents, settings.victim_rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Borough, YearMonth};
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, borough: Borough, peds: u32) -> IncidentRecord {
        IncidentRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), borough, peds, 0)
            .with_categories(Some("Unspecified"), Some("Sedan"))
    }

    #[test]
    fn test_march_2015_scenario() {
        let records = vec![
            record(2015, 3, 3, Borough::Bronx, 1),
            record(2015, 3, 17, Borough::Bronx, 2),
            record(2015, 3, 28, Borough::Queens, 1),
        ];
        let dashboard = build_dashboard(&records, &[], &AggregationSettings::default());

        let march = YearMonth {
            year: 2015,
            month: 3,
        };
        let in_march: Vec<(Borough, u64)> = dashboard
            .monthly
            .iter()
            .filter(|m| m.month == march)
            .map(|m| (m.borough, m.total_deaths))
            .collect();
        assert_eq!(in_march, vec![(Borough::Bronx, 3), (Borough::Queens, 1)]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            record(2014, 1, 1, Borough::Brooklyn, 3),
            record(2016, 5, 1, Borough::Manhattan, 4),
            record(2016, 5, 2, Borough::StatenIsland, 1),
        ];
        let population = vec![PopulationRecord {
            borough: Borough::Brooklyn,
            year: 2014,
            population: 2_600_000,
        }];
        let settings = AggregationSettings::default();
        let a = build_dashboard(&records, &population, &settings);
        let b = build_dashboard(&records, &population, &settings);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_input_gives_empty_views() {
        let dashboard = build_dashboard(&[], &[], &AggregationSettings::default());
        let summary = dashboard.summary();
        assert_eq!(summary.monthly, 0);
        assert_eq!(summary.rolling, 0);
        assert_eq!(summary.borough_year_cells, 0);
    }
}
