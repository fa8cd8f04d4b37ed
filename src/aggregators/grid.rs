use std::collections::BTreeMap;
use tracing::warn;

use crate::aggregators::types::{BoroughYearGrid, GridCell, YearBaseline};
use crate::aggregators::utility::{mean, per_10000};
use crate::config::AggregationSettings;
use crate::models::{Borough, IncidentRecord, PopulationRecord};

/// Builds the borough×year grid of deaths and population-normalized rates.
///
/// Deaths come from records outside `excluded_years`. Population comes from
/// rows outside `population_excluded_years`, summed per (borough, year).
/// Each year gets a baseline made of the cross-borough mean deaths and mean
/// population, and every cell of that year carries it.
pub fn borough_year_grid(
    records: &[IncidentRecord],
    population: &[PopulationRecord],
    settings: &AggregationSettings,
) -> BoroughYearGrid {
    let mut deaths: BTreeMap<(Borough, i32), u64> = BTreeMap::new();
    for r in records.iter().filter(|r| !settings.is_excluded_year(r.year())) {
        *deaths.entry((r.borough, r.year())).or_default() += r.total_deaths;
    }

    let mut pops: BTreeMap<(Borough, i32), u64> = BTreeMap::new();
    for p in population
        .iter()
        .filter(|p| !settings.population_excluded_years.contains(&p.year))
    {
        *pops.entry((p.borough, p.year)).or_default() += p.population;
    }

    let baselines = year_baselines(&deaths, &pops);

    let cells: Vec<GridCell> = deaths
        .iter()
        .map(|(&(borough, year), &total_deaths)| {
            let population = pops.get(&(borough, year)).copied();
            if population.is_none() {
                warn!(%borough, year, "No population figure for grid cell");
            }
            let baseline = baselines.get(&year);
            GridCell {
                borough,
                year,
                total_deaths,
                population,
                rate_per_10000: population
                    .and_then(|p| per_10000(total_deaths as f64, p as f64)),
                year_mean_deaths: baseline.map(|b| b.mean_deaths).unwrap_or_default(),
                year_mean_rate_per_10000: baseline.and_then(|b| b.mean_rate_per_10000),
            }
        })
        .collect();

    BoroughYearGrid {
        cells,
        baselines: baselines.into_values().collect(),
    }
}

fn year_baselines(
    deaths: &BTreeMap<(Borough, i32), u64>,
    pops: &BTreeMap<(Borough, i32), u64>,
) -> BTreeMap<i32, YearBaseline> {
    let mut deaths_by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (&(_, year), &total) in deaths {
        deaths_by_year.entry(year).or_default().push(total as f64);
    }

    let mut pops_by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for (&(_, year), &population) in pops {
        pops_by_year.entry(year).or_default().push(population as f64);
    }

    deaths_by_year
        .into_iter()
        .map(|(year, totals)| {
            let mean_deaths = mean(&totals);
            let mean_population = pops_by_year.get(&year).map(|p| mean(p));
            let baseline = YearBaseline {
                year,
                mean_deaths,
                mean_population,
                mean_rate_per_10000: mean_population.and_then(|p| per_10000(mean_deaths, p)),
            };
            (year, baseline)
        })
        .collect()
}
