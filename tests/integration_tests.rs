use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;
use nyc_fatalities::cleaner::clean_incidents;
use nyc_fatalities::config::PipelineConfig;
use nyc_fatalities::loader::load_incidents;
use nyc_fatalities::models::{Borough, YearMonth};
use nyc_fatalities::pipeline::run;
use nyc_fatalities::selection::{BoroughSelection, SelectionCommand};
use std::io::Write;
use std::{env, fs};

const INCIDENTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/incidents.csv");
const POPULATION: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/population.csv");

fn fixture_config() -> PipelineConfig {
    PipelineConfig::new(INCIDENTS, POPULATION)
}

#[test]
fn test_cleaning_fixture() {
    let raw = load_incidents(INCIDENTS).expect("Failed to load fixture");
    assert_eq!(raw.rows.len(), 12);

    let outcome = clean_incidents(&raw.rows);
    assert_eq!(outcome.records.len(), 9);
    assert_eq!(outcome.out_of_scope, 2);
    assert_eq!(outcome.rejected.get("invalid_date"), Some(&1));
    for r in &outcome.records {
        assert_eq!(
            r.total_deaths,
            u64::from(r.pedestrians_killed) + u64::from(r.cyclists_killed)
        );
    }
}

#[test]
fn test_full_pipeline() {
    let dashboard = run(&fixture_config()).expect("Pipeline failed");

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

    let years: Vec<(i32, u64)> = dashboard
        .yearly
        .iter()
        .map(|y| (y.year, y.total_deaths))
        .collect();
    assert_eq!(
        years,
        vec![(2015, 4), (2016, 2), (2017, 1), (2018, 2), (2019, 1)]
    );

    let factors: Vec<(&str, u64)> = dashboard
        .factor_ranking
        .iter()
        .map(|c| (c.category.as_str(), c.total_deaths))
        .collect();
    assert_eq!(
        factors,
        vec![("Driver Inattention/Distraction", 5), ("Unspecified", 6)]
    );

    let vehicles: Vec<(&str, u64)> = dashboard
        .vehicle_ranking
        .iter()
        .map(|c| (c.category.as_str(), c.total_deaths))
        .collect();
    assert_eq!(vehicles, vec![("Sedan", 7)]);
}

#[test]
fn test_grid_from_fixture() {
    let dashboard = run(&fixture_config()).expect("Pipeline failed");
    let grid = &dashboard.borough_year;

    assert_eq!(grid.cells.len(), 6);
    assert!(grid.cells.iter().all(|c| c.year != 2012 && c.year != 2020));

    let bronx = grid.cell(Borough::Bronx, 2015).unwrap();
    assert_eq!(bronx.total_deaths, 3);
    assert_eq!(bronx.population, Some(1_500_000));
    let rate = bronx.rate_per_10000.unwrap();
    assert!((rate - 0.02).abs() < 1e-12);

    let baseline = grid.baseline(2015).unwrap();
    assert_eq!(baseline.mean_deaths, 2.0);
    assert_eq!(baseline.mean_population, Some(1_900_000.0));
}

#[test]
fn test_rolling_covers_global_range_per_borough() {
    let dashboard = run(&fixture_config()).expect("Pipeline failed");

    let start = NaiveDate::from_ymd_opt(2012, 12, 30).unwrap();
    let end = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let days = (end - start).num_days() as usize + 1;

    assert_eq!(dashboard.rolling.len(), days * 5);
    for borough in Borough::ALL {
        let series: Vec<_> = dashboard
            .rolling
            .iter()
            .filter(|p| p.borough == borough)
            .collect();
        assert_eq!(series.len(), days);
        assert_eq!(series.first().unwrap().date, start);
        assert_eq!(series.last().unwrap().date, end);
    }

    let selection = {
        let mut s = BoroughSelection::default();
        s.apply_command(SelectionCommand::SetActive(vec![Borough::Queens]));
        s
    };
    let queens = selection.apply(&dashboard.rolling);
    assert_eq!(queens.len(), days);
    assert!(queens.iter().all(|p| p.borough == Borough::Queens));
}

#[test]
fn test_incident_map_view() {
    let dashboard = run(&fixture_config()).expect("Pipeline failed");
    // Rows with both coordinates: 2012 Manhattan, Bronx 03-03, Queens, Brooklyn,
    // Staten Island, Manhattan 2018, Bronx 2020.
    assert_eq!(dashboard.incidents.len(), 7);
}

#[test]
fn test_pipeline_is_idempotent() {
    let a = run(&fixture_config()).expect("Pipeline failed");
    let b = run(&fixture_config()).expect("Pipeline failed");
    assert_eq!(a, b);
}

#[test]
fn test_gzip_input_gives_same_dashboard() {
    let gz_path = env::temp_dir().join("nyc_fatalities_it_incidents.csv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&fs::read(INCIDENTS).unwrap())
        .unwrap();
    fs::write(&gz_path, encoder.finish().unwrap()).unwrap();

    let plain = run(&fixture_config()).expect("Pipeline failed");
    let gzipped = run(&PipelineConfig::new(&gz_path, POPULATION)).expect("Pipeline failed");
    assert_eq!(plain, gzipped);

    fs::remove_file(&gz_path).unwrap();
}

#[test]
fn test_missing_input_is_fatal() {
    let config = PipelineConfig::new("does/not/exist.csv", POPULATION);
    assert!(run(&config).is_err());
}
