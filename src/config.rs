use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::aggregators::rolling::RollingMinPeriods;
use crate::aggregators::victim::VictimRule;

/// 365 days.
const DEFAULT_ROLLING_WINDOW: NonZeroUsize = NonZeroUsize::MIN.saturating_add(364);

/// Tunables for the aggregation step.
///
/// Stored as a JSON object on disk; every key is optional:
/// ```json
/// {
///   "excluded_years": [2012, 2020],
///   "population_excluded_years": [2012],
///   "ranking_min_total": 5,
///   "rolling_window_days": 365,
///   "rolling_min_periods": "partial",
///   "victim_rule": "literal"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Years with incomplete incident data, left out of the yearly and grid views.
    pub excluded_years: Vec<i32>,
    pub population_excluded_years: Vec<i32>,
    /// Inclusive lower bound for a category to appear in a ranking.
    pub ranking_min_total: u64,
    /// Zero is rejected when the settings are deserialized.
    pub rolling_window_days: NonZeroUsize,
    pub rolling_min_periods: RollingMinPeriods,
    pub victim_rule: VictimRule,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        AggregationSettings {
            excluded_years: vec![2012, 2020],
            population_excluded_years: vec![2012],
            ranking_min_total: 5,
            rolling_window_days: DEFAULT_ROLLING_WINDOW,
            rolling_min_periods: RollingMinPeriods::Partial,
            victim_rule: VictimRule::Literal,
        }
    }
}

impl AggregationSettings {
    /// Loads the settings from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn is_excluded_year(&self, year: i32) -> bool {
        self.excluded_years.contains(&year)
    }
}

/// Everything a single pipeline run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub incidents_path: PathBuf,
    pub population_path: PathBuf,
    pub settings: AggregationSettings,
}

impl PipelineConfig {
    pub fn new(incidents_path: impl Into<PathBuf>, population_path: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            incidents_path: incidents_path.into(),
            population_path: population_path.into(),
            settings: AggregationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: AggregationSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_defaults() {
        let s = AggregationSettings::default();
        assert!(s.is_excluded_year(2012));
        assert!(s.is_excluded_year(2020));
        assert!(!s.is_excluded_year(2015));
        assert_eq!(s.ranking_min_total, 5);
        assert_eq!(s.rolling_window_days.get(), 365);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = temp_path("nyc_fatalities_settings_partial.json");
        fs::write(&path, r#"{ "ranking_min_total": 2, "victim_rule": "at_least_one" }"#).unwrap();

        let s = AggregationSettings::load(&path).unwrap();
        assert_eq!(s.ranking_min_total, 2);
        assert_eq!(s.victim_rule, VictimRule::AtLeastOne);
        assert_eq!(s.excluded_years, vec![2012, 2020]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_zero_window() {
        let path = temp_path("nyc_fatalities_settings_zero_window.json");
        fs::write(&path, r#"{ "rolling_window_days": 0 }"#).unwrap();

        assert!(AggregationSettings::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_zero_window_never_deserializes() {
        let parsed = serde_json::from_str::<AggregationSettings>(r#"{ "rolling_window_days": 0 }"#);
        assert!(parsed.is_err());

        let s: AggregationSettings =
            serde_json::from_str(r#"{ "rolling_window_days": 30 }"#).unwrap();
        assert_eq!(s.rolling_window_days.get(), 30);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AggregationSettings::load(temp_path("nyc_fatalities_no_such_file.json")).is_err());
    }
}
