use std::collections::HashMap;
use tracing::debug;

use crate::aggregators::types::CategoryTotal;
use crate::models::IncidentRecord;

/// Which free-text category column a ranking is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    ContributingFactor,
    VehicleType,
}

impl CategoryField {
    fn value<'a>(&self, record: &'a IncidentRecord) -> Option<&'a str> {
        match self {
            CategoryField::ContributingFactor => record.contributing_factor.as_deref(),
            CategoryField::VehicleType => record.vehicle_type.as_deref(),
        }
    }
}

/// Sums deaths per category, keeps totals of at least `min_total`, and sorts
/// ascending by total. Ties are broken by category name.
///
/// Records without a value for the field are skipped.
pub fn rank_categories(
    records: &[IncidentRecord],
    field: CategoryField,
    min_total: u64,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for r in records {
        if let Some(category) = field.value(r) {
            *totals.entry(category).or_default() += r.total_deaths;
        }
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .filter(|(_, total)| *total >= min_total)
        .map(|(category, total_deaths)| CategoryTotal {
            category: category.to_string(),
            total_deaths,
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.total_deaths
            .cmp(&b.total_deaths)
            .then_with(|| a.category.cmp(&b.category))
    });

    if ranked.is_empty() {
        debug!(?field, min_total, "No category reached the ranking threshold");
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Borough;
    use chrono::NaiveDate;

    fn record(factor: &str, vehicle: &str, deaths: u32) -> IncidentRecord {
        IncidentRecord::new(
            NaiveDate::from_ymd_opt(2017, 4, 1).unwrap(),
            Borough::Manhattan,
            deaths,
            0,
        )
        .with_categories(Some(factor), Some(vehicle))
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record("Unspecified", "Sedan", 3),
            record("Unspecified", "Bus", 4),
            record("Driver Inattention/Distraction", "Sedan", 2),
            record("Driver Inattention/Distraction", "Sedan", 3),
            record("Failure to Yield Right-of-Way", "Box Truck", 4),
            record("Failure to Yield Right-of-Way", "Box Truck", 2),
        ]
    }

    #[test]
    fn test_threshold_is_inclusive_and_sorted_ascending() {
        let ranked = rank_categories(&sample(), CategoryField::ContributingFactor, 5);
        assert_eq!(
            ranked,
            vec![
                CategoryTotal {
                    category: "Driver Inattention/Distraction".to_string(),
                    total_deaths: 5
                },
                CategoryTotal {
                    category: "Failure to Yield Right-of-Way".to_string(),
                    total_deaths: 6
                },
                CategoryTotal {
                    category: "Unspecified".to_string(),
                    total_deaths: 7
                },
            ]
        );
    }

    #[test]
    fn test_vehicle_ranking_filters_below_threshold() {
        let ranked = rank_categories(&sample(), CategoryField::VehicleType, 5);
        let names: Vec<&str> = ranked.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Box Truck", "Sedan"]);
        assert!(ranked.iter().all(|c| c.total_deaths >= 5));
        assert!(ranked.windows(2).all(|w| w[0].total_deaths <= w[1].total_deaths));
    }

    #[test]
    fn test_ties_break_by_name() {
        let records = vec![record("B", "x", 5), record("A", "y", 5)];
        let ranked = rank_categories(&records, CategoryField::ContributingFactor, 5);
        assert_eq!(ranked[0].category, "A");
        assert_eq!(ranked[1].category, "B");
    }

    #[test]
    fn test_nothing_above_threshold_is_empty() {
        let ranked = rank_categories(&sample(), CategoryField::ContributingFactor, 100);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_missing_category_is_skipped() {
        let mut r = record("x", "y", 9);
        r.contributing_factor = None;
        let ranked = rank_categories(&[r], CategoryField::ContributingFactor, 1);
        assert!(ranked.is_empty());
    }
}
