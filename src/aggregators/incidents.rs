use crate::aggregators::types::IncidentPoint;
use crate::aggregators::victim::{VictimRule, categorize};
use crate::models::IncidentRecord;

/// Incidents with known coordinates, tagged by victim category.
pub fn incident_points(records: &[IncidentRecord], rule: VictimRule) -> Vec<IncidentPoint> {
    records
        .iter()
        .filter_map(|r| {
            let location = r.location?;
            Some(IncidentPoint {
                date: r.date,
                month: r.month,
                borough: r.borough,
                latitude: location.latitude,
                longitude: location.longitude,
                total_deaths: r.total_deaths,
                victim: categorize(r.pedestrians_killed, r.cyclists_killed, rule),
                vehicle_type: r.vehicle_type.clone(),
                contributing_factor: r.contributing_factor.clone(),
            })
        })
        .collect()
}
