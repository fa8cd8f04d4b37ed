//! Domain types shared by the cleaner and the aggregators.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// Marker used upstream for collisions geocoded outside the five boroughs.
pub const NOT_NYC: &str = "NOT NYC";

/// One of the five NYC boroughs. Variant order is alphabetical, which is
/// the order every keyed aggregate iterates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Borough {
    Bronx,
    Brooklyn,
    Manhattan,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Manhattan,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Borough {
    type Err = RecordError;

    /// Case-insensitive; accepts both "Staten Island" and "STATEN ISLAND".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "BRONX" | "THE BRONX" => Ok(Borough::Bronx),
            "BROOKLYN" => Ok(Borough::Brooklyn),
            "MANHATTAN" => Ok(Borough::Manhattan),
            "QUEENS" => Ok(Borough::Queens),
            "STATEN ISLAND" => Ok(Borough::StatenIsland),
            _ => Err(RecordError::UnknownBorough {
                value: s.to_string(),
            }),
        }
    }
}

/// Calendar month bucket, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VictimCategory {
    Pedestrian,
    Cyclist,
    Both,
}

impl fmt::Display for VictimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VictimCategory::Pedestrian => write!(f, "Pedestrian"),
            VictimCategory::Cyclist => write!(f, "Cyclist"),
            VictimCategory::Both => write!(f, "Both"),
        }
    }
}

/// A fatality record that passed cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub date: NaiveDate,
    pub month: YearMonth,
    pub borough: Borough,
    pub pedestrians_killed: u32,
    pub cyclists_killed: u32,
    pub total_deaths: u64,
    pub contributing_factor: Option<String>,
    pub vehicle_type: Option<String>,
    pub location: Option<GeoPoint>,
}

impl IncidentRecord {
    /// Builds a record, deriving `total_deaths` and `month` from the inputs.
    pub fn new(
        date: NaiveDate,
        borough: Borough,
        pedestrians_killed: u32,
        cyclists_killed: u32,
    ) -> Self {
        IncidentRecord {
            date,
            month: YearMonth::of(date),
            borough,
            pedestrians_killed,
            cyclists_killed,
            total_deaths: u64::from(pedestrians_killed) + u64::from(cyclists_killed),
            contributing_factor: None,
            vehicle_type: None,
            location: None,
        }
    }

    pub fn with_categories(mut self, factor: Option<&str>, vehicle: Option<&str>) -> Self {
        self.contributing_factor = factor.map(str::to_string);
        self.vehicle_type = vehicle.map(str::to_string);
        self
    }

    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.location = location;
        self
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRecord {
    pub borough: Borough,
    pub year: i32,
    pub population: u64,
}
