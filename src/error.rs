//! Reasons a single input row is rejected by the cleaner.
//!
//! None of these are fatal: the offending row is dropped from every
//! downstream view and counted in the cleaning summary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("unparseable date {value:?}")]
    InvalidDate { value: String },

    #[error("invalid count {value:?} in `{field}`")]
    InvalidCount { field: &'static str, value: String },

    #[error("unknown borough {value:?}")]
    UnknownBorough { value: String },

    #[error("invalid year {value:?}")]
    InvalidYear { value: String },

    #[error("invalid population {value:?}")]
    InvalidPopulation { value: String },
}

impl RecordError {
    /// Stable short name used as a key when tallying rejections.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::MissingField { .. } => "missing_field",
            RecordError::InvalidDate { .. } => "invalid_date",
            RecordError::InvalidCount { .. } => "invalid_count",
            RecordError::UnknownBorough { .. } => "unknown_borough",
            RecordError::InvalidYear { .. } => "invalid_year",
            RecordError::InvalidPopulation { .. } => "invalid_population",
        }
    }
}
