//! Crate-level error taxonomy.
//!
//! Layer-specific errors ([`DatasetError`], [`PreprocessingError`],
//! [`ModelError`], [`TrainError`]) convert into [`RiskError`] so orchestration code can use `?`
//! throughout.

use crate::dataset::DatasetError;
use crate::model::ModelError;
use crate::preprocessing::PreprocessingError;
use crate::trainer::TrainError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = RiskError> = std::result::Result<T, E>;

/// Why a feature value was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum InputProblem {
    /// The field was absent.
    Missing,
    /// The field was present but could not be read as a number.
    NotNumeric(String),
    /// The value parsed but is NaN or infinite.
    NotFinite,
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputProblem::Missing => write!(f, "is missing"),
            InputProblem::NotNumeric(raw) => write!(f, "is not numeric: {:?}", raw),
            InputProblem::NotFinite => write!(f, "is not a finite number"),
        }
    }
}

/// A feature was missing or not numeric.
///
/// The message always lists the three required field names so callers can
/// surface it verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "please provide three numeric values: age, medical_visits_frequency, \
     physical_activity_level (`{field}` {problem})"
)]
pub struct InvalidInputError {
    pub field: &'static str,
    pub problem: InputProblem,
}

impl InvalidInputError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            problem: InputProblem::Missing,
        }
    }

    pub fn not_numeric(field: &'static str, raw: impl Into<String>) -> Self {
        Self {
            field,
            problem: InputProblem::NotNumeric(raw.into()),
        }
    }

    pub fn not_finite(field: &'static str) -> Self {
        Self {
            field,
            problem: InputProblem::NotFinite,
        }
    }
}

/// Errors produced by data generation, training, persistence and prediction.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("insufficient data: {samples} samples available, at least {required} required")]
    InsufficientData { samples: usize, required: usize },

    #[error("model artifact '{path}' is corrupt: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error("preprocessing failed: {0}")]
    Preprocessing(#[from] PreprocessingError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("training failed: {0}")]
    Train(#[from] TrainError),
}

impl RiskError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        RiskError::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether retraining is the expected recovery for this error.
    pub fn is_artifact_corrupt(&self) -> bool {
        matches!(self, RiskError::ArtifactCorrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_all_fields() {
        let err = InvalidInputError::missing("medical_visits_frequency");
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("medical_visits_frequency"));
        assert!(msg.contains("physical_activity_level"));
        assert!(msg.contains("is missing"));
    }

    #[test]
    fn test_not_numeric_keeps_raw_value() {
        let err = InvalidInputError::not_numeric("age", "forty");
        assert!(err.to_string().contains("\"forty\""));
    }

    #[test]
    fn test_invalid_input_converts_transparently() {
        let err: RiskError = InvalidInputError::not_finite("age").into();
        assert!(matches!(err, RiskError::InvalidInput(_)));
        assert!(err.to_string().starts_with("please provide three numeric values"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = RiskError::InsufficientData {
            samples: 3,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 3 samples available, at least 5 required"
        );
    }

    #[test]
    fn test_corrupt_helper() {
        let err = RiskError::corrupt("model.json", "bad tag");
        assert!(err.is_artifact_corrupt());
        assert!(err.to_string().contains("model.json"));
        assert!(err.to_string().contains("bad tag"));
    }
}
