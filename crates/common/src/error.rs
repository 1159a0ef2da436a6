//! Unified error type for the price forecaster.

use thiserror::Error;

use crate::types::{LocationId, SeriesKey};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Artifact load failed for {name}: {reason}")]
    ArtifactLoad { name: String, reason: String },

    #[error("Insufficient history: need at least {required} values, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("No models available for location {0}")]
    NoModelsForLocation(LocationId),

    #[error("Model for location {location} and series {key} not found")]
    ModelNotFound { location: LocationId, key: SeriesKey },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Inference timed out after {timeout_ms}ms")]
    InferenceTimeout { timeout_ms: u64 },

    #[error("Invalid horizon {requested}: must be between 1 and {max}")]
    InvalidHorizon { requested: usize, max: usize },

    #[error("Unknown name: {0}")]
    UnknownName(String),

    #[error("History source error: {0}")]
    History(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn artifact_load(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::ArtifactLoad {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Only artifact load failures may be skipped while scanning a location.
    pub fn is_recoverable_during_scan(&self) -> bool {
        matches!(self, Error::ArtifactLoad { .. })
    }

    /// Status reported by the request boundary for this kind of failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidHorizon { .. } | Error::UnknownName(_) => 400,
            Error::NoModelsForLocation(_) | Error::ModelNotFound { .. } => 404,
            Error::InsufficientHistory { .. } => 422,
            Error::InferenceTimeout { .. } => 504,
            Error::ArtifactLoad { .. }
            | Error::Inference(_)
            | Error::History(_)
            | Error::Config(_)
            | Error::Json(_)
            | Error::Io(_) => 500,
        }
    }
}
