//! Error types for the spam detector

use std::path::PathBuf;

/// Failure to bring the classifier artifact into memory.
///
/// Cloneable so that a failed load can be memoized and reported on every
/// subsequent request without touching the filesystem again.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact file could not be opened or read
    #[error("cannot read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// The artifact file was read but is not a valid classifier
    #[error("cannot deserialize {}: {message}", .path.display())]
    Deserialize { path: PathBuf, message: String },
}

/// Failure raised by a classifier while answering a request.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// The classifier returned fewer results than inputs
    #[error("classifier returned no result for the input")]
    EmptyOutput,

    /// The artifact references a feature it has no weights for
    #[error("feature {index} is out of range for a model with {n_features} features")]
    FeatureOutOfRange { index: usize, n_features: usize },

    /// Probabilities outside [0, 1] or not summing to one
    #[error("invalid class probabilities [{0}, {1}]")]
    InvalidProbabilities(f64, f64),

    /// Any other classifier-specific failure
    #[error("classifier error: {0}")]
    Classifier(String),
}

impl PredictionError {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }
}

/// Failure while producing a new artifact from a labelled corpus.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("corpus error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus must contain both ham and spam messages")]
    SingleClass,

    #[error("label {0} is neither ham (0) nor spam (1)")]
    UnknownLabel(usize),

    #[error("{n_rows} feature rows but {n_labels} labels")]
    ShapeMismatch { n_rows: usize, n_labels: usize },

    #[error("accuracy {accuracy:.4} is below the required {min_accuracy:.4}")]
    AccuracyBelowThreshold { accuracy: f64, min_accuracy: f64 },

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] PredictionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
