//! Classifier trait

use crate::error::PredictionError;
pub use sms_data_clean::Label;

/// A pre-trained binary spam classifier.
///
/// Both operations take a batch of raw messages and return one entry per
/// message, in order. Probabilities are `[not_spam, spam]`.
pub trait SpamClassifier: Send + Sync {
    /// Predict the label of each message
    fn predict(&self, batch: &[&str]) -> Result<Vec<Label>, PredictionError>;

    /// Predict per-class probabilities of each message
    fn predict_proba(&self, batch: &[&str]) -> Result<Vec<[f64; 2]>, PredictionError>;

    /// Name used in logs
    fn name(&self) -> &str {
        "classifier"
    }
}
