//! Inference handler: one synchronous classification per user action.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::artifact::ArtifactCache;
use crate::classifier::{Label, SpamClassifier};
use crate::error::{ArtifactError, PredictionError};

/// Allowed deviation of `not_spam + spam` from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// A user message, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    message: String,
}

impl InferenceRequest {
    /// `None` when nothing but whitespace was submitted.
    pub fn parse(raw: &str) -> Option<Self> {
        let message = raw.trim();
        if message.is_empty() {
            None
        } else {
            Some(Self {
                message: message.to_string(),
            })
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    label: Label,
    probabilities: [f64; 2],
    analyzed_at: DateTime<Local>,
}

impl InferenceResult {
    /// Rejects probability pairs outside `[0, 1]` or not summing to one.
    pub fn new(
        label: Label,
        probabilities: [f64; 2],
        analyzed_at: DateTime<Local>,
    ) -> Result<Self, PredictionError> {
        let [not_spam, spam] = probabilities;
        let in_range = probabilities.iter().all(|p| (0.0..=1.0).contains(p));
        if !in_range || (not_spam + spam - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(PredictionError::InvalidProbabilities(not_spam, spam));
        }
        Ok(Self {
            label,
            probabilities,
            analyzed_at,
        })
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn is_spam(&self) -> bool {
        self.label.is_spam()
    }

    /// `[not_spam, spam]`
    pub fn probabilities(&self) -> [f64; 2] {
        self.probabilities
    }

    pub fn not_spam_probability(&self) -> f64 {
        self.probabilities[0]
    }

    pub fn spam_probability(&self) -> f64 {
        self.probabilities[1]
    }

    pub fn analyzed_at(&self) -> DateTime<Local> {
        self.analyzed_at
    }
}

/// What a single user action produced.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to classify; the classifier was not called
    Warning,
    Predicted(InferenceResult),
    /// Classifier failed; the error has been logged
    PredictionFailed,
    /// The artifact could not be loaded; no further processing happens
    LoadFailed(ArtifactError),
}

#[derive(Debug)]
pub struct InferenceHandler {
    artifacts: Arc<ArtifactCache>,
}

impl InferenceHandler {
    pub fn new(artifacts: Arc<ArtifactCache>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.artifacts
    }

    pub fn handle(&self, raw: &str) -> Outcome {
        self.handle_at(raw, Local::now())
    }

    /// Like [`handle`](Self::handle) with an explicit analysis time.
    pub fn handle_at(&self, raw: &str, analyzed_at: DateTime<Local>) -> Outcome {
        let classifier = match self.artifacts.get() {
            Ok(classifier) => classifier,
            Err(e) => return Outcome::LoadFailed(e),
        };

        let Some(request) = InferenceRequest::parse(raw) else {
            tracing::debug!("rejected empty message");
            return Outcome::Warning;
        };

        match classify(classifier.as_ref(), &request, analyzed_at) {
            Ok(result) => {
                tracing::info!(
                    label = %result.label(),
                    spam_probability = result.spam_probability(),
                    chars = request.message().chars().count(),
                    "message classified"
                );
                Outcome::Predicted(result)
            }
            Err(e) => {
                tracing::error!(classifier = classifier.name(), error = %e, "prediction failed");
                Outcome::PredictionFailed
            }
        }
    }
}

/// Runs `predict` and `predict_proba` on a one-message batch.
pub fn classify(
    classifier: &dyn SpamClassifier,
    request: &InferenceRequest,
    analyzed_at: DateTime<Local>,
) -> Result<InferenceResult, PredictionError> {
    let batch = [request.message()];
    let label = classifier
        .predict(&batch)?
        .into_iter()
        .next()
        .ok_or(PredictionError::EmptyOutput)?;
    let probabilities = classifier
        .predict_proba(&batch)?
        .into_iter()
        .next()
        .ok_or(PredictionError::EmptyOutput)?;
    InferenceResult::new(label, probabilities, analyzed_at)
}
