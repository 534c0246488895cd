//! Mapping from inference outcomes to what the page shows.

use chrono::{DateTime, Local};

use crate::classifier::Label;
use crate::error::ArtifactError;
use crate::handler::{InferenceResult, Outcome};

pub const SPAM_VERDICT: &str = "🚨 SPAM DETECTED!";
pub const NOT_SPAM_VERDICT: &str = "✅ Not Spam";
pub const EMPTY_MESSAGE_WARNING: &str = "Please enter a message.";
pub const PREDICTION_FAILED: &str = "Prediction failed. Please try again.";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn verdict(label: Label) -> &'static str {
    match label {
        Label::Spam => SPAM_VERDICT,
        Label::Ham => NOT_SPAM_VERDICT,
    }
}

/// `0.02` -> `"2.00%"`
pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn confidence_line(probabilities: [f64; 2]) -> String {
    format!(
        "Not Spam: {}, Spam: {}",
        percent(probabilities[0]),
        percent(probabilities[1])
    )
}

pub fn timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn load_failure(error: &ArtifactError) -> String {
    format!("Error loading pipeline: {error}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub verdict: &'static str,
    pub confidence: String,
    pub analyzed_at: String,
    pub spam: bool,
}

impl From<&InferenceResult> for ResultView {
    fn from(result: &InferenceResult) -> Self {
        Self {
            verdict: verdict(result.label()),
            confidence: confidence_line(result.probabilities()),
            analyzed_at: timestamp(result.analyzed_at()),
            spam: result.is_spam(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Warning(String),
    Result(ResultView),
    Error(String),
    /// The artifact failed to load; the form is not offered again.
    Halted(String),
}

impl DisplayState {
    pub fn is_halted(&self) -> bool {
        matches!(self, DisplayState::Halted(_))
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, DisplayState::Result(view) if view.spam)
    }
}

impl From<Outcome> for DisplayState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Warning => DisplayState::Warning(EMPTY_MESSAGE_WARNING.to_string()),
            Outcome::Predicted(result) => DisplayState::Result(ResultView::from(&result)),
            Outcome::PredictionFailed => DisplayState::Error(PREDICTION_FAILED.to_string()),
            Outcome::LoadFailed(e) => DisplayState::Halted(load_failure(&e)),
        }
    }
}
