//! Mock classifiers for testing

use spam_detector::{Label, PredictionError, SpamClassifier};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// A configurable mock classifier
pub struct MockClassifier {
    label: Label,
    probabilities: [f64; 2],
    failing: AtomicBool,
    panicking: AtomicBool,
    call_count: AtomicU32,
}

impl MockClassifier {
    /// Create a mock answering `label` with `probabilities`
    pub fn new(label: Label, probabilities: [f64; 2]) -> Self {
        Self {
            label,
            probabilities,
            failing: AtomicBool::new(false),
            panicking: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
        }
    }

    /// Make subsequent calls fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make subsequent calls panic (or stop panicking)
    pub fn set_panicking(&self, panicking: bool) {
        self.panicking.store(panicking, Ordering::SeqCst);
    }

    /// Number of predict/predict_proba calls so far
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PredictionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.panicking.load(Ordering::SeqCst) {
            panic!("model panicked");
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(PredictionError::classifier("model blew up"))
        } else {
            Ok(())
        }
    }
}

impl SpamClassifier for MockClassifier {
    fn predict(&self, batch: &[&str]) -> Result<Vec<Label>, PredictionError> {
        self.check()?;
        Ok(vec![self.label; batch.len()])
    }

    fn predict_proba(&self, batch: &[&str]) -> Result<Vec<[f64; 2]>, PredictionError> {
        self.check()?;
        Ok(vec![self.probabilities; batch.len()])
    }

    fn name(&self) -> &str {
        "mock"
    }
}
