//! Multinomial naive Bayes text pipeline.
//!
//! The serialized form of this struct is the artifact the server loads. It
//! bundles the vocabulary with the fitted model so a raw message can be
//! classified without any other state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use sms_data_clean::{bag_of_words, tokenize_message};

use crate::classifier::{Label, SpamClassifier};
use crate::error::{PredictionError, TrainError};

/// Additive (Laplace) smoothing applied to feature counts.
pub const ALPHA: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesPipeline {
    vocabulary: HashMap<String, usize>,
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl NaiveBayesPipeline {
    /// Fit on a bag-of-words matrix whose columns follow `vocabulary`.
    /// Targets are 0 for ham and 1 for spam.
    pub fn fit(
        x: &DenseMatrix<usize>,
        y: &[usize],
        vocabulary: HashMap<String, usize>,
    ) -> Result<Self, TrainError> {
        let (n_rows, n_features) = x.shape();
        if n_rows != y.len() {
            return Err(TrainError::ShapeMismatch {
                n_rows,
                n_labels: y.len(),
            });
        }

        let mut class_count = [0usize; 2];
        let mut feature_count = [vec![0usize; n_features], vec![0usize; n_features]];
        for (row, &target) in y.iter().enumerate() {
            let class = Label::from_index(target)
                .ok_or(TrainError::UnknownLabel(target))?
                .index();
            class_count[class] += 1;
            for (col, count) in feature_count[class].iter_mut().enumerate() {
                *count += *x.get((row, col));
            }
        }
        if class_count.contains(&0) {
            return Err(TrainError::SingleClass);
        }

        let class_log_prior = class_count.map(|count| (count as f64 / n_rows as f64).ln());
        let feature_log_prob = feature_count.map(|counts| {
            let total = counts.iter().sum::<usize>() as f64 + ALPHA * n_features as f64;
            counts
                .into_iter()
                .map(|count| ((count as f64 + ALPHA) / total).ln())
                .collect::<Vec<f64>>()
        });

        tracing::debug!(
            ham = class_count[0],
            spam = class_count[1],
            n_features,
            "fitted naive bayes pipeline"
        );

        Ok(Self {
            vocabulary,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Checks that every vocabulary index has a weight in both classes.
    pub fn validate(&self) -> Result<(), String> {
        let n_features = self.n_features();
        if let Some((token, index)) = self
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= n_features)
        {
            return Err(format!(
                "token {token:?} has index {index} but the vocabulary has {n_features} entries"
            ));
        }
        for (class, weights) in self.feature_log_prob.iter().enumerate() {
            if weights.len() != n_features {
                return Err(format!(
                    "class {class} has {} feature weights, expected {n_features}",
                    weights.len()
                ));
            }
        }
        if !self.class_log_prior.iter().all(|p| p.is_finite()) {
            return Err("class log priors must be finite".to_string());
        }
        Ok(())
    }

    /// Labels (0 or 1) for each row of an already vectorized matrix.
    pub fn predict_matrix(&self, x: &DenseMatrix<usize>) -> Result<Vec<usize>, PredictionError> {
        let (n_rows, n_cols) = x.shape();
        (0..n_rows)
            .map(|row| {
                let counts: Vec<usize> = (0..n_cols).map(|col| *x.get((row, col))).collect();
                let proba = self.proba_from_counts(&counts)?;
                Ok(label_of(proba).index())
            })
            .collect()
    }

    fn proba_of(&self, sms: &str) -> Result<[f64; 2], PredictionError> {
        let counts = bag_of_words::<usize>(tokenize_message(sms), &self.vocabulary);
        self.proba_from_counts(&counts)
    }

    fn proba_from_counts(&self, counts: &[usize]) -> Result<[f64; 2], PredictionError> {
        let jll = self.joint_log_likelihood(counts)?;
        let max = jll[0].max(jll[1]);
        let exp = jll.map(|v| (v - max).exp());
        let norm = exp[0] + exp[1];
        let proba = exp.map(|v| v / norm);
        if proba.iter().all(|p| p.is_finite()) {
            Ok(proba)
        } else {
            Err(PredictionError::InvalidProbabilities(proba[0], proba[1]))
        }
    }

    fn joint_log_likelihood(&self, counts: &[usize]) -> Result<[f64; 2], PredictionError> {
        let mut jll = self.class_log_prior;
        for (index, &count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
            for (class, weights) in self.feature_log_prob.iter().enumerate() {
                let weight = weights
                    .as_slice()
                    .get(index)
                    .ok_or(PredictionError::FeatureOutOfRange {
                        index,
                        n_features: weights.len(),
                    })?;
                jll[class] += count as f64 * weight;
            }
        }
        Ok(jll)
    }
}

// Ties go to ham.
fn label_of(proba: [f64; 2]) -> Label {
    if proba[1] > proba[0] {
        Label::Spam
    } else {
        Label::Ham
    }
}

impl SpamClassifier for NaiveBayesPipeline {
    fn predict(&self, batch: &[&str]) -> Result<Vec<Label>, PredictionError> {
        batch
            .iter()
            .map(|sms| self.proba_of(sms).map(label_of))
            .collect()
    }

    fn predict_proba(&self, batch: &[&str]) -> Result<Vec<[f64; 2]>, PredictionError> {
        batch.iter().map(|sms| self.proba_of(sms)).collect()
    }

    fn name(&self) -> &str {
        "multinomial-naive-bayes"
    }
}
