//! Producing a classifier artifact from a labelled corpus.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use smartcore::linalg::basic::arrays::Array;
use smartcore::metrics::accuracy::Accuracy;
use smartcore::metrics::Metrics;
use smartcore::model_selection::train_test_split;
use sms_data_clean::create_smartcore_input;

use crate::config::TrainConfig;
use crate::error::TrainError;
use crate::pipeline::NaiveBayesPipeline;

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub accuracy: f64,
    pub output_path: PathBuf,
}

/// Fit, evaluate on a held-out split, and write the artifact.
///
/// Nothing is written when held-out accuracy is below
/// `config.min_accuracy`.
pub fn train(config: &TrainConfig) -> Result<TrainReport, TrainError> {
    tracing::info!(data = %config.data_path.display(), "loading corpus");
    let (x, y, vocabulary) = create_smartcore_input::<usize, _>(&config.data_path)?;

    let (x_train, x_test, y_train, y_test) =
        train_test_split(&x, &y, config.test_size, true, Some(config.seed));
    let (n_train, n_test) = (x_train.shape().0, x_test.shape().0);
    tracing::debug!(n_train, n_test, "split corpus");

    let pipeline = NaiveBayesPipeline::fit(&x_train, &y_train, vocabulary)?;
    let y_result = pipeline.predict_matrix(&x_test)?;
    let accuracy = Accuracy::new().get_score(&y_test, &y_result);
    tracing::info!(accuracy, n_train, n_test, "evaluated on held-out split");

    if accuracy < config.min_accuracy {
        return Err(TrainError::AccuracyBelowThreshold {
            accuracy,
            min_accuracy: config.min_accuracy,
        });
    }

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(&config.output_path)?);
    serde_json::to_writer(&mut writer, &pipeline)?;
    writer.flush()?;
    tracing::info!(output = %config.output_path.display(), "wrote classifier artifact");

    Ok(TrainReport {
        n_train,
        n_test,
        n_features: pipeline.n_features(),
        accuracy,
        output_path: config.output_path.clone(),
    })
}
