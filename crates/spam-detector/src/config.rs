//! Runtime configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::artifact::default_artifact_path;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_TEST_SIZE: f32 = 0.2;
pub const DEFAULT_SEED: u64 = 10;
pub const DEFAULT_MIN_ACCURACY: f64 = 0.9;

/// Web server configuration
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Listen address
    pub addr: SocketAddr,

    /// Classifier artifact to load
    pub artifact_path: PathBuf,
}

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Labelled corpus, one `ham|spam<TAB>message` per line
    pub data_path: PathBuf,

    /// Where the artifact is written
    pub output_path: PathBuf,

    /// Fraction of the corpus held out for evaluation
    pub test_size: f32,

    /// Shuffle seed for the train/test split
    pub seed: u64,

    /// Below this held-out accuracy no artifact is written
    pub min_accuracy: f64,
}

impl TrainConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            output_path: default_artifact_path(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            min_accuracy: DEFAULT_MIN_ACCURACY,
        }
    }
}
