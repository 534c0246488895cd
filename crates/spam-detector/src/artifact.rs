//! Loading and caching of the classifier artifact.
//!
//! The artifact is read at most once per [`ArtifactCache`]. Both outcomes are
//! memoized: a successful load is shared by every request, and a failed load
//! is reported on every request without retrying.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::classifier::SpamClassifier;
use crate::error::ArtifactError;
use crate::pipeline::NaiveBayesPipeline;

/// File name looked up next to the running executable.
pub const DEFAULT_ARTIFACT_NAME: &str = "spam_detection_pipeline.json";

pub type SharedClassifier = Arc<dyn SpamClassifier>;

/// Reads a classifier from a path.
pub type Loader = Box<dyn Fn(&Path) -> Result<SharedClassifier, ArtifactError> + Send + Sync>;

/// Default artifact location, relative to the application's own binary.
pub fn default_artifact_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_ARTIFACT_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_NAME))
}

/// Deserialize a [`NaiveBayesPipeline`] from a JSON file.
pub fn load_naive_bayes(path: &Path) -> Result<SharedClassifier, ArtifactError> {
    let file = File::open(path).map_err(|e| ArtifactError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let pipeline: NaiveBayesPipeline =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                ArtifactError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            } else {
                ArtifactError::Deserialize {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;
    pipeline
        .validate()
        .map_err(|message| ArtifactError::Deserialize {
            path: path.to_path_buf(),
            message,
        })?;
    tracing::debug!(n_features = pipeline.n_features(), "deserialized pipeline");
    Ok(Arc::new(pipeline))
}

/// Once-initialized handle to the process-wide classifier.
pub struct ArtifactCache {
    path: PathBuf,
    loader: Loader,
    slot: OnceLock<Result<SharedClassifier, ArtifactError>>,
}

impl ArtifactCache {
    /// Cache that loads a naive Bayes artifact from `path` on first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, Box::new(load_naive_bayes))
    }

    /// Cache that loads through a custom loader on first use
    pub fn with_loader(path: impl Into<PathBuf>, loader: Loader) -> Self {
        Self {
            path: path.into(),
            loader,
            slot: OnceLock::new(),
        }
    }

    /// Cache that is already populated with `classifier`
    pub fn preloaded(classifier: SharedClassifier) -> Self {
        let cache = Self::with_loader(
            PathBuf::new(),
            Box::new(|path: &Path| {
                Err(ArtifactError::Read {
                    path: path.to_path_buf(),
                    message: "preloaded cache has no backing file".to_string(),
                })
            }),
        );
        let _ = cache.slot.set(Ok(classifier));
        cache
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached classifier, loading it if this is the first call.
    pub fn get(&self) -> Result<SharedClassifier, ArtifactError> {
        self.slot
            .get_or_init(|| {
                tracing::info!(path = %self.path.display(), "loading classifier artifact");
                let loaded = (self.loader)(&self.path);
                match &loaded {
                    Ok(classifier) => {
                        tracing::info!(classifier = classifier.name(), "classifier artifact loaded")
                    }
                    Err(e) => tracing::error!(error = %e, "failed to load classifier artifact"),
                }
                loaded
            })
            .clone()
    }

    /// Whether a load has been attempted and succeeded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }
}

impl std::fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
