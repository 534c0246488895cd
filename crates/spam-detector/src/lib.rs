//! Single-page SMS spam detector.
//!
//! A pre-trained classifier artifact is loaded once per process
//! ([`artifact::ArtifactCache`]) and every form submission is classified
//! synchronously by the [`handler::InferenceHandler`].

pub mod artifact;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod server;
pub mod train;
pub mod view;

pub use artifact::{ArtifactCache, SharedClassifier};
pub use classifier::{Label, SpamClassifier};
pub use error::{ArtifactError, PredictionError, TrainError};
pub use handler::{InferenceHandler, InferenceRequest, InferenceResult, Outcome};
pub use pipeline::NaiveBayesPipeline;
pub use server::{build_app, run_server, AppState};
pub use view::DisplayState;
