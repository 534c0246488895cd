//! The web form.

use std::sync::Arc;

use askama_axum::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::artifact::ArtifactCache;
use crate::config::ServeConfig;
use crate::handler::InferenceHandler;
use crate::view::{self, DisplayState};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<InferenceHandler>,
}

impl AppState {
    pub fn new(artifacts: Arc<ArtifactCache>) -> Self {
        Self {
            handler: Arc::new(InferenceHandler::new(artifacts)),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    message: String,
    state: DisplayState,
}

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub message: String,
}

fn page(message: String, state: DisplayState) -> Response {
    let status = if state.is_halted() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, IndexTemplate { message, state }).into_response()
}

pub async fn index(State(state): State<AppState>) -> Response {
    let handler = state.handler.clone();
    let loaded = tokio::task::spawn_blocking(move || handler.artifacts().get().map(|_| ())).await;
    let display = match loaded {
        Ok(Ok(())) => DisplayState::Idle,
        Ok(Err(e)) => DisplayState::Halted(view::load_failure(&e)),
        Err(e) => {
            tracing::error!(error = %e, "artifact load task failed");
            DisplayState::Error(view::PREDICTION_FAILED.to_string())
        }
    };
    page(String::new(), display)
}

// Classification is synchronous and may be the first to touch the artifact,
// so it runs on the blocking pool. A panicking classifier surfaces as a join
// error and is reported like any other prediction failure.
pub async fn predict(State(state): State<AppState>, Form(form): Form<PredictForm>) -> Response {
    let handler = state.handler.clone();
    let message = form.message.clone();
    let display = match tokio::task::spawn_blocking(move || handler.handle(&message)).await {
        Ok(outcome) => DisplayState::from(outcome),
        Err(e) => {
            tracing::error!(error = %e, "prediction task failed");
            DisplayState::Error(view::PREDICTION_FAILED.to_string())
        }
    };
    page(form.message, display)
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model_loaded": state.handler.artifacts().is_loaded(),
    }))
}

/// Build the Axum application
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server
pub async fn run_server(config: ServeConfig) -> anyhow::Result<()> {
    let artifacts = Arc::new(ArtifactCache::new(&config.artifact_path));
    // Failures are memoized and shown on every page.
    if let Err(e) = artifacts.get() {
        tracing::error!(error = %e, "classifier unavailable, the form is disabled");
    }

    let app = build_app(AppState::new(artifacts));

    tracing::info!("Starting spam detector on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
