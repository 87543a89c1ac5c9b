use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use larder::generation::GenerationRequest;
use serde_json::Value;

use crate::backend::ModelBackend;
use crate::errors::WebResult;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ModelBackend>,
    pub default_model: String,
}

/// Build the router for the proxy.
pub fn app(state: AppState) -> Router {
    Router::new()
        // `GET /health` goes to `health`
        .route("/health", get(health))
        // `POST /api/generate` goes to `generate`
        .route("/api/generate", post(generate))
        .layer(
            tower_http::compression::CompressionLayer::new()
                .quality(tower_http::CompressionLevel::Fastest),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// Just reply that everything is okay
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Forward one prompt to the model service and relay its response verbatim.
///
/// The body is parsed here rather than by the `Json` extractor so that a
/// malformed body is answered like every other failure: 500 with `{error}`.
async fn generate(State(state): State<AppState>, body: Bytes) -> WebResult<Json<Value>> {
    let request: GenerationRequest = serde_json::from_slice(&body)?;
    let model = request
        .model_name
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(state.default_model.as_str());
    let response = state
        .backend
        .generate_content(model, &request.prompt, request.generation_config.as_ref())
        .await?;
    Ok(Json(response))
}
