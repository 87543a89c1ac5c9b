use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use larder::generation::GenerationConfig;
use larder_server::{
    backend::{BackendError, GeminiBackend, ModelBackend},
    routes::{app, AppState},
};
use serde_json::{json, Value};

/// Backend that records what it was asked and replies from a script.
#[derive(Default)]
struct ScriptedBackend {
    calls: Mutex<Vec<(String, String, Option<GenerationConfig>)>>,
    fail_with: Option<String>,
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Option<&GenerationConfig>,
    ) -> Result<Value, BackendError> {
        self.calls.lock().unwrap().push((
            model.to_string(),
            prompt.to_string(),
            generation_config.cloned(),
        ));
        if let Some(message) = &self.fail_with {
            return Err(BackendError::Upstream {
                status: 403,
                message: message.clone(),
            });
        }
        Ok(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "ok"}]}}],
            "modelVersion": model,
        }))
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

async fn serve_proxy(backend: Arc<ScriptedBackend>) -> String {
    serve(app(AppState {
        backend,
        default_model: "gemini-1.5-flash".to_string(),
    }))
    .await
}

#[tokio::test]
async fn relays_the_raw_provider_response() {
    let backend = Arc::new(ScriptedBackend::default());
    let base = serve_proxy(backend.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({
            "prompt": "Check: tomatoe",
            "generationConfig": {"responseMimeType": "application/json", "responseSchema": {"type": "object"}}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["candidates"][0]["content"]["parts"][0]["text"], "ok");
    assert_eq!(body["modelVersion"], "gemini-1.5-flash");

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (model, prompt, config) = &calls[0];
    assert_eq!(model, "gemini-1.5-flash");
    assert_eq!(prompt, "Check: tomatoe");
    assert_eq!(
        config.as_ref().unwrap().response_mime_type.as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn request_can_choose_the_model() {
    let backend = Arc::new(ScriptedBackend::default());
    let base = serve_proxy(backend.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"prompt": "hi", "modelName": "gemini-1.5-pro"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[0].0, "gemini-1.5-pro");
    assert!(calls[0].2.is_none());
}

#[tokio::test]
async fn malformed_body_is_a_500_with_error() {
    let backend = Arc::new(ScriptedBackend::default());
    let base = serve_proxy(backend.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .header("content-type", "application/json")
        .body("{\"prompt\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid generation request"));
    assert!(backend.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn backend_failure_is_a_500_with_error() {
    let backend = Arc::new(ScriptedBackend {
        fail_with: Some("API key not valid".to_string()),
        ..Default::default()
    });
    let base = serve_proxy(backend).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"prompt": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Model service returned 403: API key not valid"
    );
}

#[tokio::test]
async fn health_is_ok() {
    let base = serve_proxy(Arc::new(ScriptedBackend::default())).await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// What the fake model service saw: path segment, key header, body.
type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

async fn fake_google(
    State(seen): State<Seen>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((call, key.clone(), body));
    if key.as_deref() != Some("good-key") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"corrections\":[]}"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 3}
        })),
    )
}

async fn serve_fake_google() -> (String, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route("/v1beta/models/:call", post(fake_google))
        .with_state(seen.clone());
    (serve(router).await, seen)
}

#[tokio::test]
async fn gemini_backend_speaks_generate_content() {
    let (upstream, seen) = serve_fake_google().await;
    let backend = GeminiBackend::new(
        reqwest::Client::new(),
        &upstream,
        Some("good-key".to_string()),
    );

    let config = GenerationConfig::json(json!({"type": "object"}));
    let response = backend
        .generate_content("gemini-1.5-flash", "hello", Some(&config))
        .await
        .unwrap();
    assert_eq!(response["usageMetadata"]["promptTokenCount"], 3);

    let seen = seen.lock().unwrap();
    let (call, key, body) = &seen[0];
    assert_eq!(call, "gemini-1.5-flash:generateContent");
    assert_eq!(key.as_deref(), Some("good-key"));
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn missing_key_surfaces_as_500_through_the_proxy() {
    let (upstream, seen) = serve_fake_google().await;
    let backend = GeminiBackend::new(reqwest::Client::new(), &upstream, None);
    let base = serve(app(AppState {
        backend: Arc::new(backend),
        default_model: "gemini-1.5-flash".to_string(),
    }))
    .await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .json(&json!({"prompt": "hi"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Model service returned 400: API key not valid. Please pass a valid API key."
    );
    assert_eq!(seen.lock().unwrap()[0].1, None);
}
