//! Upstream model service.
//!
//! The HTTP handler only sees [`ModelBackend`]; [`GeminiBackend`] is the
//! implementation that talks to Google's `generateContent` REST API.

use async_trait::async_trait;
use larder::generation::GenerationConfig;
use larder::provider::{Content, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("Request to model service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Model service returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("Model service returned a non-JSON body: {0}")]
    InvalidBody(String),
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Run one generation and hand back the provider's response as-is.
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Option<&GenerationConfig>,
    ) -> Result<Value, BackendError>;
}

#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<&'a GenerationConfig>,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

impl GeminiBackend {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Option<&GenerationConfig>,
    ) -> Result<Value, BackendError> {
        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
                role: Some("user".to_string()),
            }],
            generation_config,
        };
        let mut request = self.client.post(self.endpoint(model)).json(&body);
        match &self.api_key {
            Some(key) => request = request.header("x-goog-api-key", key),
            // The service will refuse this; its refusal is what the caller sees.
            None => tracing::warn!("No API key configured, calling model service unauthenticated"),
        }

        tracing::info!(model, prompt_len = prompt.len(), "Calling model service");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&text).map_err(|e| BackendError::InvalidBody(e.to_string()))
    }
}
