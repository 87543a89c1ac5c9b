use async_trait::async_trait;
use larder::generation::{ErrorBody, GenerationRequest};
use larder::provider::GenerateContentResponse;
use reqwest::Client;

use super::FacadeError;

/// Something that can turn a [`GenerationRequest`] into a provider response.
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse, FacadeError>;
}

/// Talks to a running `larder-server` over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyTransport {
    client: Client,
    endpoint: String,
}

impl ProxyTransport {
    pub fn new(client: Client, server: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/generate", server.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl GenerateTransport for ProxyTransport {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse, FacadeError> {
        tracing::debug!("Prompt: {}", request.prompt);
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            // The proxy explains itself with {error}; anything else is passed on raw
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(FacadeError::Proxy {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&body).map_err(FacadeError::Envelope)
    }
}
