use larder::generation::{GenerationConfig, GenerationRequest};
use larder::provider::{GenerateContentResponse, ShapeError};

#[cfg(test)]
mod fake;
mod illustrate;
pub mod prompts;
mod proxy;
mod recipes;

#[cfg(test)]
pub use fake::FakeTransport;
pub use proxy::{GenerateTransport, ProxyTransport};
pub use recipes::recipe_id;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Every way a kitchen operation can fail to produce usable data.
#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    #[error("Could not reach the generation proxy: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Generation proxy returned {status}: {message}")]
    Proxy { status: u16, message: String },
    #[error("Proxy reply is not a generateContent response: {0}")]
    Envelope(serde_json::Error),
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("Generated text does not match the requested schema: {0}")]
    Schema(serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Model for corrections and recipes
    pub text_model: String,
    /// Model for recipe photos
    pub image_model: String,
    /// Language the recipes are written in
    pub output_language: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_MODEL.to_string(),
            output_language: "English".to_string(),
        }
    }
}

/// Turns kitchen questions into generation requests and the answers back into
/// recipes, corrections and photos.
///
/// Each operation makes at most one call through the transport and keeps no
/// state between calls, so one assistant can serve concurrent callers.
#[derive(Debug)]
pub struct RecipeAssistant<T> {
    transport: T,
    config: AssistantConfig,
}

impl RecipeAssistant<ProxyTransport> {
    /// Assistant talking to the proxy at `server`, e.g. `http://localhost:3000`.
    pub fn connect(server: &str, config: AssistantConfig) -> Self {
        Self::new(ProxyTransport::new(reqwest::Client::new(), server), config)
    }
}

impl<T: GenerateTransport> RecipeAssistant<T> {
    pub fn new(transport: T, config: AssistantConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Ask for JSON matching `schema` and deserialize the first text part.
    async fn generate_json<R: serde::de::DeserializeOwned>(
        &self,
        prompt: String,
        schema: &serde_json::Value,
    ) -> Result<R, FacadeError> {
        let request = GenerationRequest::new(prompt)
            .with_model(self.config.text_model.clone())
            .with_config(GenerationConfig::json(schema.clone()));
        let response = self.transport.generate(&request).await?;
        let text = response.first_text()?;
        serde_json::from_str(text).map_err(FacadeError::Schema)
    }

    async fn generate_free(
        &self,
        prompt: String,
        model: &str,
    ) -> Result<GenerateContentResponse, FacadeError> {
        let request = GenerationRequest::new(prompt).with_model(model);
        self.transport.generate(&request).await
    }
}
