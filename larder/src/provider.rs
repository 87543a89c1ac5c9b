//! Typed view over the provider's `generateContent` response.
//!
//! The proxy relays the provider's JSON untouched; the client reads it
//! through these types so a missing candidate or part is reported as a
//! [`ShapeError`] instead of an index panic.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("response has no candidates")]
    NoCandidates,
    #[error("first candidate has no content")]
    NoContent,
    #[error("first candidate has no parts")]
    NoParts,
    #[error("first part carries no text")]
    NoText,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Base64, as sent by the provider.
    pub data: String,
}

impl std::fmt::Debug for InlineData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineData")
            .field("mime_type", &self.mime_type)
            .field("data", &self.data.len())
            .finish()
    }
}

impl InlineData {
    /// Render as a PNG `data:` URI, whatever type the provider named.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.data)
    }
}

impl GenerateContentResponse {
    /// Build a single-candidate response, mostly useful for stubs.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts,
                    role: Some("model".to_string()),
                }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    fn first_parts(&self) -> Result<&[Part], ShapeError> {
        let candidate = self.candidates.first().ok_or(ShapeError::NoCandidates)?;
        let content = candidate.content.as_ref().ok_or(ShapeError::NoContent)?;
        if content.parts.is_empty() {
            return Err(ShapeError::NoParts);
        }
        Ok(&content.parts)
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<&str, ShapeError> {
        self.first_parts()?[0]
            .text
            .as_deref()
            .ok_or(ShapeError::NoText)
    }

    /// Inline payloads of the first candidate with non-empty data.
    pub fn inline_images(&self) -> Result<impl Iterator<Item = &InlineData>, ShapeError> {
        Ok(self
            .first_parts()?
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .filter(|d| !d.data.is_empty()))
    }
}
