//! Scripted transport for tests.
//!
//! Replies are chosen by checking whether the prompt contains a registered
//! substring, so tests run without a proxy or network access.

use std::sync::Mutex;

use async_trait::async_trait;
use larder::generation::GenerationRequest;
use larder::provider::{GenerateContentResponse, Part};

use super::{FacadeError, GenerateTransport};

#[derive(Debug, Clone)]
enum Reply {
    Parts(Vec<Part>),
    Raw(GenerateContentResponse),
    Fail { status: u16, message: String },
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Vec<(String, Reply)>,
    default_reply: Option<Reply>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts containing `prompt_contains` with a single text part.
    pub fn with_text(mut self, prompt_contains: &str, text: &str) -> Self {
        self.replies.push((
            prompt_contains.to_string(),
            Reply::Parts(vec![Part::text(text)]),
        ));
        self
    }

    /// Answer prompts containing `prompt_contains` with these parts.
    pub fn with_parts(mut self, prompt_contains: &str, parts: Vec<Part>) -> Self {
        self.replies
            .push((prompt_contains.to_string(), Reply::Parts(parts)));
        self
    }

    /// Answer prompts containing `prompt_contains` with a whole response.
    pub fn with_response(mut self, prompt_contains: &str, response: GenerateContentResponse) -> Self {
        self.replies
            .push((prompt_contains.to_string(), Reply::Raw(response)));
        self
    }

    /// Fail every prompt no other reply matches, as the proxy would.
    pub fn failing(mut self, status: u16, message: &str) -> Self {
        self.default_reply = Some(Reply::Fail {
            status,
            message: message.to_string(),
        });
        self
    }

    /// Everything sent so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerateTransport for FakeTransport {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerateContentResponse, FacadeError> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .or(self.default_reply.as_ref())
            .cloned()
            .unwrap_or_else(|| Reply::Fail {
                status: 500,
                message: format!("no scripted reply for prompt {:?}", request.prompt),
            });

        match reply {
            Reply::Parts(parts) => Ok(GenerateContentResponse::from_parts(parts)),
            Reply::Raw(response) => Ok(response),
            Reply::Fail { status, message } => Err(FacadeError::Proxy { status, message }),
        }
    }
}
