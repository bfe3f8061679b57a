//! External model client.
//!
//! One best-effort, non-streaming completion per call; the credential is
//! supplied per request by the caller, never held by the process. The trait
//! seam exists so handlers can run against a scripted double in tests.

mod anthropic;

pub use anthropic::AnthropicClient;

use async_trait::async_trait;

use pharmscope_core::Result;

/// A single completion request: system persona plus one user prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Caller-supplied model-service credential.
    pub api_key: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: usize,
}

/// Client for a hosted large-language-model service.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the request and return the raw response text. One attempt, no
    /// retry; callers decide how to degrade on failure.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
