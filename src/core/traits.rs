use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{CompletionResult, GenerationParameters, HttpRequest, RawResponse},
};

/// Sends one HTTP request and hands back whatever came back.
///
/// Implementations must be usable from many tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, LlmError>;
}

/// Anything that turns a prompt into a [`CompletionResult`].
///
/// Implemented by the remote client and by locally loaded models so callers
/// can route between them.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionResult, LlmError>;
}
