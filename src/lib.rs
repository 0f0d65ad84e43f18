//! # textgen-client
//!
//! A text-completion client for hosted inference APIs that hides transient
//! failures (rate limits, 5xx, network blips, garbled bodies) behind a single
//! `complete` call, plus the interfaces for routing the same prompts to a
//! locally loaded model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textgen_client::{ApiKey, GenerationParameters, provider::together};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = together::config_from_env("mistralai/Mixtral-8x7B-v0.1", ApiKey::Default)?;
//!     let client = textgen_client::RemoteCompletionClient::new(config)?;
//!
//!     let result = client
//!         .complete("Once upon a time", &GenerationParameters::new().max_tokens(64))
//!         .await?;
//!     println!("{}", result.first_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Transport failures, 429/5xx responses and undecodable bodies are retried
//! with exponential backoff. Any other status fails at once. When the
//! attempts run out the caller gets [`LlmError::ExhaustedRetries`] wrapping
//! the last failure.

pub mod completions;
pub mod core;
pub mod loader;
pub mod provider;

pub use completions::{
    CompletionMode, PromptTemplate, RemoteCompletionClient, RemoteCompletionConfig,
};
pub use self::core::{
    ApiKey, Choice, CompletionRequest, CompletionResult, Completer, GenerationParameters,
    HttpClientConfig, HttpRequest, LlmError, ParamValue, RawResponse, ReqwestTransport,
    RetryPolicy, Transport,
};
pub use loader::{HubModel, ModelLoader, TextGenerator};
pub use provider::Provider;
