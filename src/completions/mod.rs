//! Remote completion over HTTP, with retry and response validation.

pub mod client;

pub use client::{CompletionMode, PromptTemplate, RemoteCompletionClient, RemoteCompletionConfig};
