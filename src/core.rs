pub mod auth;
pub mod error;
pub mod history;
pub mod http;
pub mod retry;
pub mod traits;
pub mod types;

pub use auth::ApiKey;
pub use error::LlmError;
pub use history::{CompletionHistory, HistoryEntry};
pub use http::{HttpClientConfig, ReqwestTransport};
pub use retry::RetryPolicy;
pub use traits::{Completer, Transport};
pub use types::{
    Choice, CompletionRequest, CompletionResult, GenerationParameters, HttpRequest, ParamValue,
    RawResponse,
};
