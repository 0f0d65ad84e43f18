use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LlmError {
    /// The request never produced an HTTP response (connect failure, reset, timeout).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The endpoint answered with a non-200 status.
    #[error("Remote error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// The endpoint answered 200 but the body was not a usable completion.
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Retries exhausted after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),
}

impl LlmError {
    /// Whether another attempt of the same request could succeed.
    ///
    /// 429 and 5xx are transient; every other status is fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport { .. } | LlmError::Decode { .. } => true,
            LlmError::Remote { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// The HTTP status behind this error, looking through `ExhaustedRetries`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Remote { status, .. } => Some(*status),
            LlmError::ExhaustedRetries { last, .. } => last.status_code(),
            _ => None,
        }
    }

    pub(crate) fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        LlmError::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        LlmError::Decode {
            message: message.into(),
            source: None,
        }
    }
}

pub(crate) fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        for status in [429, 500, 502, 503, 599] {
            let err = LlmError::Remote {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{status} should be retryable");
        }
        for status in [400, 401, 403, 404, 422] {
            let err = LlmError::Remote {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "{status} should be fatal");
        }
    }

    #[test]
    fn test_exhausted_retries_is_terminal_and_keeps_status() {
        let err = LlmError::ExhaustedRetries {
            attempts: 3,
            last: Box::new(LlmError::Remote {
                status: 503,
                message: "busy".into(),
            }),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn test_transport_and_decode_are_retryable() {
        assert!(LlmError::decode("bad body").is_retryable());
        assert!(LlmError::transport("reset", "connection reset by peer").is_retryable());
        assert!(!LlmError::InvalidRequest("empty".into()).is_retryable());
    }
}
