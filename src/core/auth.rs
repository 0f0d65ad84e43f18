use super::error::LlmError;

/// Where an access token comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ApiKey {
    /// Read from the provider's environment variable.
    #[default]
    Default,
    /// Use this token as-is.
    Explicit(String),
    /// Send no token at all.
    None,
}

impl ApiKey {
    /// Resolve to a token, reading `env_var` for [`ApiKey::Default`].
    ///
    /// An unset or empty variable yields `None`; endpoints that need a token
    /// reject the request themselves.
    pub fn resolve(&self, env_var: &str) -> Option<String> {
        match self {
            ApiKey::Default => std::env::var(env_var).ok().filter(|key| !key.is_empty()),
            ApiKey::Explicit(key) => Some(key.clone()),
            ApiKey::None => None,
        }
    }

    /// Like [`resolve`](Self::resolve) but a missing token is an error.
    pub fn require(&self, env_var: &str) -> Result<String, LlmError> {
        self.resolve(env_var).ok_or_else(|| {
            LlmError::Configuration(format!(
                "Missing API key. Set {env_var} or pass an explicit key."
            ))
        })
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        ApiKey::Explicit(key.to_string())
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        ApiKey::Explicit(key)
    }
}

/// `Authorization: Bearer <token>` header pair.
pub(crate) fn bearer_header(token: &str) -> (String, String) {
    ("Authorization".to_string(), format!("Bearer {token}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_and_none() {
        assert_eq!(
            ApiKey::from("abc").resolve("TEXTGEN_UNUSED_VAR"),
            Some("abc".to_string())
        );
        assert_eq!(ApiKey::None.resolve("PATH"), None);
    }

    #[test]
    fn test_default_reads_env_and_require_reports_name() {
        assert_eq!(ApiKey::Default.resolve("TEXTGEN_CLIENT_SURELY_UNSET"), None);

        let err = ApiKey::Default
            .require("TEXTGEN_CLIENT_SURELY_UNSET")
            .unwrap_err();
        assert!(err.to_string().contains("TEXTGEN_CLIENT_SURELY_UNSET"));
    }
}
