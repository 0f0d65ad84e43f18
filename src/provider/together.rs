//! Together-style hosted inference endpoint.
//!
//! The endpoint URL comes from `TOGETHER_API_BASE` unless set explicitly, and
//! the token from `TOGETHER_API_KEY` unless an explicit [`ApiKey`] is given.

use crate::completions::{RemoteCompletionClient, RemoteCompletionConfig};
use crate::core::{ApiKey, GenerationParameters, LlmError};
use crate::provider::{Provider, constants::together};

/// Generation options applied when a call does not override them.
pub fn default_parameters() -> GenerationParameters {
    GenerationParameters::new()
        .temperature(0.0)
        .max_tokens(512)
        .top_p(1.0)
        .top_k(20)
        .repetition_penalty(1.0)
        .n(1)
        .stop(together::DEFAULT_STOP)
}

/// Build a config for `model`, reading the endpoint from the environment.
pub fn config_from_env(model: &str, api_key: ApiKey) -> Result<RemoteCompletionConfig, LlmError> {
    let env_var = Provider::Together.api_base_env_var();
    let base_url = std::env::var(env_var)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| LlmError::Configuration(format!("Missing endpoint URL. Set {env_var}.")))?;

    Ok(config(base_url, model, api_key))
}

/// Build a config for `model` at `base_url`.
pub fn config(
    base_url: impl Into<String>,
    model: &str,
    api_key: ApiKey,
) -> RemoteCompletionConfig {
    let config = RemoteCompletionConfig::new(base_url, model)
        .with_default_parameters(default_parameters());

    match api_key.resolve(Provider::Together.default_api_key_env_var()) {
        Some(key) => config.with_api_key(key),
        None => config,
    }
}

/// Shorthand for a reqwest-backed client with Together defaults.
pub fn client(
    base_url: impl Into<String>,
    model: &str,
    api_key: ApiKey,
) -> Result<RemoteCompletionClient, LlmError> {
    RemoteCompletionClient::new(config(base_url, model, api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParamValue;

    #[test]
    fn test_defaults_match_together_settings() {
        let params = default_parameters();
        assert_eq!(params.get("max_tokens"), Some(&ParamValue::Int(512)));
        assert_eq!(params.get("top_k"), Some(&ParamValue::Int(20)));
        assert_eq!(params.get("temperature"), Some(&ParamValue::Float(0.0)));
        assert_eq!(
            params.get("stop"),
            Some(&ParamValue::Text("\n\n---".to_string()))
        );
    }

    #[test]
    fn test_explicit_key_and_base_url() {
        let config = config("https://api.together.test/inference", "some-model", "k".into());
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url, "https://api.together.test/inference");
        assert_eq!(config.model, "some-model");

        let anonymous = super::config("https://x.test", "some-model", ApiKey::None);
        assert!(anonymous.api_key.is_none());
    }
}
