mod constants;
pub mod together;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Together,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Together => write!(f, "Together"),
        }
    }
}

impl Provider {
    /// Get the default environment variable name for this provider's API key
    pub fn default_api_key_env_var(&self) -> &'static str {
        match self {
            Provider::Together => constants::together::API_KEY_ENV_VAR,
        }
    }

    /// Get the environment variable holding this provider's endpoint URL
    pub fn api_base_env_var(&self) -> &'static str {
        match self {
            Provider::Together => constants::together::API_BASE_ENV_VAR,
        }
    }
}
