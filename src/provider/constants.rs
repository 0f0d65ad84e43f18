pub mod together {
    pub const API_BASE_ENV_VAR: &str = "TOGETHER_API_BASE";
    pub const API_KEY_ENV_VAR: &str = "TOGETHER_API_KEY";
    pub const DEFAULT_STOP: &str = "\n\n---";
}
