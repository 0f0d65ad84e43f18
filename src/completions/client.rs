//! Remote text-completion client.
//!
//! A call is split into a single attempt ([`RemoteCompletionClient::complete_once`])
//! and the retrying wrapper ([`RemoteCompletionClient::complete`]) that drives
//! it through the configured [`RetryPolicy`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::{
    Choice, CompletionHistory, CompletionRequest, CompletionResult, Completer,
    GenerationParameters, HistoryEntry, HttpClientConfig, HttpRequest, LlmError, RawResponse,
    ReqwestTransport, RetryPolicy, Transport, auth::bearer_header,
    history::DEFAULT_HISTORY_CAPACITY,
};

const CHAT_ENDPOINT: &str = "/chat/completions";
const DEFAULT_SYSTEM_PROMPT: &str =
    "Continue the user's text directly, without any preamble or commentary.";
/// Longest slice of an error body kept in [`LlmError::Remote`] messages.
const MAX_ERROR_BODY: usize = 512;
/// Body keys owned by the client; same-named parameters are never sent.
const RESERVED_BODY_KEYS: [&str; 3] = ["model", "prompt", "messages"];

/// Shape of the request body and of each returned choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    /// `{"prompt": ...}` in, `choices[].text` out.
    #[default]
    Text,
    /// `{"messages": [...]}` in, `choices[].message.content` out.
    Chat,
}

/// How the caller's prompt is wrapped before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    #[default]
    Plain,
    /// `[INST]prompt[/INST]`, expected by instruction-tuned models.
    Instruct,
}

impl PromptTemplate {
    /// `Instruct` for model identifiers that look instruction-tuned.
    pub fn for_model(model: &str) -> Self {
        if model.to_lowercase().contains("inst") {
            PromptTemplate::Instruct
        } else {
            PromptTemplate::Plain
        }
    }

    pub fn apply(&self, prompt: &str) -> String {
        match self {
            PromptTemplate::Plain => prompt.to_string(),
            PromptTemplate::Instruct => format!("[INST]{prompt}[/INST]"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteCompletionConfig {
    pub base_url: String,
    pub model: String,
    /// Bearer token attached to every request, if any
    pub api_key: Option<String>,
    pub mode: CompletionMode,
    pub prompt_template: PromptTemplate,
    /// System message used in [`CompletionMode::Chat`]
    pub system_prompt: String,
    /// Options merged under every call's own parameters
    pub default_parameters: GenerationParameters,
    pub retry_policy: RetryPolicy,
    /// Upper bound on a single attempt, enforced independently of the transport
    pub attempt_timeout: Option<Duration>,
    pub http_config: HttpClientConfig,
    pub history_capacity: usize,
}

impl RemoteCompletionConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            base_url: base_url.into(),
            prompt_template: PromptTemplate::for_model(&model),
            model,
            api_key: None,
            mode: CompletionMode::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_parameters: GenerationParameters::new(),
            retry_policy: RetryPolicy::default(),
            attempt_timeout: None,
            http_config: HttpClientConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_prompt_template(mut self, template: PromptTemplate) -> Self {
        self.prompt_template = template;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_default_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.default_parameters = parameters;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.mode {
            CompletionMode::Text => base.to_string(),
            CompletionMode::Chat => format!("{base}{CHAT_ENDPOINT}"),
        }
    }
}

/// Client for a hosted text-completion endpoint.
///
/// Cheap to share: the transport is reference counted and the only other
/// mutable state is the bounded history.
pub struct RemoteCompletionClient {
    config: RemoteCompletionConfig,
    transport: Arc<dyn Transport>,
    history: CompletionHistory,
}

impl RemoteCompletionClient {
    /// Create a client backed by a pooled reqwest transport.
    pub fn new(config: RemoteCompletionConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::Configuration(
                "Missing base URL for the completion endpoint".to_string(),
            ));
        }
        let transport = ReqwestTransport::new(config.http_config.clone())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client that sends through `transport`.
    pub fn with_transport(config: RemoteCompletionConfig, transport: Arc<dyn Transport>) -> Self {
        let history = CompletionHistory::new(config.history_capacity);
        Self {
            config,
            transport,
            history,
        }
    }

    pub fn config(&self) -> &RemoteCompletionConfig {
        &self.config
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.snapshot()
    }

    pub fn last_result(&self) -> Option<CompletionResult> {
        self.history.last().map(|entry| entry.result)
    }

    pub fn clear_history(&self) {
        self.history.clear();
    }

    /// Validate `prompt` and merge `parameters` over the configured defaults.
    pub fn build_request(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionRequest, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest(
                "Prompt must not be empty".to_string(),
            ));
        }

        Ok(CompletionRequest {
            prompt: prompt.to_string(),
            model: self.config.model.clone(),
            parameters: self.config.default_parameters.merged_with(parameters),
        })
    }

    /// Complete `prompt`, retrying transient failures per the retry policy.
    #[tracing::instrument(
        name = "complete",
        skip(self, prompt, parameters),
        fields(model = %self.config.model, prompt_len = prompt.len()),
        err
    )]
    pub async fn complete(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionResult, LlmError> {
        let request = self.build_request(prompt, parameters)?;
        let request_ref = &request;

        let result = self
            .config
            .retry_policy
            .run(move |attempt| {
                debug!(attempt, "sending completion request");
                self.complete_once(request_ref)
            })
            .await?;

        self.history.record(HistoryEntry {
            prompt: request.prompt,
            parameters: request.parameters,
            result: result.clone(),
        });

        Ok(result)
    }

    /// Make exactly one attempt at `request`, without retrying.
    pub async fn complete_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResult, LlmError> {
        let http_request = self.http_request(request);

        let response = match self.config.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.transport.send(&http_request))
                .await
                .map_err(|_| LlmError::Transport {
                    message: format!("Attempt timed out after {}ms", limit.as_millis()),
                    source: None,
                })??,
            None => self.transport.send(&http_request).await?,
        };

        let choices = parse_response(&response, self.config.mode)?;
        Ok(CompletionResult {
            prompt: request.prompt.clone(),
            choices,
        })
    }

    /// The HTTP request an attempt at `request` sends.
    pub fn http_request(&self, request: &CompletionRequest) -> HttpRequest {
        let prompt = self.config.prompt_template.apply(&request.prompt);

        let mut body: Map<String, Value> = request
            .parameters
            .iter()
            .filter(|(key, _)| !RESERVED_BODY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), Value::from(value)))
            .collect();
        body.insert("model".to_string(), Value::String(request.model.clone()));

        match self.config.mode {
            CompletionMode::Text => {
                body.insert("prompt".to_string(), Value::String(prompt));
            }
            CompletionMode::Chat => {
                body.insert(
                    "messages".to_string(),
                    json!([
                        { "role": "system", "content": self.config.system_prompt },
                        { "role": "user", "content": prompt },
                    ]),
                );
            }
        }

        let headers = self
            .config
            .api_key
            .as_deref()
            .map(bearer_header)
            .into_iter()
            .collect();

        HttpRequest {
            url: self.config.url(),
            headers,
            body: Value::Object(body),
        }
    }
}

#[async_trait]
impl Completer for RemoteCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionResult, LlmError> {
        RemoteCompletionClient::complete(self, prompt, parameters).await
    }
}

/// Classify a raw response and pull out its choices.
fn parse_response(response: &RawResponse, mode: CompletionMode) -> Result<Vec<Choice>, LlmError> {
    if response.status != 200 {
        let text = String::from_utf8_lossy(&response.body);
        let message: String = text.chars().take(MAX_ERROR_BODY).collect();
        return Err(LlmError::Remote {
            status: response.status,
            message,
        });
    }

    let body: Value = serde_json::from_slice(&response.body).map_err(|e| LlmError::Decode {
        message: "Failed to parse response as JSON".to_string(),
        source: Some(e.into()),
    })?;

    extract_choices(&body, mode)
}

fn extract_choices(body: &Value, mode: CompletionMode) -> Result<Vec<Choice>, LlmError> {
    let choices = body
        .get("choices")
        .or_else(|| body.get("output").and_then(|output| output.get("choices")))
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::decode("Response has no `choices` array"))?;

    // A choice without text is a legitimate empty completion, not a bad body.
    Ok(choices
        .iter()
        .map(|choice| {
            let text = match mode {
                CompletionMode::Text => choice.get("text"),
                CompletionMode::Chat => choice
                    .get("message")
                    .and_then(|message| message.get("content")),
            };
            Choice {
                text: text
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }
        })
        .collect())
}
