//! Interfaces for locally loaded models.
//!
//! Fetching weights and running inference belong to whichever model-hub
//! library backs a [`ModelLoader`]; this module only decides *what* to ask
//! it for and adapts the loaded model to the shared [`CompletionResult`].

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{
    ApiKey, Choice, CompletionResult, Completer, GenerationParameters, LlmError,
};

/// Environment variable consulted by [`ApiKey::Default`] for hub downloads.
pub const HUB_TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Marker in a declared architecture name identifying encoder-decoder models.
const SEQ2SEQ_MARKER: &str = "ConditionalGeneration";

/// Hub-side model metadata needed before loading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelConfig {
    pub architectures: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArchitecture {
    Seq2Seq,
    CausalLm,
}

impl ModelArchitecture {
    pub fn detect(config: &ModelConfig) -> Self {
        if config
            .architectures
            .iter()
            .any(|arch| arch.contains(SEQ2SEQ_MARKER))
        {
            ModelArchitecture::Seq2Seq
        } else {
            ModelArchitecture::CausalLm
        }
    }
}

/// Device placement requested from the loader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceMap {
    /// Let the loader spread layers over whatever devices exist.
    #[default]
    Auto,
    Device(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub model_id: String,
    /// Access token for gated models; `None` for public ones.
    pub token: Option<String>,
    pub device_map: DeviceMap,
    pub architecture: ModelArchitecture,
}

/// A model-hub backend.
pub trait ModelLoader {
    type Model: TextGenerator;

    fn fetch_config(&self, model_id: &str, token: Option<&str>) -> Result<ModelConfig, LlmError>;

    fn load(&self, request: &LoadRequest) -> Result<Self::Model, LlmError>;
}

/// Local inference over a loaded model.
///
/// [`HubModel`]'s [`Completer`] impl calls `generate` directly on the async
/// executor. Implementations that run for long must hand the work to
/// `tokio::task::spawn_blocking` (or their own thread pool) themselves.
pub trait TextGenerator: Send + Sync {
    /// Generate one or more continuations of `prompt`.
    fn generate(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<Vec<String>, LlmError>;
}

/// A locally loaded model that answers with [`CompletionResult`]s.
#[derive(Debug)]
pub struct HubModel<M> {
    model_id: String,
    architecture: ModelArchitecture,
    model: M,
}

impl<M: TextGenerator> HubModel<M> {
    /// Load `model_id` through `loader`, passing the resolved token along.
    #[tracing::instrument(name = "load_model", skip(loader, api_key), err)]
    pub fn load<L>(loader: &L, model_id: &str, api_key: ApiKey) -> Result<Self, LlmError>
    where
        L: ModelLoader<Model = M>,
    {
        if model_id.trim().is_empty() {
            return Err(LlmError::ModelLoad("Model identifier must not be empty".into()));
        }

        let token = api_key.resolve(HUB_TOKEN_ENV_VAR);
        let config = loader.fetch_config(model_id, token.as_deref())?;
        let architecture = ModelArchitecture::detect(&config);
        debug!(?architecture, gated = token.is_some(), "resolved model config");

        let request = LoadRequest {
            model_id: model_id.to_string(),
            token,
            device_map: DeviceMap::Auto,
            architecture,
        };
        let model = loader.load(&request)?;
        info!(model_id, "model loaded");

        Ok(Self {
            model_id: request.model_id,
            architecture,
            model,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn architecture(&self) -> ModelArchitecture {
        self.architecture
    }

    pub fn complete_blocking(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionResult, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidRequest("Prompt must not be empty".into()));
        }
        let texts = self.model.generate(prompt, parameters)?;
        Ok(CompletionResult {
            prompt: prompt.to_string(),
            choices: texts.into_iter().map(|text| Choice { text }).collect(),
        })
    }
}

#[async_trait]
impl<M: TextGenerator> Completer for HubModel<M> {
    async fn complete(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<CompletionResult, LlmError> {
        self.complete_blocking(prompt, parameters)
    }
}
