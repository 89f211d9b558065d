use std::str::FromStr;

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatRole, MessageType};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, timeout};
use tracing::{debug, warn};

use super::{ApiKey, ModelClient, ModelRequest};
use crate::error::ApiError;

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const API_TIMEOUT_SECS: u64 = 120;
/// Extra time given to the HTTP client so the request timer always fires first.
const HTTP_TIMEOUT_GRACE_SECS: u64 = 5;

/// Which hosted API to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Anthropic,
    OpenAI,
}

impl Backend {
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAI => "gpt-4o",
        }
    }

    /// Environment variable front ends read the key from.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    fn llm_backend(self) -> LLMBackend {
        match self {
            Self::Anthropic => LLMBackend::Anthropic,
            Self::OpenAI => LLMBackend::OpenAI,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            _ => anyhow::bail!("unknown provider: {} (expected: anthropic, openai)", s),
        }
    }
}

/// Generation parameters passed through to the API unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub backend: Backend,
    /// Model id; `None` means the backend default
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Override for the API endpoint (proxies, gateways). OpenAI only: the
    /// Anthropic backend always talks to api.anthropic.com.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: None,
            timeout_secs: API_TIMEOUT_SECS,
        }
    }
}

impl ModelSettings {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    /// Reject combinations the `llm` crate would silently ignore.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Anthropic && self.base_url.is_some() {
            anyhow::bail!("base_url is not supported by the anthropic provider");
        }
        Ok(())
    }
}

/// [`ModelClient`] for hosted APIs, backed by the `llm` crate.
///
/// Holds only settings; the key arrives with each request, so one client can
/// serve any number of independent runs.
pub struct HostedModelClient {
    settings: ModelSettings,
}

impl HostedModelClient {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }

    /// Anthropic with default settings and the given model (or Claude Sonnet).
    pub fn anthropic(model: Option<&str>) -> Self {
        Self::new(ModelSettings {
            backend: Backend::Anthropic,
            model: model.map(str::to_string),
            ..ModelSettings::default()
        })
    }

    /// OpenAI with default settings and the given model (or GPT-4o).
    pub fn openai(model: Option<&str>) -> Self {
        Self::new(ModelSettings {
            backend: Backend::OpenAI,
            model: model.map(str::to_string),
            ..ModelSettings::default()
        })
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn build_llm_client(
        &self,
        system: &str,
        api_key: &ApiKey,
    ) -> Result<Box<dyn llm::LLMProvider>, ApiError> {
        // The llm crate fixes key and system prompt at build time, so each call gets its own client.
        let mut builder = LLMBuilder::new()
            .backend(self.settings.backend.llm_backend())
            .api_key(api_key.expose())
            .model(self.settings.model())
            .system(system)
            .max_tokens(self.settings.max_tokens)
            .temperature(self.settings.temperature)
            .timeout_seconds(self.settings.timeout_secs + HTTP_TIMEOUT_GRACE_SECS);

        if let Some(ref url) = self.settings.base_url {
            if self.settings.backend == Backend::Anthropic {
                warn!(base_url = %url, "base_url is ignored by the anthropic backend");
            }
            builder = builder.base_url(url);
        }

        builder
            .build()
            .map_err(|e| classify_error(&e.to_string(), self.settings.timeout_secs))
    }
}

#[async_trait]
impl ModelClient for HostedModelClient {
    fn name(&self) -> &str {
        match self.settings.backend {
            Backend::Anthropic => "anthropic",
            Backend::OpenAI => "openai",
        }
    }

    async fn generate(&self, request: &ModelRequest, api_key: &ApiKey) -> Result<String, ApiError> {
        if api_key.is_blank() {
            return Err(ApiError::AuthenticationFailed(
                "no API key supplied".to_string(),
            ));
        }

        let llm = self.build_llm_client(&request.system, api_key)?;
        let messages = vec![ChatMessage {
            role: ChatRole::User,
            message_type: MessageType::Text,
            content: request.prompt.clone(),
        }];

        debug!(
            provider = self.name(),
            model = self.settings.model(),
            prompt_len = request.prompt.len(),
            "sending model request"
        );

        let secs = self.settings.timeout_secs;
        let response = timeout(Duration::from_secs(secs), llm.chat(&messages))
            .await
            .map_err(|_| ApiError::Timeout { secs })?
            .map_err(|e| {
                let err = classify_error(&e.to_string(), secs);
                warn!(provider = self.name(), error = %err, "model request failed");
                err
            })?;

        let text = response.text().unwrap_or_else(|| {
            warn!("{} API returned empty response text", self.name());
            String::new()
        });

        Ok(text)
    }
}

/// Sort an `llm` crate error message into an [`ApiError`] kind.
///
/// The crate flattens every HTTP failure into a string, so non-2xx statuses
/// and unparseable bodies are told apart from transport failures by text.
fn classify_error(message: &str, timeout_secs: u64) -> ApiError {
    let lower = message.to_lowercase();
    let detail = message.to_string();

    if lower.contains("timed out") || lower.contains("timeout") {
        return ApiError::Timeout { secs: timeout_secs };
    }

    if lower.contains("(401")
        || lower.contains("(403")
        || lower.contains("401 unauthorized")
        || lower.contains("auth error")
        || lower.contains("authentication")
        || lower.contains("api key")
        || lower.contains("x-api-key")
        || lower.contains("permission")
    {
        return ApiError::AuthenticationFailed(detail);
    }

    if lower.contains("(429")
        || lower.contains("rate limit")
        || lower.contains("rate_limit")
        || lower.contains("too many requests")
        || lower.contains("overloaded")
    {
        return ApiError::RateLimited(detail);
    }

    // Non-2xx statuses and bodies that do not decode
    if lower.contains("http status")
        || lower.contains("failed to parse json")
        || lower.contains("response format error")
        || lower.contains("json parse error")
    {
        return ApiError::UpstreamError(detail);
    }

    if lower.contains("error sending request")
        || lower.contains("connection")
        || lower.contains("dns")
        || lower.contains("network")
    {
        return ApiError::NetworkFailure(detail);
    }

    ApiError::UpstreamError(detail)
}
