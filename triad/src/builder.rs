use tracing::debug;

use crate::config::ProjectConfig;
use crate::error::TriadError;
use crate::llm::{Backend, HostedModelClient, ModelClient, ModelSettings};
use crate::triad::Triad;

/// Builder for constructing a [`Triad`] instance.
///
/// # Example
///
/// ```no_run
/// # use triad::Triad;
/// # fn example() -> Result<(), triad::TriadError> {
/// let triad = Triad::builder()
///     .from_config()?
///     .provider_by_name("openai", Some("gpt-4o-mini"))?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TriadBuilder {
    client: Option<Box<dyn ModelClient>>,
    settings: Option<ModelSettings>,
}

impl TriadBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            settings: None,
        }
    }

    /// Set a custom model client. Takes precedence over any settings.
    pub fn client(mut self, client: impl ModelClient + 'static) -> Self {
        self.client = Some(Box::new(client));
        self
    }

    /// Use the hosted client with these settings.
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Configure the Anthropic backend.
    ///
    /// If `model` is `None`, defaults to Claude Sonnet.
    pub fn anthropic(self, model: Option<&str>) -> Self {
        self.backend(Backend::Anthropic, model)
    }

    /// Configure the OpenAI backend.
    ///
    /// If `model` is `None`, defaults to GPT-4o.
    pub fn openai(self, model: Option<&str>) -> Self {
        self.backend(Backend::OpenAI, model)
    }

    /// Configure a backend by name ("anthropic" or "openai").
    pub fn provider_by_name(self, name: &str, model: Option<&str>) -> Result<Self, TriadError> {
        let backend = name
            .parse::<Backend>()
            .map_err(|e| TriadError::Config(e.to_string()))?;
        Ok(self.backend(backend, model))
    }

    /// Override the model, keeping the current backend.
    pub fn model(mut self, model: &str) -> Self {
        let mut settings = self.settings.take().unwrap_or_default();
        settings.model = Some(model.to_string());
        self.settings = Some(settings);
        self
    }

    /// Apply settings from the configuration files.
    ///
    /// Loads config with precedence: project file > global file > defaults.
    /// Settings applied here can still be overridden by subsequent builder calls.
    pub fn from_config(self) -> Result<Self, TriadError> {
        let config = ProjectConfig::load()
            .map_err(|e| TriadError::Config(format!("failed to load configuration: {:#}", e)))?;

        debug!("loaded project configuration");
        self.config(&config)
    }

    /// Apply an already loaded configuration.
    pub fn config(mut self, config: &ProjectConfig) -> Result<Self, TriadError> {
        let settings = config
            .model_settings()
            .map_err(|e| TriadError::Config(e.to_string()))?;
        self.settings = Some(settings);
        Ok(self)
    }

    /// Settings the hosted client would be built with, if any are configured.
    pub fn model_settings(&self) -> Option<&ModelSettings> {
        self.settings.as_ref()
    }

    /// Switch backend, keeping the remaining settings. A model or endpoint
    /// chosen for a different backend is dropped unless `model` replaces it.
    fn backend(mut self, backend: Backend, model: Option<&str>) -> Self {
        let mut settings = self.settings.take().unwrap_or_default();
        if settings.backend != backend {
            settings.model = None;
            settings.base_url = None;
        }
        settings.backend = backend;
        if let Some(m) = model {
            settings.model = Some(m.to_string());
        }
        self.settings = Some(settings);
        self
    }

    /// Build the [`Triad`] instance.
    ///
    /// Fails if neither a client nor settings have been configured, or if the
    /// settings are inconsistent.
    pub fn build(self) -> Result<Triad, TriadError> {
        let client: Box<dyn ModelClient> = match (self.client, self.settings) {
            (Some(client), _) => client,
            (None, Some(settings)) => {
                settings
                    .validate()
                    .map_err(|e| TriadError::Config(e.to_string()))?;
                Box::new(HostedModelClient::new(settings))
            }
            (None, None) => {
                return Err(TriadError::Config("no model client configured".to_string()));
            }
        };

        Ok(Triad::from_client(client))
    }
}

impl Default for TriadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
