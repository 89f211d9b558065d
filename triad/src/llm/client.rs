use async_trait::async_trait;

use super::ApiKey;
use crate::error::ApiError;

/// One prompt for one model round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// System prompt setting up the agent persona
    pub system: String,
    /// User prompt carrying the stage input
    pub prompt: String,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// Trait for hosted language-model clients
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one request and return the generated text.
    ///
    /// Implementations must not retry; every failure goes straight back to the caller.
    async fn generate(&self, request: &ModelRequest, api_key: &ApiKey) -> Result<String, ApiError>;

    /// Get the client name
    fn name(&self) -> &str;
}
