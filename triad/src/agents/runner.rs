use chrono::Utc;
use tracing::{debug, info};

use super::{AgentReply, AgentRole, PromptBuilder};
use crate::error::ApiError;
use crate::llm::{ApiKey, ModelClient, ModelRequest};
use crate::stage::StageResult;

/// Runs a single agent: one prompt, one model call, one [`StageResult`].
pub struct AgentRunner<'a> {
    client: &'a dyn ModelClient,
}

impl<'a> AgentRunner<'a> {
    pub fn new(client: &'a dyn ModelClient) -> Self {
        Self { client }
    }

    /// Run `role` on `input_text`.
    ///
    /// Errors from the client are returned unchanged; nothing is retried here.
    pub async fn run(
        &self,
        role: AgentRole,
        input_text: &str,
        api_key: &ApiKey,
    ) -> Result<StageResult, ApiError> {
        let request = ModelRequest::new(
            PromptBuilder::system_prompt(role),
            PromptBuilder::build(role, input_text),
        );

        debug!(
            agent = %role,
            client = self.client.name(),
            prompt_len = request.prompt.len(),
            "agent prompt built"
        );

        let started_at = Utc::now();
        let raw = self.client.generate(&request, api_key).await?;
        let finished_at = Utc::now();

        let reply = AgentReply::parse(&raw);
        info!(
            agent = %role,
            output_len = reply.response.len(),
            "agent completed"
        );

        Ok(StageResult {
            role,
            input_text: input_text.to_string(),
            output_text: reply.response,
            thoughts: reply.thoughts,
            started_at,
            finished_at,
        })
    }
}
