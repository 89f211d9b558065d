use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agents::AgentRole;
use crate::error::ValidationError;

/// The user's task. Guaranteed non-blank once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Task(String);

impl Task {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        Ok(Self(text))
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Task {
    type Error = ValidationError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Task> for String {
    fn from(task: Task) -> Self {
        task.0
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of one agent for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub role: AgentRole,
    /// Exact text the stage was given (the task, or the previous stage's output)
    pub input_text: String,
    /// The agent's answer, passed on to the next stage
    pub output_text: String,
    /// The agent's stated reasoning
    pub thoughts: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A completed pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: String,
    pub task: Task,
    /// One result per role, in pipeline order
    pub stages: [StageResult; 3],
}

impl PipelineResult {
    pub fn stage(&self, role: AgentRole) -> &StageResult {
        &self.stages[role.index()]
    }

    /// The critic's feedback, i.e. the last output of the run.
    pub fn final_output(&self) -> &str {
        &self.stage(AgentRole::Critic).output_text
    }
}
