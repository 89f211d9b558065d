use crate::agents::AgentRole;

/// Input rejected before any model call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task text must not be empty")]
    EmptyTask,
}

/// Failure of a single model round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("request timed out after {secs} seconds")]
    Timeout { secs: u64 },
}

/// Why a pipeline run did not produce a [`PipelineResult`](crate::PipelineResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{role} stage failed: {source}")]
    StageFailed {
        role: AgentRole,
        #[source]
        source: ApiError,
    },
}

impl PipelineError {
    /// The role whose model call failed, if the run got that far.
    pub fn failed_role(&self) -> Option<AgentRole> {
        match self {
            Self::Validation(_) => None,
            Self::StageFailed { role, .. } => Some(*role),
        }
    }

    /// The underlying API failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Validation(_) => None,
            Self::StageFailed { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TriadError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for TriadError {
    fn from(err: ValidationError) -> Self {
        Self::Pipeline(PipelineError::Validation(err))
    }
}
