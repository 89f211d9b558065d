use tracing::{error, info};
use uuid::Uuid;

use crate::agents::{AgentRole, AgentRunner};
use crate::error::{ApiError, PipelineError};
use crate::event::{Event, EventSender, RunStatus};
use crate::llm::{ApiKey, ModelClient};
use crate::stage::{PipelineResult, StageResult, Task};

const PREVIEW_LEN: usize = 200;

/// Where a pipeline run currently stands.
///
/// The only transitions are the ones [`Orchestrator::advance`] makes:
/// `Idle -> ResearcherDone -> WriterDone -> Complete`, with a jump to
/// `Failed` from any non-terminal state.
#[derive(Debug, Clone)]
pub enum PipelineState {
    Idle {
        task: Task,
    },
    ResearcherDone {
        task: Task,
        research: StageResult,
    },
    WriterDone {
        task: Task,
        research: StageResult,
        draft: StageResult,
    },
    Complete(PipelineResult),
    Failed {
        role: AgentRole,
        error: ApiError,
    },
}

impl PipelineState {
    /// The role that runs on the next transition, or `None` once terminal.
    pub fn next_role(&self) -> Option<AgentRole> {
        match self {
            Self::Idle { .. } => Some(AgentRole::Researcher),
            Self::ResearcherDone { .. } => Some(AgentRole::Writer),
            Self::WriterDone { .. } => Some(AgentRole::Critic),
            Self::Complete(_) | Self::Failed { .. } => None,
        }
    }
}

/// Runs Researcher, Writer and Critic in order, feeding each one's output to the next.
pub struct Orchestrator<'a> {
    runner: AgentRunner<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(client: &'a dyn ModelClient) -> Self {
        Self {
            runner: AgentRunner::new(client),
        }
    }

    /// Run the whole pipeline for `task`.
    ///
    /// An empty task is rejected before any model call. The run stops at the
    /// first failing stage; a retry has to start over from the Researcher.
    pub async fn run_pipeline(
        &self,
        task: &str,
        api_key: &ApiKey,
        events: &EventSender,
    ) -> Result<PipelineResult, PipelineError> {
        let task = Task::new(task)?;
        let run_id = Uuid::new_v4().to_string();

        info!(run_id = %run_id, task = %task, "pipeline starting");
        events.emit(Event::RunStarted {
            run_id: run_id.clone(),
            task: task.text().to_string(),
        });

        let mut state = PipelineState::Idle { task };
        loop {
            state = match state {
                PipelineState::Complete(result) => {
                    info!(run_id = %run_id, "pipeline completed");
                    events
                        .emit_blocking(Event::RunCompleted {
                            status: RunStatus::Success,
                        })
                        .await;
                    return Ok(result);
                }
                PipelineState::Failed { role, error } => {
                    let err = PipelineError::StageFailed {
                        role,
                        source: error,
                    };
                    events
                        .emit_blocking(Event::RunCompleted {
                            status: RunStatus::Failed {
                                error: err.to_string(),
                            },
                        })
                        .await;
                    return Err(err);
                }
                pending => self.advance(pending, &run_id, api_key, events).await,
            };
        }
    }

    /// Make one transition. Terminal states are returned unchanged.
    pub async fn advance(
        &self,
        state: PipelineState,
        run_id: &str,
        api_key: &ApiKey,
        events: &EventSender,
    ) -> PipelineState {
        match state {
            PipelineState::Idle { task } => {
                match self
                    .run_stage(AgentRole::Researcher, task.text(), api_key, events)
                    .await
                {
                    Ok(research) => PipelineState::ResearcherDone { task, research },
                    Err(error) => PipelineState::Failed {
                        role: AgentRole::Researcher,
                        error,
                    },
                }
            }
            PipelineState::ResearcherDone { task, research } => {
                match self
                    .run_stage(AgentRole::Writer, &research.output_text, api_key, events)
                    .await
                {
                    Ok(draft) => PipelineState::WriterDone {
                        task,
                        research,
                        draft,
                    },
                    Err(error) => PipelineState::Failed {
                        role: AgentRole::Writer,
                        error,
                    },
                }
            }
            PipelineState::WriterDone {
                task,
                research,
                draft,
            } => {
                match self
                    .run_stage(AgentRole::Critic, &draft.output_text, api_key, events)
                    .await
                {
                    Ok(review) => PipelineState::Complete(PipelineResult {
                        run_id: run_id.to_string(),
                        task,
                        stages: [research, draft, review],
                    }),
                    Err(error) => PipelineState::Failed {
                        role: AgentRole::Critic,
                        error,
                    },
                }
            }
            terminal => terminal,
        }
    }

    async fn run_stage(
        &self,
        role: AgentRole,
        input_text: &str,
        api_key: &ApiKey,
        events: &EventSender,
    ) -> Result<StageResult, ApiError> {
        info!(agent = %role, "=== STAGE: {} ===", role.title().to_uppercase());

        events.emit(Event::StageStarted {
            role,
            activity: role.activity().to_string(),
            input_preview: truncate(input_text, PREVIEW_LEN),
        });

        match self.runner.run(role, input_text, api_key).await {
            Ok(result) => {
                events
                    .emit_blocking(Event::StageCompleted {
                        result: result.clone(),
                    })
                    .await;
                Ok(result)
            }
            Err(e) => {
                error!(agent = %role, error = %e, "stage failed");
                events
                    .emit_blocking(Event::StageFailed {
                        role,
                        error: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_role_follows_pipeline_order() {
        let task = Task::new("topic").unwrap();
        let idle = PipelineState::Idle { task };
        assert_eq!(idle.next_role(), Some(AgentRole::Researcher));

        let failed = PipelineState::Failed {
            role: AgentRole::Writer,
            error: ApiError::Timeout { secs: 1 },
        };
        assert_eq!(failed.next_role(), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("h\u{e9}llo w\u{f6}rld", 5), "h\u{e9}llo...");
    }
}
