//! Researcher, Writer and Critic agents chained over a hosted language model.
//!
//! A run feeds the task to the Researcher, the Researcher's answer to the
//! Writer, and the Writer's answer to the Critic. Each stage is reported as
//! soon as it finishes; the first failing stage ends the run.

pub mod agents;
pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod pipeline;
pub mod run_handle;
pub mod stage;
mod triad;

pub use agents::{AgentReply, AgentRole, AgentRunner, PromptBuilder};
pub use builder::TriadBuilder;
pub use config::ProjectConfig;
pub use error::{ApiError, PipelineError, TriadError, ValidationError};
pub use event::{Event, EventSender, RunStatus};
pub use llm::{ApiKey, Backend, HostedModelClient, ModelClient, ModelRequest, ModelSettings};
pub use pipeline::{Orchestrator, PipelineState};
pub use run_handle::RunHandle;
pub use stage::{PipelineResult, StageResult, Task};
pub use triad::Triad;
