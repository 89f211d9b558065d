use tokio::sync::mpsc;

use crate::agents::AgentRole;
use crate::stage::StageResult;

/// Events emitted while a pipeline runs.
///
/// Consumers receive these through [`RunHandle::next_event()`](crate::RunHandle::next_event).
/// A stage's `StageCompleted` always arrives before the next stage's `StageStarted`.
#[derive(Debug, Clone)]
pub enum Event {
    /// The task passed validation and the first stage is about to start
    RunStarted { run_id: String, task: String },
    /// An agent started working on its input
    StageStarted {
        role: AgentRole,
        activity: String,
        input_preview: String,
    },
    /// An agent finished; its full result is available for display
    StageCompleted { result: StageResult },
    /// An agent's model call failed; no later stage will run
    StageFailed { role: AgentRole, error: String },
    /// The entire run completed
    RunCompleted { status: RunStatus },
}

/// Status of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failed { error: String },
}

/// Sender for pipeline events.
///
/// Wraps a `tokio::sync::mpsc::Sender<Event>` with convenience methods.
/// If constructed with `noop()`, all sends are silently dropped.
#[derive(Clone)]
pub struct EventSender {
    inner: Option<mpsc::Sender<Event>>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self {
            inner: Some(sender),
        }
    }

    /// Create a no-op sender that silently drops all events.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Emit a non-critical event (best-effort, drops on backpressure).
    pub fn emit(&self, event: Event) {
        if let Some(ref sender) = self.inner {
            let _ = sender.try_send(event);
        }
    }

    /// Emit a critical event, waiting for capacity (blocks until consumer reads).
    pub async fn emit_blocking(&self, event: Event) {
        if let Some(ref sender) = self.inner {
            let _ = sender.send(event).await;
        }
    }
}
