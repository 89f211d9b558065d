use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::builder::TriadBuilder;
use crate::error::TriadError;
use crate::event::EventSender;
use crate::llm::{ApiKey, ModelClient};
use crate::pipeline::Orchestrator;
use crate::run_handle::RunHandle;
use crate::stage::{PipelineResult, Task};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared inner state, wrapped in Arc so spawned tasks can reference it.
struct Inner {
    client: Box<dyn ModelClient>,
}

/// Primary entry point for the triad library.
///
/// Use [`Triad::builder()`] to construct an instance. The instance holds no
/// credentials: every run takes its own [`ApiKey`].
///
/// # Example
///
/// ```no_run
/// # use triad::{ApiKey, Event, Triad};
/// # async fn example() -> Result<(), triad::TriadError> {
/// let triad = Triad::builder().anthropic(None).build()?;
///
/// let key = ApiKey::new(std::env::var("ANTHROPIC_API_KEY").unwrap_or_default());
/// let mut handle = triad.run("Explain the theory of relativity", key).await?;
/// while let Some(event) = handle.next_event().await {
///     if let Event::StageCompleted { result } = event {
///         println!("## {}\n{}", result.role, result.output_text);
///     }
/// }
/// let result = handle.wait().await?;
/// println!("{}", result.final_output());
/// # Ok(())
/// # }
/// ```
pub struct Triad {
    inner: Arc<Inner>,
}

impl Triad {
    pub(crate) fn from_client(client: Box<dyn ModelClient>) -> Self {
        Self {
            inner: Arc::new(Inner { client }),
        }
    }

    /// Create a new builder for configuring a `Triad` instance.
    pub fn builder() -> TriadBuilder {
        TriadBuilder::new()
    }

    /// Name of the configured model client.
    pub fn client_name(&self) -> &str {
        self.inner.client.name()
    }

    /// Start a pipeline run and return a handle for events and the final result.
    ///
    /// The task is validated before anything is spawned, so an empty task fails
    /// here without touching the model. The stages then execute in a background
    /// tokio task.
    pub async fn run(
        &self,
        task: &str,
        api_key: impl Into<ApiKey>,
    ) -> Result<RunHandle, TriadError> {
        let task = Task::new(task)?;
        let api_key = api_key.into();

        info!(client = self.client_name(), "starting run");

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let events = EventSender::new(tx);
        let inner = Arc::clone(&self.inner);

        let completion = tokio::spawn(async move {
            let orchestrator = Orchestrator::new(inner.client.as_ref());
            let result = orchestrator
                .run_pipeline(task.text(), &api_key, &events)
                .await;
            if let Err(ref e) = result {
                warn!(error = %e, "run failed");
            }
            // EventSender is dropped here, closing the channel
            result.map_err(TriadError::from)
        });

        Ok(RunHandle::new(rx, completion))
    }

    /// Run the pipeline and wait for the result, without events.
    pub async fn run_to_completion(
        &self,
        task: &str,
        api_key: &ApiKey,
    ) -> Result<PipelineResult, TriadError> {
        let orchestrator = Orchestrator::new(self.inner.client.as_ref());
        let result = orchestrator
            .run_pipeline(task, api_key, &EventSender::noop())
            .await?;
        Ok(result)
    }
}
