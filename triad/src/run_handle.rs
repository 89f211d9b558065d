use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::TriadError;
use crate::event::Event;
use crate::stage::PipelineResult;

/// Handle to a running pipeline.
///
/// Provides an event stream for progressive display and a way to wait
/// for the final result.
///
/// # Event consumption
///
/// Call [`next_event()`](Self::next_event) in a loop to receive events,
/// then call [`wait()`](Self::wait) to get the final result.
///
/// # Example
///
/// ```no_run
/// # use triad::{Event, PipelineResult, RunHandle, TriadError};
/// # async fn example(mut handle: RunHandle) -> Result<PipelineResult, TriadError> {
/// while let Some(event) = handle.next_event().await {
///     if let Event::StageCompleted { result } = event {
///         println!("{}: {}", result.role, result.output_text);
///     }
/// }
/// handle.wait().await
/// # }
/// ```
pub struct RunHandle {
    events: mpsc::Receiver<Event>,
    completion: JoinHandle<Result<PipelineResult, TriadError>>,
}

impl RunHandle {
    pub(crate) fn new(
        events: mpsc::Receiver<Event>,
        completion: JoinHandle<Result<PipelineResult, TriadError>>,
    ) -> Self {
        Self { events, completion }
    }

    /// Receive the next event from the running pipeline.
    ///
    /// Returns `None` when the event stream is closed (run is complete or failed).
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Wait for the run to complete and return the final result.
    ///
    /// Events not yet received are dropped with the handle. If you want to
    /// process them, call [`next_event()`](Self::next_event) first.
    pub async fn wait(self) -> Result<PipelineResult, TriadError> {
        let Self { events, completion } = self;
        // Closing the receiver unblocks a pipeline waiting on channel capacity
        drop(events);
        completion
            .await
            .map_err(|e| TriadError::Internal(anyhow::anyhow!("task join error: {}", e)))?
    }

    /// Convenience: drain all events and wait for the result.
    pub async fn output(mut self) -> Result<PipelineResult, TriadError> {
        while self.events.recv().await.is_some() {}
        self.wait().await
    }
}
