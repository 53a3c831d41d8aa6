//! Fire-and-forget delivery of resolution events.
//!
//! The resolver posts events into a bounded queue and never waits on them.
//! A worker task drains the queue and hands each event to every sink in its
//! own task. Sink failures are logged and dropped: they are never retried and
//! never reach the redirect response.

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace, warn};
use tripgate_core::{Event, EventSink};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Sending half of the event queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sender: Option<mpsc::Sender<Event>>,
}

impl Dispatcher {
    /// Starts the worker on the current tokio runtime.
    ///
    /// Events beyond `capacity` waiting in the queue are dropped.
    pub fn spawn(sinks: Vec<Arc<dyn EventSink>>, capacity: usize) -> (Self, DispatchWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(run_worker(receiver, sinks));
        (
            Self {
                sender: Some(sender),
            },
            DispatchWorker { task },
        )
    }

    /// A dispatcher that discards every event.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues `event` without waiting. Never fails.
    pub fn emit(&self, event: Event) {
        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(event) {
            Ok(()) => trace!("Event queued"),
            Err(TrySendError::Full(event)) => {
                warn!(host = %event.host(), "Event queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(host = %event.host(), "Event worker stopped, dropping event");
            }
        }
    }
}

/// Handle to the worker task draining the queue.
///
/// The worker stops once every [`Dispatcher`] clone has been dropped.
#[derive(Debug)]
pub struct DispatchWorker {
    task: JoinHandle<()>,
}

impl DispatchWorker {
    /// Waits until the queue is closed and every sink call has finished.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "Event worker ended abnormally");
        }
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<Event>, sinks: Vec<Arc<dyn EventSink>>) {
    let mut in_flight = JoinSet::new();

    while let Some(event) = receiver.recv().await {
        while let Some(done) = in_flight.try_join_next() {
            log_abnormal_exit(done);
        }

        let event = Arc::new(event);
        for sink in &sinks {
            let sink = Arc::clone(sink);
            let event = Arc::clone(&event);
            in_flight.spawn(async move {
                if let Err(e) = sink.handle(&event).await {
                    warn!(
                        sink = sink.name(),
                        host = %event.host(),
                        error = %e,
                        "Side effect failed"
                    );
                }
            });
        }
    }

    debug!(pending = in_flight.len(), "Event queue closed, waiting for sinks");
    while let Some(done) = in_flight.join_next().await {
        log_abnormal_exit(done);
    }
}

fn log_abnormal_exit(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        warn!(error = %e, "Sink task ended abnormally");
    }
}
