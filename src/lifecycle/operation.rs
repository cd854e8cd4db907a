//! Deferred completion of lifecycle operations.
//!
//! Each operation runs as a tokio task that awaits the backend and reports back
//! over a channel. The UI loop drains completions and applies terminal statuses,
//! so the tasks never touch application state directly.

use super::OperationKind;
use crate::error::{DashboardError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Performs the asynchronous half of a lifecycle operation
pub trait ActionBackend: Send + Sync + 'static {
    fn execute(
        &self,
        resource_id: &str,
        kind: OperationKind,
    ) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Fixed latency per operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedDelays {
    pub provision: Duration,
    pub start: Duration,
    pub stop: Duration,
    pub restart: Duration,
}

impl Default for SimulatedDelays {
    fn default() -> Self {
        Self {
            provision: Duration::from_millis(2000),
            start: Duration::from_millis(2000),
            stop: Duration::from_millis(2000),
            restart: Duration::from_millis(3000),
        }
    }
}

impl SimulatedDelays {
    pub fn for_kind(&self, kind: OperationKind) -> Duration {
        match kind {
            OperationKind::Provision => self.provision,
            OperationKind::Start => self.start,
            OperationKind::Stop => self.stop,
            OperationKind::Restart => self.restart,
        }
    }
}

/// Backend that waits out a fixed delay and always succeeds
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    delays: SimulatedDelays,
}

impl SimulatedBackend {
    pub fn new(delays: SimulatedDelays) -> Self {
        Self { delays }
    }
}

impl ActionBackend for SimulatedBackend {
    fn execute(
        &self,
        resource_id: &str,
        kind: OperationKind,
    ) -> BoxFuture<'static, anyhow::Result<()>> {
        let delay = self.delays.for_kind(kind);
        let resource_id = resource_id.to_string();
        async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Simulated {} finished for {}", kind.as_str(), resource_id);
            Ok(())
        }
        .boxed()
    }
}

/// A finished operation, as reported by its task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedOperation {
    pub id: Uuid,
    pub resource_id: String,
    pub kind: OperationKind,
    /// Backend error text on failure
    pub outcome: std::result::Result<(), String>,
}

struct InFlight {
    id: Uuid,
    kind: OperationKind,
    handle: JoinHandle<()>,
}

/// Tracks at most one in-flight operation per resource
pub struct OperationScheduler {
    backend: Arc<dyn ActionBackend>,
    in_flight: HashMap<String, InFlight>,
    tx: mpsc::UnboundedSender<CompletedOperation>,
    rx: mpsc::UnboundedReceiver<CompletedOperation>,
}

impl OperationScheduler {
    pub fn new(backend: Arc<dyn ActionBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            in_flight: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start an operation for `resource_id`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, resource_id: &str, kind: OperationKind) -> Result<Uuid> {
        if self.in_flight.contains_key(resource_id) {
            return Err(DashboardError::OperationInFlight(resource_id.to_string()));
        }

        let id = Uuid::new_v4();
        let future = self.backend.execute(resource_id, kind);
        let tx = self.tx.clone();
        let task_resource_id = resource_id.to_string();

        let handle = tokio::spawn(async move {
            let outcome = future.await.map_err(|e| e.to_string());
            // Receiver only goes away with the scheduler itself
            let _ = tx.send(CompletedOperation {
                id,
                resource_id: task_resource_id,
                kind,
                outcome,
            });
        });

        tracing::debug!("Scheduled {} for {} ({})", kind.as_str(), resource_id, id);
        self.in_flight
            .insert(resource_id.to_string(), InFlight { id, kind, handle });
        Ok(id)
    }

    /// Abort the in-flight operation for a resource. Returns its id if there was one.
    pub fn cancel(&mut self, resource_id: &str) -> Option<Uuid> {
        let in_flight = self.in_flight.remove(resource_id)?;
        in_flight.handle.abort();
        tracing::debug!(
            "Cancelled {} for {} ({})",
            in_flight.kind.as_str(),
            resource_id,
            in_flight.id
        );
        Some(in_flight.id)
    }

    pub fn is_in_flight(&self, resource_id: &str) -> bool {
        self.in_flight.contains_key(resource_id)
    }

    pub fn in_flight_kind(&self, resource_id: &str) -> Option<OperationKind> {
        self.in_flight.get(resource_id).map(|f| f.kind)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Drain every completion that has arrived, without waiting
    pub fn try_completed(&mut self) -> Vec<CompletedOperation> {
        let mut completed = Vec::new();
        while let Ok(done) = self.rx.try_recv() {
            if self.accept(&done) {
                completed.push(done);
            }
        }
        completed
    }

    /// Wait for the next live completion
    pub async fn next_completed(&mut self) -> Option<CompletedOperation> {
        loop {
            let done = self.rx.recv().await?;
            if self.accept(&done) {
                return Some(done);
            }
        }
    }

    /// Completions of cancelled operations are stale and dropped
    fn accept(&mut self, done: &CompletedOperation) -> bool {
        match self.in_flight.get(&done.resource_id) {
            Some(current) if current.id == done.id => {
                self.in_flight.remove(&done.resource_id);
                true
            },
            _ => {
                tracing::debug!("Discarding stale completion {}", done.id);
                false
            },
        }
    }
}

impl Drop for OperationScheduler {
    fn drop(&mut self) {
        for (_, in_flight) in self.in_flight.drain() {
            in_flight.handle.abort();
        }
    }
}
