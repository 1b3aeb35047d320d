//! Completion Events
//!
//! Mutating cache operations may carry a client-chosen completion id. Once the
//! operation has been applied, the record store publishes a [`CompletionEvent`]
//! under that id so the caller (or a near-cache) can react. Delivery to clients
//! is not handled here; sinks only hand the event on.

use crate::serialization::Data;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionOutcome {
    Created,
    Updated,
    Removed,
    /// The operation ran but left the entry untouched (e.g. replace on a missing key).
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub completion_id: i32,
    pub cache_name: String,
    pub key: Data,
    pub outcome: CompletionOutcome,
}

pub trait CompletionSink: Send + Sync {
    fn publish(&self, event: CompletionEvent);
}

/// Logs events and drops them. Used when nobody listens for completions.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl CompletionSink for LoggingSink {
    fn publish(&self, event: CompletionEvent) {
        tracing::debug!(
            "Completion {} on cache '{}': {:?}",
            event.completion_id,
            event.cache_name,
            event.outcome
        );
    }
}

/// Fans events out to any number of in-process subscribers.
pub struct BroadcastSink {
    sender: broadcast::Sender<CompletionEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CompletionEvent> {
        self.sender.subscribe()
    }
}

impl CompletionSink for BroadcastSink {
    fn publish(&self, event: CompletionEvent) {
        // send only fails when there are no receivers
        if self.sender.send(event).is_err() {
            tracing::trace!("Completion event dropped, no subscribers");
        }
    }
}
