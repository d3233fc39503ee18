use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex, MutexGuard,
};

use crate::FeedEvent;

/// Receives pipeline events as they happen.
///
/// Emitting never fails and never blocks the pipeline; a sink that cannot
/// deliver an event drops it.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: FeedEvent);
}

/// Forwards events to a receiver on another thread, such as the progress
/// renderer.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<FeedEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<FeedEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: FeedEvent) {
        // The renderer may already be gone.
        let _ = self.sender.send(event);
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: FeedEvent) {}
}

/// Keeps every event in emission order.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<FeedEvent>>,
}

impl CollectorSink {
    fn lock(&self) -> MutexGuard<'_, Vec<FeedEvent>> {
        self.events.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn events(&self) -> Vec<FeedEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the repositories reported as failed, in report order.
    pub fn failed_repos(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| {
                match event {
                    FeedEvent::RepoFailed { repo, .. } => Some(repo.clone()),
                    _ => None,
                }
            })
            .collect()
    }

    /// Number of cache misses reported.
    pub fn cache_misses(&self) -> usize {
        self.lock()
            .iter()
            .filter(|event| matches!(event, FeedEvent::CacheMiss { .. }))
            .count()
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: FeedEvent) {
        self.lock().push(event);
    }
}
