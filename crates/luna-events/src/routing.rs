//! Diagnostic event bus.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::payloads::{BridgeEvent, DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId};

/// Live diagnostics for one subscriber. Lagging subscribers see a
/// `Lagged` error item and then resume.
pub type EventStream = BroadcastStream<EventEnvelope>;

/// Recent events plus the id counter, guarded together so ids enter the ring in order.
#[derive(Debug)]
struct Ring {
    entries: VecDeque<EventEnvelope>,
    capacity: usize,
    next_id: EventId,
}

impl Ring {
    fn append(&mut self, event: BridgeEvent) -> EventEnvelope {
        let envelope = EventEnvelope {
            id: self.next_id,
            timestamp: Utc::now(),
            event,
        };
        self.next_id = self.next_id.saturating_add(1);
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(envelope.clone());
        envelope
    }
}

/// Broadcast bus for bridge diagnostics that also keeps the most recent events.
///
/// Publishing never blocks and never fails; events with no subscriber are
/// still kept in the ring.
#[derive(Clone)]
pub struct EventBus {
    live: broadcast::Sender<EventEnvelope>,
    ring: Arc<Mutex<Ring>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring();
        formatter
            .debug_struct("EventBus")
            .field("capacity", &ring.capacity)
            .field("buffered", &ring.entries.len())
            .field("subscribers", &self.live.receiver_count())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Bus keeping up to `capacity` recent events (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (live, _) = broadcast::channel(capacity);
        Self {
            live,
            ring: Arc::new(Mutex::new(Ring {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                next_id: 1,
            })),
        }
    }

    /// Bus with [`DEFAULT_REPLAY_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        BroadcastStream::new(self.live.subscribe())
    }

    /// Record `event`, fan it out to subscribers and return its id.
    pub fn publish(&self, event: BridgeEvent) -> EventId {
        let mut ring = self.ring();
        let envelope = ring.append(event);
        let id = envelope.id;
        // Sent under the lock so live order matches ring order.
        let _ = self.live.send(envelope);
        id
    }

    /// Every buffered event, oldest first.
    #[must_use]
    pub fn backlog(&self) -> Vec<BridgeEvent> {
        self.ring()
            .entries
            .iter()
            .map(|env| env.event.clone())
            .collect()
    }

    fn ring(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
