//! # Event Publisher
//!
//! Publishing side of the bus. The chain publishes while it still holds its
//! write lock, so subscribers observe events in commit order.

use crate::events::{EventFilter, EventTopic, ProtocolEvent};
use crate::subscriber::{Subscription, TopicCounts};
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sink for committed events.
///
/// Publishing never fails the caller: an event with no listeners is
/// dropped.
pub trait EventPublisher: Send + Sync {
    /// Returns the number of live subscriptions the event was offered to.
    fn publish(&self, event: ProtocolEvent) -> usize;

    /// Total events accepted since construction.
    fn events_published(&self) -> u64;
}

/// In-process bus backed by `tokio::sync::broadcast`.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<ProtocolEvent>,
    /// Live subscriptions per requested topic. Unfiltered ones count under
    /// [`EventTopic::All`].
    interest: TopicCounts,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` is the per-subscriber backlog before it starts lagging.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            interest: Arc::new(Mutex::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching `filter`.
    ///
    /// Only events published after this call are delivered.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topics = interest_topics(&filter);
        {
            let mut interest = self.interest.lock();
            for topic in &topics {
                *interest.entry(*topic).or_insert(0) += 1;
            }
        }
        debug!(?topics, from_step = ?filter.from_step, "Subscription opened");
        Subscription::new(receiver, filter, Arc::clone(&self.interest), topics)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Live subscriptions that would accept events of `topic`.
    #[must_use]
    pub fn interested_in(&self, topic: EventTopic) -> usize {
        let interest = self.interest.lock();
        let wildcard = interest.get(&EventTopic::All).copied().unwrap_or(0);
        if topic == EventTopic::All {
            return wildcard;
        }
        wildcard + interest.get(&topic).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, event: ProtocolEvent) -> usize {
        let topic = event.topic();
        let step = event.step();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                trace!(?topic, step, receivers, "Event published");
                receivers
            }
            Err(_) => {
                trace!(?topic, step, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

/// Topics a filter registers interest in, deduplicated.
fn interest_topics(filter: &EventFilter) -> Vec<EventTopic> {
    if filter.topics.is_empty() || filter.topics.contains(&EventTopic::All) {
        return vec![EventTopic::All];
    }
    let mut topics = filter.topics.clone();
    topics.sort_by_key(|t| *t as u8);
    topics.dedup();
    topics
}
