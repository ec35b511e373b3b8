//! # Event Subscriber
//!
//! Receiving side of the bus. A [`Subscription`] applies its filter on
//! receive and counts the events it lost by falling behind.

use crate::events::{EventFilter, EventTopic, ProtocolEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub(crate) type TopicCounts = Arc<Mutex<HashMap<EventTopic, usize>>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

/// Handle for receiving committed events. Dropping it releases its
/// registration on the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<ProtocolEvent>,
    filter: EventFilter,
    interest: TopicCounts,
    topics: Vec<EventTopic>,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<ProtocolEvent>,
        filter: EventFilter,
        interest: TopicCounts,
        topics: Vec<EventTopic>,
    ) -> Self {
        Self {
            receiver,
            filter,
            interest,
            topics,
            missed: 0,
        }
    }

    /// Next matching event, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<ProtocolEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.missed += count;
                    warn!(lagged = count, "Subscriber lagged, events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Non-blocking receive. `Ok(None)` means nothing is buffered.
    pub fn try_recv(&mut self) -> Result<Option<ProtocolEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    self.missed += count;
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Every matching event currently buffered.
    pub fn drain(&mut self) -> Vec<ProtocolEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Events overwritten before this subscription read them. Any non-zero
    /// value means the observer must resync from state queries.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut interest = self.interest.lock();
        for topic in &self.topics {
            if let Some(count) = interest.get_mut(topic) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    interest.remove(topic);
                }
            }
        }
        debug!(topics = ?self.topics, missed = self.missed, "Subscription closed");
    }
}
