//! # Shared Bus - Committed Event Distribution
//!
//! Every state-changing entry point emits a [`ProtocolEvent`] once its
//! transition commits. Observers subscribe with an [`EventFilter`]; failed
//! operations publish nothing.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ KeyperChain  │                    │  Observer    │
//! │   (commit)   │    publish()       │ (keyper,     │
//! │              │ ──────┐            │  arbiter...) │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! [`EventRecord`] is the flat key/value rendering of an event for
//! observers that index by attribute.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod events;
pub mod publisher;
pub mod subscriber;

pub use codec::{EventDecodeError, EventRecord};
pub use events::{EventFilter, EventTopic, ProtocolEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
