//! In-process analytics bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans every [`AnalyticsEvent`] out to whatever sinks are
//! subscribed (dev logger, collector forwarder, tests). Publishing never
//! blocks and never fails; with no subscribers the event is dropped.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sparkle_core::types::Timestamp;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// AnalyticsEvent
// ---------------------------------------------------------------------------

/// One tracked interaction.
///
/// Constructed via [`AnalyticsEvent::new`] and enriched with the builder
/// methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Snake-case event name, e.g. `"form_submit_success"`.
    pub event: String,

    /// Reporting bucket (`"form_interaction"`, `"conversion"`, ...).
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    /// Free-form property bag.
    pub custom: serde_json::Value,

    pub timestamp: Timestamp,
}

impl AnalyticsEvent {
    /// Create an event in the default `engagement` category.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            category: "engagement".to_string(),
            label: None,
            value: None,
            custom: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_custom(mut self, custom: serde_json::Value) -> Self {
        self.custom = custom;
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out analytics bus.
///
/// # Usage
///
/// ```rust
/// use sparkle_events::bus::{AnalyticsEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(AnalyticsEvent::new("page_view"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<AnalyticsEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: AnalyticsEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalyticsEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Drain everything currently buffered on `rx`. Test and debugging helper.
pub fn drain(rx: &mut broadcast::Receiver<AnalyticsEvent>) -> Vec<AnalyticsEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
