use std::sync::Arc;

use sparkle_core::spam::SpamFilter;
use sparkle_events::EventBus;

use crate::config::ServerConfig;
use crate::inbox::QuoteInbox;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Fan-out for `quote_received` and any other server-side events.
    pub event_bus: Arc<EventBus>,
    pub spam: Arc<SpamFilter>,
    pub inbox: Arc<QuoteInbox>,
}

impl AppState {
    /// Build state from configuration. Fails if the spam thresholds are out
    /// of range.
    pub fn new(
        config: ServerConfig,
        event_bus: Arc<EventBus>,
    ) -> Result<Self, sparkle_core::error::CoreError> {
        let spam = SpamFilter::new(config.spam.clone())?;
        let inbox = QuoteInbox::with_capacity(config.inbox_capacity);
        Ok(Self {
            config: Arc::new(config),
            event_bus,
            spam: Arc::new(spam),
            inbox: Arc::new(inbox),
        })
    }
}
