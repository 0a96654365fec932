//! Development sink: log every analytics event.

use tokio::sync::broadcast;

use crate::bus::AnalyticsEvent;

/// Background task that writes each event to the `tracing` log at debug
/// level.
pub struct EventLogger;

impl EventLogger {
    /// Run until the bus is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<AnalyticsEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::log(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
    }

    fn log(event: &AnalyticsEvent) {
        tracing::debug!(
            event = %event.event,
            category = %event.category,
            label = event.label.as_deref().unwrap_or(""),
            value = event.value,
            custom = %event.custom,
            "Analytics event"
        );
    }
}
