//! Collector delivery with exponential-backoff retry.
//!
//! [`AnalyticsForwarder`] posts each [`AnalyticsEvent`] as JSON to a single
//! collector URL. Failed attempts are retried three times (1 s, 2 s, 4 s).
//! Delivery is best-effort: a lost event is logged and forgotten.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::bus::AnalyticsEvent;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Network, DNS, timeout or client construction failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Collector returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// AnalyticsForwarder
// ---------------------------------------------------------------------------

pub struct AnalyticsForwarder {
    client: reqwest::Client,
    url: String,
}

impl AnalyticsForwarder {
    pub fn new(url: impl Into<String>) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver one event, retrying with backoff before giving up.
    pub async fn deliver(&self, event: &AnalyticsEvent) -> Result<(), ForwardError> {
        let url = self.url.as_str();

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        event = %event.event,
                        error = %e,
                        "Analytics delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        self.try_send(event).await.inspect_err(|e| {
            tracing::error!(url, event = %event.event, error = %e, "Analytics delivery failed after all retries");
        })
    }

    async fn try_send(&self, event: &AnalyticsEvent) -> Result<(), ForwardError> {
        let response = self.client.post(&self.url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(ForwardError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }

    /// Forward every event from the bus until it closes.
    ///
    /// Events are delivered one at a time; a slow collector makes the
    /// receiver lag rather than blocking publishers.
    pub async fn run(self, mut receiver: broadcast::Receiver<AnalyticsEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    // Already logged inside `deliver`.
                    let _ = self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Analytics forwarder lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, analytics forwarder shutting down");
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn new_keeps_url() {
        let forwarder = AnalyticsForwarder::new("http://collector.test/events").unwrap();
        assert_eq!(forwarder.url(), "http://collector.test/events");
    }

    #[test]
    fn forward_error_display_http_status() {
        let err = ForwardError::HttpStatus(502);
        assert_eq!(err.to_string(), "Collector returned HTTP 502");
    }

    #[test]
    fn forward_error_display_request() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = ForwardError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_collector_gives_up_after_retries() {
        // Nothing listens on the discard port of loopback.
        let forwarder = AnalyticsForwarder::new("http://127.0.0.1:9/events").unwrap();
        let result = forwarder.deliver(&AnalyticsEvent::new("page_view")).await;
        assert_matches!(result, Err(ForwardError::Request(_)));
    }
}
