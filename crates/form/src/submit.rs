//! Quote delivery.
//!
//! [`QuoteSubmitter`] is the seam between the form session and wherever
//! quotes go. [`HttpSubmitter`] POSTs to the intake API;
//! [`SimulatedSubmitter`] stands in while no endpoint exists.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use sparkle_core::submission::QuoteRequest;

/// Message for transport failures; also the simulated failure text.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please try again";

pub const USER_MESSAGE_CONNECTIVITY: &str =
    "Connection issue - please check your internet and try again";
pub const USER_MESSAGE_GENERIC: &str =
    "Something went wrong - please try again or call us directly";

/// HTTP request timeout for one submission.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Transport-level failure: DNS, refused connection, timeout.
    #[error("Network error - {0}")]
    Network(String),

    #[error("Server error: {0}")]
    HttpStatus(u16),

    /// The request could not be built or the client failed otherwise.
    #[error("Request failed: {0}")]
    Request(String),
}

impl SubmitError {
    /// What to show the visitor.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::Network(_) => USER_MESSAGE_CONNECTIVITY,
            SubmitError::HttpStatus(_) | SubmitError::Request(_) => USER_MESSAGE_GENERIC,
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SubmitError::Network(e.to_string())
        } else {
            SubmitError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait QuoteSubmitter: Send + Sync {
    async fn submit(&self, request: &QuoteRequest) -> Result<(), SubmitError>;
}

// ---------------------------------------------------------------------------
// HttpSubmitter
// ---------------------------------------------------------------------------

/// POSTs the quote as JSON to a single endpoint. Any 2xx is success.
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuoteSubmitter for HttpSubmitter {
    async fn submit(&self, request: &QuoteRequest) -> Result<(), SubmitError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, status = status.as_u16(), "Quote endpoint rejected submission");
            return Err(SubmitError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SimulatedSubmitter
// ---------------------------------------------------------------------------

/// Waits a realistic round-trip and occasionally fails.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Probability in `[0, 1]` of a simulated network failure.
    pub failure_rate: f64,
}

impl SimulatedSubmitter {
    pub fn always_succeeds() -> Self {
        Self {
            failure_rate: 0.0,
            ..Self::default()
        }
    }

    pub fn always_fails() -> Self {
        Self {
            failure_rate: 1.0,
            ..Self::default()
        }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1500),
            max_delay: Duration::from_millis(2500),
            failure_rate: 0.05,
        }
    }
}

#[async_trait]
impl QuoteSubmitter for SimulatedSubmitter {
    async fn submit(&self, _request: &QuoteRequest) -> Result<(), SubmitError> {
        // The rng is not Send; finish with it before awaiting.
        let (delay, fail) = {
            let mut rng = rand::rng();
            let min = self.min_delay.as_millis() as u64;
            let max = (self.max_delay.as_millis() as u64).max(min);
            let delay = Duration::from_millis(rng.random_range(min..=max));
            let fail = rng.random_bool(self.failure_rate.clamp(0.0, 1.0));
            (delay, fail)
        };

        tokio::time::sleep(delay).await;

        if fail {
            Err(SubmitError::Network("please try again".to_string()))
        } else {
            Ok(())
        }
    }
}
