//! Handlers for the `/quotes` resource.
//!
//! Incoming quotes go through the same spam heuristics and field rules as
//! the browser form. Spam gets a normal-looking receipt and is dropped.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sparkle_core::form::FormSnapshot;
use sparkle_core::submission::QuoteRequest;
use sparkle_core::validation::validate_form;
use sparkle_events::AnalyticsEvent;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::inbox::StoredQuote;
use crate::middleware::auth::Operator;
use crate::response::DataResponse;
use crate::state::AppState;

pub const EVENT_QUOTE_RECEIVED: &str = "quote_received";

/// Body of `POST /api/v1/quotes`: the quote payload plus the honeypot.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomingQuote {
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 30))]
    pub mobile: String,
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 300))]
    pub address: String,
    #[validate(length(max = 20))]
    pub service_type: String,
    #[validate(length(max = 100))]
    pub rooms: String,
    #[validate(length(max = 1000))]
    pub add_ons: String,
    #[validate(length(max = 200))]
    pub preferred_days: String,
    #[validate(length(max = 1000))]
    pub parking_notes: String,
    pub text_ok: bool,
    /// Seconds from first keystroke to submit.
    pub completion_time: Option<u64>,
    #[validate(length(max = 64))]
    pub timestamp: String,
    #[validate(length(max = 500))]
    pub user_agent: Option<String>,
    /// Honeypot. Real visitors never fill it.
    #[validate(length(max = 500))]
    pub website: String,
}

impl IncomingQuote {
    fn to_form(&self) -> FormSnapshot {
        self.to_request().to_form(self.website.clone())
    }

    fn to_request(&self) -> QuoteRequest {
        QuoteRequest {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            service_type: self.service_type.clone(),
            rooms: self.rooms.clone(),
            add_ons: self.add_ons.clone(),
            preferred_days: self.preferred_days.clone(),
            parking_notes: self.parking_notes.clone(),
            text_ok: self.text_ok,
            completion_time: self.completion_time,
            timestamp: self.timestamp.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReceipt {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
}

/// POST /api/v1/quotes
pub async fn create_quote(
    State(state): State<AppState>,
    Json(input): Json<IncomingQuote>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteReceipt>>)> {
    input.validate()?;

    let receipt = QuoteReceipt {
        id: Uuid::now_v7(),
        received_at: Utc::now(),
    };

    let form = input.to_form();
    let fill_time = input.completion_time.map(Duration::from_secs);
    if let Some(signal) = state.spam.detect(&form, fill_time) {
        tracing::info!(id = %receipt.id, signal = signal.as_str(), "Spam quote discarded");
        return Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })));
    }

    let validation = validate_form(&form);
    if !validation.is_valid {
        tracing::debug!(fields = validation.errors.len(), "Quote failed validation");
        return Err(AppError::InvalidForm(validation));
    }

    let quote = input.to_request();
    state.event_bus.publish(
        AnalyticsEvent::new(EVENT_QUOTE_RECEIVED)
            .with_category("conversion")
            .with_label(quote.service_type.clone())
            .with_value(1)
            .with_custom(json!({
                "id": receipt.id,
                "service_type": quote.service_type,
                "preferred_contact": quote.preferred_contact(),
                "completion_time": quote.completion_time,
            })),
    );

    tracing::info!(id = %receipt.id, service_type = %quote.service_type, "Quote received");

    let evicted = state
        .inbox
        .push(StoredQuote {
            id: receipt.id,
            received_at: receipt.received_at,
            quote,
        })
        .await;
    if let Some(old) = evicted {
        tracing::warn!(id = %old.id, capacity = state.inbox.capacity(), "Inbox full, oldest quote evicted");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/quotes
///
/// Operator only.
pub async fn list_quotes(
    _operator: Operator,
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<StoredQuote>>> {
    Json(DataResponse {
        data: state.inbox.list().await,
    })
}
