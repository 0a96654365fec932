//! Outbound quote-request payload.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::form::FormSnapshot;
use crate::types::Timestamp;

/// JSON body POSTed to the quote endpoint.
///
/// The snapshot minus the honeypot, plus how long the form took to fill in
/// and when it was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub service_type: String,
    pub rooms: String,
    #[serde(default)]
    pub add_ons: String,
    #[serde(default)]
    pub preferred_days: String,
    #[serde(default)]
    pub parking_notes: String,
    #[serde(default)]
    pub text_ok: bool,
    /// Whole seconds from first interaction to submit, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u64>,
    /// ISO-8601 send time.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl QuoteRequest {
    /// Build the payload for `form`. The honeypot value is dropped.
    pub fn from_form(
        form: &FormSnapshot,
        fill_time: Option<Duration>,
        sent_at: Timestamp,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            name: form.name.clone(),
            mobile: form.mobile.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            service_type: form.service_type.clone(),
            rooms: form.rooms.clone(),
            add_ons: form.add_ons.clone(),
            preferred_days: form.preferred_days.clone(),
            parking_notes: form.parking_notes.clone(),
            text_ok: form.text_ok,
            completion_time: fill_time.map(rounded_secs),
            timestamp: sent_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            user_agent,
        }
    }

    /// Rebuild a form snapshot on the receiving side.
    ///
    /// `website` is whatever the sender put in the honeypot, usually nothing.
    pub fn to_form(&self, website: String) -> FormSnapshot {
        FormSnapshot {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            service_type: self.service_type.clone(),
            rooms: self.rooms.clone(),
            add_ons: self.add_ons.clone(),
            preferred_days: self.preferred_days.clone(),
            parking_notes: self.parking_notes.clone(),
            website,
            text_ok: self.text_ok,
        }
    }

    /// Preferred contact channel for reporting.
    pub fn preferred_contact(&self) -> &'static str {
        if self.text_ok {
            "text"
        } else {
            "email"
        }
    }
}

fn rounded_secs(d: Duration) -> u64 {
    (d.as_millis() + 500) as u64 / 1000
}
