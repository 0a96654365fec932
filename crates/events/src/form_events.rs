//! Quote-form analytics events.
//!
//! [`FormEvents`] shapes the `form_*` events for one form type and
//! publishes them on the [`EventBus`]. All methods are fire-and-forget.

use std::sync::Arc;

use serde_json::json;
use sparkle_core::completion::FormCompletion;
use sparkle_core::form::FormField;
use sparkle_core::submission::QuoteRequest;

use crate::bus::{AnalyticsEvent, EventBus};
use crate::site::PageContext;

pub const EVENT_FORM_START: &str = "form_start";
pub const EVENT_FORM_FIELD_FOCUS: &str = "form_field_focus";
pub const EVENT_FORM_EXPAND_DETAILS: &str = "form_expand_details";
pub const EVENT_FORM_SUBMIT_ATTEMPT: &str = "form_submit_attempt";
pub const EVENT_FORM_SUBMIT_SUCCESS: &str = "form_submit_success";
pub const EVENT_FORM_SUBMIT_ERROR: &str = "form_submit_error";
pub const EVENT_FORM_VALIDATION_ERROR: &str = "form_validation_error";
pub const EVENT_FORM_ABANDON: &str = "form_abandon";

pub const CATEGORY_FORM_INTERACTION: &str = "form_interaction";
pub const CATEGORY_CONVERSION: &str = "conversion";

/// Default form type label.
pub const DEFAULT_FORM_TYPE: &str = "quote_form";

/// User agents are truncated to this many characters.
const USER_AGENT_LIMIT: usize = 100;

/// Event helper bound to one form.
#[derive(Clone)]
pub struct FormEvents {
    bus: Arc<EventBus>,
    form_type: String,
    context: PageContext,
}

impl FormEvents {
    pub fn new(bus: Arc<EventBus>, form_type: impl Into<String>) -> Self {
        Self {
            bus,
            form_type: form_type.into(),
            context: PageContext::default(),
        }
    }

    /// Attach page URL / user agent reported with `form_start`.
    pub fn with_context(mut self, context: PageContext) -> Self {
        self.context = context;
        self
    }

    pub fn form_type(&self) -> &str {
        &self.form_type
    }

    fn event(&self, name: &str) -> AnalyticsEvent {
        AnalyticsEvent::new(name)
            .with_category(CATEGORY_FORM_INTERACTION)
            .with_label(self.form_type.clone())
    }

    pub fn start(&self) {
        let user_agent = self
            .context
            .user_agent
            .as_deref()
            .map(|ua| ua.chars().take(USER_AGENT_LIMIT).collect::<String>());
        self.bus.publish(self.event(EVENT_FORM_START).with_custom(json!({
            "page_url": self.context.page_url,
            "user_agent": user_agent,
        })));
    }

    pub fn field_focus(&self, field: FormField) {
        self.bus.publish(
            self.event(EVENT_FORM_FIELD_FOCUS)
                .with_label(format!("{}_{}", self.form_type, field))
                .with_custom(json!({ "field_name": field.as_str() })),
        );
    }

    pub fn expand_details(&self) {
        self.bus.publish(
            self.event(EVENT_FORM_EXPAND_DETAILS)
                .with_custom(json!({ "section": "additional_details" })),
        );
    }

    pub fn submit_attempt(&self) {
        let event = self.event(EVENT_FORM_SUBMIT_ATTEMPT);
        let custom = json!({ "timestamp": event.timestamp });
        self.bus.publish(event.with_custom(custom));
    }

    pub fn submit_success(&self, payload: &QuoteRequest) {
        self.bus.publish(
            self.event(EVENT_FORM_SUBMIT_SUCCESS)
                .with_category(CATEGORY_CONVERSION)
                .with_value(1)
                .with_custom(json!({
                    "service_type": payload.service_type,
                    "has_add_ons": !payload.add_ons.trim().is_empty(),
                    "preferred_contact": payload.preferred_contact(),
                    "completion_time": payload.completion_time,
                })),
        );
    }

    pub fn submit_error(&self, error: &str) {
        let event = self.event(EVENT_FORM_SUBMIT_ERROR);
        let custom = json!({ "error_type": error, "timestamp": event.timestamp });
        self.bus.publish(event.with_custom(custom));
    }

    pub fn validation_error(&self, field: FormField, error: &str) {
        self.bus.publish(self.event(EVENT_FORM_VALIDATION_ERROR).with_custom(json!({
            "field_name": field.as_str(),
            "error_type": error,
        })));
    }

    pub fn abandon(&self, completion: &FormCompletion) {
        let rate = if completion.total_fields > 0 {
            completion.completed_fields as f64 / completion.total_fields as f64
        } else {
            0.0
        };
        self.bus.publish(self.event(EVENT_FORM_ABANDON).with_custom(json!({
            "completion_rate": rate,
            "fields_completed": completion.completed_fields,
            "total_fields": completion.total_fields,
        })));
    }
}
