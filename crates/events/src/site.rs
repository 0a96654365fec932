//! Page-level analytics: CTA clicks, contact links, page and section views.

use std::sync::Arc;

use serde_json::json;

use crate::bus::{AnalyticsEvent, EventBus};

pub const EVENT_CTA_CLICK: &str = "cta_click";
pub const EVENT_PHONE_CLICK: &str = "phone_click";
pub const EVENT_EMAIL_CLICK: &str = "email_click";
pub const EVENT_PAGE_VIEW: &str = "page_view";
pub const EVENT_SECTION_VIEW: &str = "section_view";

pub const CATEGORY_NAVIGATION: &str = "navigation";
pub const CATEGORY_CONTACT: &str = "contact";
pub const CATEGORY_ENGAGEMENT: &str = "engagement";

/// Where the visitor is, as far as the host page can tell us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub page_url: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Clone)]
pub struct SiteEvents {
    bus: Arc<EventBus>,
    context: PageContext,
}

impl SiteEvents {
    pub fn new(bus: Arc<EventBus>, context: PageContext) -> Self {
        Self { bus, context }
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn cta_click(&self, cta_type: &str, location: &str) {
        self.bus.publish(
            AnalyticsEvent::new(EVENT_CTA_CLICK)
                .with_category(CATEGORY_NAVIGATION)
                .with_label(cta_type)
                .with_custom(json!({
                    "location": location,
                    "page_url": self.context.page_url,
                })),
        );
    }

    pub fn phone_click(&self, location: &str) {
        self.bus.publish(
            AnalyticsEvent::new(EVENT_PHONE_CLICK)
                .with_category(CATEGORY_CONTACT)
                .with_label("phone_number")
                .with_custom(json!({ "location": location })),
        );
    }

    pub fn email_click(&self, location: &str) {
        self.bus.publish(
            AnalyticsEvent::new(EVENT_EMAIL_CLICK)
                .with_category(CATEGORY_CONTACT)
                .with_label("email_address")
                .with_custom(json!({ "location": location })),
        );
    }

    pub fn page_view(&self, page_name: &str) {
        self.bus.publish(
            AnalyticsEvent::new(EVENT_PAGE_VIEW)
                .with_category(CATEGORY_NAVIGATION)
                .with_label(page_name)
                .with_custom(json!({
                    "page_url": self.context.page_url,
                    "referrer": self.context.referrer,
                })),
        );
    }

    pub fn section_view(&self, section: &str) {
        self.bus.publish(
            AnalyticsEvent::new(EVENT_SECTION_VIEW)
                .with_category(CATEGORY_ENGAGEMENT)
                .with_label(section)
                .with_custom(json!({ "page_url": self.context.page_url })),
        );
    }
}
