//! Analytics event shaping and delivery for the quote site.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`AnalyticsEvent`]: the event envelope (name, category, label, value,
//!   custom properties, timestamp).
//! - [`FormEvents`] / [`SiteEvents`]: typed helpers for the form and page
//!   events.
//! - [`EngagementTracker`]: session duration and activity reporting.
//! - [`EventLogger`] and [`AnalyticsForwarder`]: sinks that drain the bus.

pub mod bus;
pub mod delivery;
pub mod engagement;
pub mod form_events;
pub mod logger;
pub mod site;

pub use bus::{AnalyticsEvent, EventBus};
pub use delivery::webhook::{AnalyticsForwarder, ForwardError};
pub use engagement::EngagementTracker;
pub use form_events::FormEvents;
pub use logger::EventLogger;
pub use site::{PageContext, SiteEvents};
