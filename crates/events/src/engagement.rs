//! Session engagement timing.
//!
//! A page session records when it started and when the visitor last did
//! something. On [`EngagementTracker::end`] the two spans are reported as a
//! single `engagement_session` event.

use std::sync::{Arc, Mutex};

use serde_json::json;
use sparkle_core::clock::Clock;
use sparkle_core::types::EpochMillis;

use crate::bus::{AnalyticsEvent, EventBus};
use crate::site::CATEGORY_ENGAGEMENT;

pub const EVENT_ENGAGEMENT_SESSION: &str = "engagement_session";

#[derive(Debug, Clone, Copy)]
struct Span {
    started: EpochMillis,
    last_activity: EpochMillis,
}

pub struct EngagementTracker {
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    span: Mutex<Span>,
}

impl EngagementTracker {
    /// Create a tracker; the session starts now.
    pub fn new(bus: Arc<EventBus>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_millis();
        Self {
            bus,
            clock,
            span: Mutex::new(Span {
                started: now,
                last_activity: now,
            }),
        }
    }

    /// Restart the session clock.
    pub fn start(&self) {
        let now = self.clock.now_millis();
        let mut span = self.span.lock().unwrap_or_else(|e| e.into_inner());
        *span = Span {
            started: now,
            last_activity: now,
        };
    }

    pub fn record_activity(&self) {
        let now = self.clock.now_millis();
        let mut span = self.span.lock().unwrap_or_else(|e| e.into_inner());
        span.last_activity = now;
    }

    /// Emit `engagement_session` for the span so far.
    pub fn end(&self) {
        let now = self.clock.now_millis();
        let span = *self.span.lock().unwrap_or_else(|e| e.into_inner());

        let total_time = (now - span.started).max(0);
        let active_time = (span.last_activity - span.started).max(0);
        let engagement_rate = if total_time > 0 {
            active_time as f64 / total_time as f64
        } else {
            0.0
        };

        self.bus.publish(
            AnalyticsEvent::new(EVENT_ENGAGEMENT_SESSION)
                .with_category(CATEGORY_ENGAGEMENT)
                .with_label("session_duration")
                .with_value((total_time as f64 / 1000.0).round() as i64)
                .with_custom(json!({
                    "total_time": total_time,
                    "active_time": active_time,
                    "engagement_rate": engagement_rate,
                })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::drain;
    use chrono::Duration;
    use sparkle_core::clock::ManualClock;

    #[test]
    fn end_reports_total_and_active_time() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let clock = Arc::new(ManualClock::starting_now());
        let tracker = EngagementTracker::new(bus, clock.clone());

        clock.advance(Duration::milliseconds(3_000));
        tracker.record_activity();
        clock.advance(Duration::milliseconds(7_400));
        tracker.end();

        let e = drain(&mut rx).remove(0);
        assert_eq!(e.event, EVENT_ENGAGEMENT_SESSION);
        assert_eq!(e.label.as_deref(), Some("session_duration"));
        assert_eq!(e.value, Some(10));
        assert_eq!(e.custom["total_time"], 10_400);
        assert_eq!(e.custom["active_time"], 3_000);
        let rate = e.custom["engagement_rate"].as_f64().unwrap();
        assert!((rate - 3_000.0 / 10_400.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_session_has_zero_rate() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let clock = Arc::new(ManualClock::starting_now());
        let tracker = EngagementTracker::new(bus, clock);

        tracker.end();

        let e = drain(&mut rx).remove(0);
        assert_eq!(e.value, Some(0));
        assert_eq!(e.custom["engagement_rate"], 0.0);
    }

    #[test]
    fn start_resets_the_span() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let clock = Arc::new(ManualClock::starting_now());
        let tracker = EngagementTracker::new(bus, clock.clone());

        clock.advance(Duration::seconds(60));
        tracker.start();
        clock.advance(Duration::seconds(2));
        tracker.end();

        let e = drain(&mut rx).remove(0);
        assert_eq!(e.custom["total_time"], 2_000);
        assert_eq!(e.custom["active_time"], 0);
    }
}
