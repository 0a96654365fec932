//! Page-level shell around the quote form.
//!
//! [`SiteSession`] owns everything that lives for the whole page visit: the
//! analytics bus, engagement timing and the draft repository. Forms are
//! created from it with [`SiteSession::quote_form`].

use std::sync::Arc;

use sparkle_core::clock::Clock;
use sparkle_core::error::CoreError;
use sparkle_db::DraftRepo;
use sparkle_events::{EngagementTracker, EventBus, PageContext, SiteEvents};

use crate::config::FormConfig;
use crate::session::QuoteFormSession;
use crate::submit::QuoteSubmitter;

pub struct SiteSession {
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    repo: Arc<DraftRepo>,
    submitter: Arc<dyn QuoteSubmitter>,
    context: PageContext,
    site: SiteEvents,
    engagement: EngagementTracker,
}

impl SiteSession {
    pub fn new(
        bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        repo: Arc<DraftRepo>,
        submitter: Arc<dyn QuoteSubmitter>,
        context: PageContext,
    ) -> Self {
        let site = SiteEvents::new(bus.clone(), context.clone());
        let engagement = EngagementTracker::new(bus.clone(), clock.clone());
        Self {
            bus,
            clock,
            repo,
            submitter,
            context,
            site,
            engagement,
        }
    }

    /// Page loaded: start engagement timing, report the view and purge
    /// expired drafts. Returns how many drafts were removed.
    pub fn open(&self, page_name: &str) -> usize {
        self.engagement.start();
        self.site.page_view(page_name);

        let removed = self.repo.cleanup_expired_drafts();
        if removed > 0 {
            tracing::info!(removed, "Expired drafts cleaned up");
        }
        removed
    }

    /// Create a quote form bound to this page. Must be called inside a tokio
    /// runtime.
    pub fn quote_form(&self, config: FormConfig) -> Result<QuoteFormSession, CoreError> {
        QuoteFormSession::new(
            config,
            self.repo.clone(),
            self.clock.clone(),
            self.submitter.clone(),
            self.bus.clone(),
            self.context.clone(),
        )
    }

    /// Any click, scroll or keypress.
    pub fn record_activity(&self) {
        self.engagement.record_activity();
    }

    pub fn site_events(&self) -> &SiteEvents {
        &self.site
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Page unloading: report the engagement session.
    pub fn close(self) {
        self.engagement.end();
    }
}
