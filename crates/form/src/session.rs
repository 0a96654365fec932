//! The quote-form session controller.
//!
//! [`QuoteFormSession`] holds what the visitor has typed plus the flags the
//! page needs: whether they have interacted, which fields have errors,
//! whether a draft notice is showing, and whether the quote went out. It
//! drives auto-save, spam screening, validation, submission and analytics.
//!
//! Field updates are synchronous. The only suspension point is
//! [`QuoteFormSession::submit`], and at most one submission runs at a time.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sparkle_core::clock::Clock;
use sparkle_core::completion::{form_completion, FormCompletion};
use sparkle_core::error::CoreError;
use sparkle_core::form::{FormField, FormSnapshot};
use sparkle_core::spam::SpamFilter;
use sparkle_core::submission::QuoteRequest;
use sparkle_core::types::EpochMillis;
use sparkle_core::validation::{validate_field, validate_form, ValidationResult};
use sparkle_db::models::draft::DraftInfo;
use sparkle_db::DraftRepo;
use sparkle_events::{EventBus, FormEvents, PageContext, SiteEvents};

use crate::autosave::Autosave;
use crate::config::FormConfig;
use crate::submit::QuoteSubmitter;

/// CTA label/location reported after a successful submission.
const CTA_SUBMIT_SUCCESS: &str = "form_submit_success";
const CTA_SUBMIT_ANOTHER: &str = "submit_another";
const LOCATION_CONTACT_FORM: &str = "contact_form";
const LOCATION_SUCCESS_MESSAGE: &str = "success_message";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What [`QuoteFormSession::mount`] did with a stored draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRestore {
    /// No usable draft.
    None,
    /// Recent draft loaded into the form.
    Restored(DraftInfo),
    /// Older draft left in storage; the visitor may restore it.
    Offered(DraftInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// Classified as spam. Nothing is shown to the sender.
    Rejected,
    Invalid {
        /// Field to focus.
        first_field: FormField,
        errors: BTreeMap<FormField, String>,
    },
    /// Delivery failed; form and draft are kept for a retry.
    Failed { message: String },
    /// A submission is already in flight, or the quote was already sent.
    Busy,
}

/// Clears the in-flight flag even if the submit future is dropped.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct QuoteFormSession {
    config: FormConfig,
    repo: Arc<DraftRepo>,
    clock: Arc<dyn Clock>,
    spam: SpamFilter,
    submitter: Arc<dyn QuoteSubmitter>,
    events: FormEvents,
    site: SiteEvents,
    autosave: Autosave,

    form: FormSnapshot,
    errors: BTreeMap<FormField, String>,
    submit_error: Option<String>,
    touched: BTreeSet<FormField>,
    started_at: Option<EpochMillis>,
    interacted: bool,
    submitted: bool,
    submitting: Arc<AtomicBool>,
    details_expanded: bool,
    draft_notice: Option<DraftInfo>,
}

impl QuoteFormSession {
    /// Build a session and start its auto-save task. Must be called inside a
    /// tokio runtime.
    pub fn new(
        config: FormConfig,
        repo: Arc<DraftRepo>,
        clock: Arc<dyn Clock>,
        submitter: Arc<dyn QuoteSubmitter>,
        bus: Arc<EventBus>,
        context: PageContext,
    ) -> Result<Self, CoreError> {
        let spam = SpamFilter::new(config.spam.clone())?;
        let events = FormEvents::new(bus.clone(), config.form_id.clone()).with_context(context.clone());
        let site = SiteEvents::new(bus, context);
        let autosave = Autosave::spawn(repo.clone(), config.form_id.clone(), config.autosave_interval);

        Ok(Self {
            config,
            repo,
            clock,
            spam,
            submitter,
            events,
            site,
            autosave,
            form: FormSnapshot::default(),
            errors: BTreeMap::new(),
            submit_error: None,
            touched: BTreeSet::new(),
            started_at: None,
            interacted: false,
            submitted: false,
            submitting: Arc::new(AtomicBool::new(false)),
            details_expanded: false,
            draft_notice: None,
        })
    }

    fn form_id(&self) -> &str {
        &self.config.form_id
    }

    /// Check for a stored draft. Recent drafts are loaded silently, older
    /// ones are only offered. Either way the draft notice is shown.
    pub fn mount(&mut self) -> DraftRestore {
        if !self.repo.has_draft(self.form_id()) {
            return DraftRestore::None;
        }

        let (Some(draft), Some(info)) = (
            self.repo.load_draft(self.form_id()),
            self.repo.get_draft_info(self.form_id()),
        ) else {
            return DraftRestore::None;
        };

        self.draft_notice = Some(info.clone());

        if info.age_in_hours < self.config.auto_restore_window_hours {
            tracing::debug!(form_id = self.form_id(), age_ms = info.age, "Draft restored automatically");
            self.form = draft;
            DraftRestore::Restored(info)
        } else {
            DraftRestore::Offered(info)
        }
    }

    /// Record an edit to one field.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        if self.started_at.is_none() {
            self.events.start();
            self.started_at = Some(self.clock.now_millis());
        }
        self.interacted = true;

        if self.touched.insert(field) {
            self.events.field_focus(field);
        }

        self.form.set(field, value);
        self.errors.remove(&field);
        self.draft_notice = None;
        self.schedule_autosave();
    }

    pub fn set_text_ok(&mut self, text_ok: bool) {
        self.form.text_ok = text_ok;
        self.interacted = true;
        self.schedule_autosave();
    }

    /// Validate one field on leaving it.
    pub fn blur(&mut self, field: FormField) -> ValidationResult {
        let result = validate_field(field, self.form.get(field), &self.form);
        match &result.error {
            Some(message) => {
                self.errors.insert(field, message.clone());
            }
            None => {
                self.errors.remove(&field);
            }
        }
        result
    }

    /// Open or close the optional details section.
    pub fn toggle_details(&mut self) -> bool {
        self.details_expanded = !self.details_expanded;
        if self.details_expanded {
            self.events.expand_details();
        }
        self.details_expanded
    }

    /// Load the stored draft into the form.
    pub fn restore_draft(&mut self) -> bool {
        let Some(draft) = self.repo.load_draft(self.form_id()) else {
            return false;
        };
        self.form = draft;
        self.draft_notice = None;
        self.interacted = true;
        self.schedule_autosave();
        true
    }

    /// Hide the notice and forget the stored draft.
    pub fn dismiss_draft(&mut self) {
        self.draft_notice = None;
        self.repo.clear_draft(self.form_id());
    }

    /// Start fresh: empty form, cleared flags and no stored draft.
    pub fn reset(&mut self) {
        self.form = FormSnapshot::default();
        self.errors.clear();
        self.submit_error = None;
        self.interacted = false;
        self.touched.clear();
        self.started_at = None;
        self.autosave.discard();
        self.repo.clear_draft(self.form_id());
    }

    /// After a successful submission, go back to an empty form.
    pub fn submit_another(&mut self) {
        self.reset();
        self.submitted = false;
        self.site.cta_click(CTA_SUBMIT_ANOTHER, LOCATION_SUCCESS_MESSAGE);
    }

    /// Time since the first edit, if there was one.
    fn fill_time(&self) -> Option<Duration> {
        self.started_at.map(|started| {
            let elapsed = (self.clock.now_millis() - started).max(0);
            Duration::from_millis(elapsed as u64)
        })
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.submitted {
            return SubmitOutcome::Busy;
        }
        let Some(_in_flight) = InFlight::acquire(&self.submitting) else {
            return SubmitOutcome::Busy;
        };

        self.submit_error = None;
        self.events.submit_attempt();

        let fill_time = self.fill_time();
        if let Some(signal) = self.spam.detect(&self.form, fill_time) {
            tracing::info!(form_id = self.form_id(), signal = signal.as_str(), "Spam submission detected and blocked");
            return SubmitOutcome::Rejected;
        }

        let validation = validate_form(&self.form);
        if let Some(first_field) = validation.first_invalid() {
            for (field, message) in &validation.errors {
                self.events.validation_error(*field, message);
            }
            self.errors = validation.errors.clone();
            return SubmitOutcome::Invalid {
                first_field,
                errors: validation.errors,
            };
        }

        let request = QuoteRequest::from_form(
            &self.form,
            fill_time,
            self.clock.now(),
            self.config.user_agent.clone(),
        );

        match self.submitter.submit(&request).await {
            Ok(()) => {
                self.events.submit_success(&request);
                self.autosave.discard();
                self.repo.clear_draft(self.form_id());
                self.submitted = true;
                self.site.cta_click(CTA_SUBMIT_SUCCESS, LOCATION_CONTACT_FORM);
                tracing::info!(form_id = self.form_id(), service_type = %request.service_type, "Quote submitted");
                SubmitOutcome::Submitted
            }
            Err(e) => {
                tracing::warn!(form_id = self.form_id(), error = %e, "Quote submission failed");
                self.events.submit_error(&e.to_string());
                let message = e.user_message().to_string();
                self.submit_error = Some(message.clone());
                SubmitOutcome::Failed { message }
            }
        }
    }

    /// Page is going away. Reports abandonment if the visitor started but
    /// never sent the form, then stops auto-save.
    pub fn unload(self) {
        if self.interacted && !self.submitted {
            self.events.abandon(&form_completion(&self.form));
        }
        self.autosave.cancel();
    }

    fn schedule_autosave(&self) {
        if self.interacted && !self.submitted {
            self.autosave.schedule(self.form.clone());
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn form(&self) -> &FormSnapshot {
        &self.form
    }

    pub fn errors(&self) -> &BTreeMap<FormField, String> {
        &self.errors
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn details_expanded(&self) -> bool {
        self.details_expanded
    }

    /// Draft notice to show, if any.
    pub fn draft_notice(&self) -> Option<&DraftInfo> {
        self.draft_notice.as_ref()
    }

    pub fn completion(&self) -> FormCompletion {
        form_completion(&self.form)
    }

    /// When auto-save last wrote the draft.
    pub fn last_saved(&self) -> Option<EpochMillis> {
        self.autosave.last_saved()
    }

    /// Page-level events (contact links on the success message, etc.).
    pub fn site_events(&self) -> &SiteEvents {
        &self.site
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use sparkle_core::clock::ManualClock;
    use sparkle_db::MemoryDraftStore;
    use sparkle_events::bus::drain;
    use sparkle_events::AnalyticsEvent;
    use tokio::sync::broadcast;

    use super::*;
    use crate::submit::{SubmitError, USER_MESSAGE_CONNECTIVITY, USER_MESSAGE_GENERIC};

    /// Records payloads and answers with a canned result.
    #[derive(Default)]
    struct StubSubmitter {
        sent: Mutex<Vec<QuoteRequest>>,
        fail_with: Option<u16>,
        network_down: bool,
    }

    #[async_trait]
    impl QuoteSubmitter for StubSubmitter {
        async fn submit(&self, request: &QuoteRequest) -> Result<(), SubmitError> {
            self.sent.lock().unwrap().push(request.clone());
            if self.network_down {
                return Err(SubmitError::Network("please try again".into()));
            }
            match self.fail_with {
                Some(status) => Err(SubmitError::HttpStatus(status)),
                None => Ok(()),
            }
        }
    }

    struct Harness {
        session: QuoteFormSession,
        repo: Arc<DraftRepo>,
        clock: Arc<ManualClock>,
        submitter: Arc<StubSubmitter>,
        rx: broadcast::Receiver<AnalyticsEvent>,
    }

    impl Harness {
        fn event_names(&mut self) -> Vec<String> {
            drain(&mut self.rx).into_iter().map(|e| e.event).collect()
        }
    }

    fn harness_with(submitter: StubSubmitter, store: Arc<MemoryDraftStore>) -> Harness {
        let clock = Arc::new(ManualClock::starting_now());
        let repo = Arc::new(DraftRepo::new(store, clock.clone()));
        let bus = Arc::new(EventBus::default());
        let rx = bus.subscribe();
        let submitter = Arc::new(submitter);
        let session = QuoteFormSession::new(
            FormConfig::default(),
            repo.clone(),
            clock.clone(),
            submitter.clone(),
            bus,
            PageContext::default(),
        )
        .unwrap();
        Harness {
            session,
            repo,
            clock,
            submitter,
            rx,
        }
    }

    fn harness() -> Harness {
        harness_with(StubSubmitter::default(), Arc::new(MemoryDraftStore::new()))
    }

    fn fill_valid(session: &mut QuoteFormSession) {
        session.update_field(FormField::Name, "Jane Doe");
        session.update_field(FormField::Mobile, "(865) 555-0123");
        session.update_field(FormField::Email, "jane@example.com");
        session.update_field(FormField::Address, "12 Oak St, Knoxville");
        session.update_field(FormField::ServiceType, "home");
        session.update_field(FormField::Rooms, "3 bed / 2 bath");
    }

    fn saved_form() -> FormSnapshot {
        FormSnapshot {
            name: "Saved Name".into(),
            email: "saved@example.com".into(),
            text_ok: true,
            ..Default::default()
        }
    }

    // -- mount ----------------------------------------------------------------

    #[tokio::test]
    async fn mount_without_draft_does_nothing() {
        let mut h = harness();
        assert_eq!(h.session.mount(), DraftRestore::None);
        assert!(h.session.draft_notice().is_none());
    }

    #[tokio::test]
    async fn mount_restores_recent_draft() {
        let mut h = harness();
        h.repo.save_draft("quote_form", &saved_form());
        h.clock.advance(ChronoDuration::minutes(30));

        assert_matches!(h.session.mount(), DraftRestore::Restored(_));
        assert_eq!(h.session.form(), &saved_form());
        assert!(h.session.draft_notice().is_some());
        assert!(!h.session.has_interacted());
    }

    #[tokio::test]
    async fn mount_offers_older_draft() {
        let mut h = harness();
        h.repo.save_draft("quote_form", &saved_form());
        h.clock.advance(ChronoDuration::hours(3));

        let info = match h.session.mount() {
            DraftRestore::Offered(info) => info,
            other => panic!("expected an offered draft, got {other:?}"),
        };
        assert_eq!(info.age_in_hours, 3);
        assert_eq!(h.session.form(), &FormSnapshot::default());

        assert!(h.session.restore_draft());
        assert_eq!(h.session.form(), &saved_form());
        assert!(h.session.has_interacted());
        assert!(h.session.draft_notice().is_none());
    }

    #[tokio::test]
    async fn dismiss_clears_stored_draft() {
        let mut h = harness();
        h.repo.save_draft("quote_form", &saved_form());
        h.clock.advance(ChronoDuration::hours(2));
        h.session.mount();

        h.session.dismiss_draft();
        assert!(h.session.draft_notice().is_none());
        assert!(!h.repo.has_draft("quote_form"));
    }

    #[tokio::test]
    async fn editing_hides_draft_notice() {
        let mut h = harness();
        h.repo.save_draft("quote_form", &saved_form());
        h.session.mount();
        assert!(h.session.draft_notice().is_some());

        h.session.update_field(FormField::Rooms, "2");
        assert!(h.session.draft_notice().is_none());
    }

    // -- editing --------------------------------------------------------------

    #[tokio::test]
    async fn first_edit_starts_form_and_focus_is_tracked_once() {
        let mut h = harness();
        h.session.update_field(FormField::Name, "J");
        h.session.update_field(FormField::Name, "Ja");
        h.session.update_field(FormField::Email, "j");

        assert!(h.session.has_interacted());
        assert_eq!(
            h.event_names(),
            vec!["form_start", "form_field_focus", "form_field_focus"]
        );
    }

    #[tokio::test]
    async fn blur_records_and_editing_clears_errors() {
        let mut h = harness();
        h.session.update_field(FormField::Email, "not-an-email");

        let result = h.session.blur(FormField::Email);
        assert!(!result.is_valid);
        assert!(h.session.error_for(FormField::Email).is_some());

        h.session.update_field(FormField::Email, "jane@example.com");
        assert!(h.session.error_for(FormField::Email).is_none());
        assert!(h.session.blur(FormField::Email).is_valid);
    }

    #[tokio::test]
    async fn toggle_details_tracks_only_opening() {
        let mut h = harness();
        assert!(h.session.toggle_details());
        assert!(!h.session.toggle_details());
        assert_eq!(h.event_names(), vec!["form_expand_details"]);
    }

    #[tokio::test(start_paused = true)]
    async fn edits_are_autosaved() {
        let mut h = harness();
        h.session.update_field(FormField::Name, "Jane");
        h.session.set_text_ok(true);

        tokio::time::sleep(std::time::Duration::from_millis(3100)).await;
        let draft = h.repo.load_draft("quote_form").unwrap();
        assert_eq!(draft.name, "Jane");
        assert!(draft.text_ok);
        assert!(h.session.last_saved().is_some());
    }

    #[tokio::test]
    async fn reset_starts_fresh() {
        let mut h = harness();
        h.session.update_field(FormField::Name, "Jane");
        h.repo.save_draft("quote_form", h.session.form());

        h.session.reset();
        assert_eq!(h.session.form(), &FormSnapshot::default());
        assert!(!h.session.has_interacted());
        assert!(!h.repo.has_draft("quote_form"));

        // form_start fires again on the next edit
        h.event_names();
        h.session.update_field(FormField::Name, "J");
        assert_eq!(h.event_names(), vec!["form_start", "form_field_focus"]);
    }

    // -- submit ---------------------------------------------------------------

    #[tokio::test]
    async fn valid_submission_succeeds_and_clears_draft() {
        let mut h = harness();
        fill_valid(&mut h.session);
        h.repo.save_draft("quote_form", h.session.form());
        h.clock.advance(ChronoDuration::seconds(42));
        h.event_names();

        assert_eq!(h.session.submit().await, SubmitOutcome::Submitted);
        assert!(h.session.is_submitted());
        assert!(!h.repo.has_draft("quote_form"));

        let sent = h.submitter.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].completion_time, Some(42));
        assert_eq!(sent[0].service_type, "home");

        assert_eq!(
            h.event_names(),
            vec!["form_submit_attempt", "form_submit_success", "cta_click"]
        );
    }

    #[tokio::test]
    async fn second_submit_after_success_is_busy() {
        let mut h = harness();
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(30));
        h.session.submit().await;

        assert_eq!(h.session.submit().await, SubmitOutcome::Busy);
        assert_eq!(h.submitter.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_reports_first_field() {
        let mut h = harness();
        h.session.update_field(FormField::Name, "Jane Doe");
        h.session.update_field(FormField::Email, "bad");
        h.clock.advance(ChronoDuration::seconds(30));
        h.event_names();

        let outcome = h.session.submit().await;
        let (first_field, errors) = match outcome {
            SubmitOutcome::Invalid { first_field, errors } => (first_field, errors),
            other => panic!("expected Invalid, got {other:?}"),
        };
        assert_eq!(first_field, FormField::Mobile);
        assert_eq!(errors.len(), 5);
        assert_eq!(h.session.errors().len(), 5);
        assert!(h.submitter.sent.lock().unwrap().is_empty());

        let names = h.event_names();
        assert_eq!(names[0], "form_submit_attempt");
        assert_eq!(
            names.iter().filter(|n| *n == "form_validation_error").count(),
            5
        );
    }

    #[tokio::test]
    async fn honeypot_is_rejected_silently() {
        let mut h = harness();
        fill_valid(&mut h.session);
        h.session.update_field(FormField::Website, "http://spam.test");
        h.clock.advance(ChronoDuration::seconds(30));
        h.event_names();

        assert_eq!(h.session.submit().await, SubmitOutcome::Rejected);
        assert!(h.session.errors().is_empty());
        assert!(h.session.submit_error().is_none());
        assert!(!h.session.is_submitted());
        assert!(h.submitter.sent.lock().unwrap().is_empty());
        assert_eq!(h.event_names(), vec!["form_submit_attempt"]);
    }

    #[tokio::test]
    async fn too_fast_submission_is_rejected() {
        let mut h = harness();
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(2));

        assert_eq!(h.session.submit().await, SubmitOutcome::Rejected);
    }

    #[tokio::test]
    async fn network_failure_keeps_form_and_draft() {
        let submitter = StubSubmitter {
            network_down: true,
            ..Default::default()
        };
        let mut h = harness_with(submitter, Arc::new(MemoryDraftStore::new()));
        fill_valid(&mut h.session);
        h.repo.save_draft("quote_form", h.session.form());
        h.clock.advance(ChronoDuration::seconds(30));
        h.event_names();

        let outcome = h.session.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: USER_MESSAGE_CONNECTIVITY.to_string()
            }
        );
        assert_eq!(h.session.submit_error(), Some(USER_MESSAGE_CONNECTIVITY));
        assert!(h.repo.has_draft("quote_form"));
        assert_eq!(h.session.form().name, "Jane Doe");
        assert!(!h.session.is_submitting());

        let events = drain(&mut h.rx);
        let error = events.iter().find(|e| e.event == "form_submit_error").unwrap();
        assert_eq!(error.custom["error_type"], "Network error - please try again");
    }

    #[tokio::test]
    async fn server_error_gets_generic_message() {
        let submitter = StubSubmitter {
            fail_with: Some(500),
            ..Default::default()
        };
        let mut h = harness_with(submitter, Arc::new(MemoryDraftStore::new()));
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(30));

        assert_matches!(
            h.session.submit().await,
            SubmitOutcome::Failed { message } if message == USER_MESSAGE_GENERIC
        );
    }

    #[tokio::test]
    async fn submit_another_resets_state() {
        let mut h = harness();
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(30));
        h.session.submit().await;
        h.event_names();

        h.session.submit_another();
        assert!(!h.session.is_submitted());
        assert_eq!(h.session.form(), &FormSnapshot::default());
        assert_eq!(h.event_names(), vec!["cta_click"]);
    }

    #[tokio::test]
    async fn works_without_storage() {
        let mut h = harness_with(
            StubSubmitter::default(),
            Arc::new(MemoryDraftStore::unavailable()),
        );
        assert_eq!(h.session.mount(), DraftRestore::None);
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(30));
        assert_eq!(h.session.submit().await, SubmitOutcome::Submitted);
    }

    // -- unload ---------------------------------------------------------------

    #[tokio::test]
    async fn unload_reports_abandonment() {
        let mut h = harness();
        h.session.update_field(FormField::Name, "Jane");
        h.session.update_field(FormField::Rooms, "2");
        h.event_names();

        let Harness { session, mut rx, .. } = h;
        session.unload();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "form_abandon");
        assert_eq!(events[0].custom["fields_completed"], 2);
    }

    #[tokio::test]
    async fn unload_is_quiet_without_interaction_or_after_submit() {
        let h = harness();
        let Harness { session, mut rx, .. } = h;
        session.unload();
        assert!(drain(&mut rx).is_empty());

        let mut h = harness();
        fill_valid(&mut h.session);
        h.clock.advance(ChronoDuration::seconds(30));
        h.session.submit().await;
        h.event_names();
        let Harness { session, mut rx, .. } = h;
        session.unload();
        assert!(drain(&mut rx).is_empty());
    }
}
