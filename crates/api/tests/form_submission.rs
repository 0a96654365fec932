//! End-to-end: a quote form session submitting to a live intake server.

mod common;

use std::sync::Arc;

use chrono::Duration;
use sparkle_core::clock::ManualClock;
use sparkle_core::form::FormField;
use sparkle_db::{DraftRepo, MemoryDraftStore};
use sparkle_events::{EventBus, PageContext};
use sparkle_form::{FormConfig, HttpSubmitter, SiteSession, SubmitOutcome};

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1/quotes")
}

#[tokio::test]
async fn form_session_delivers_quote_to_server() {
    let state = common::test_state();
    let endpoint = serve(common::build_test_app(state.clone())).await;

    let clock = Arc::new(ManualClock::starting_now());
    let repo = Arc::new(DraftRepo::new(Arc::new(MemoryDraftStore::new()), clock.clone()));
    let site = SiteSession::new(
        Arc::new(EventBus::default()),
        clock.clone(),
        repo.clone(),
        Arc::new(HttpSubmitter::new(endpoint).unwrap()),
        PageContext::default(),
    );
    site.open("Home");

    let mut form = site.quote_form(FormConfig::default()).unwrap();
    form.mount();
    form.update_field(FormField::Name, "Jane Doe");
    form.update_field(FormField::Mobile, "865-555-0123");
    form.update_field(FormField::Email, "jane@example.com");
    form.update_field(FormField::Address, "37919");
    form.update_field(FormField::ServiceType, "office");
    form.update_field(FormField::Rooms, "4 rooms");
    form.set_text_ok(true);
    repo.save_draft("quote_form", form.form());
    clock.advance(Duration::seconds(75));

    assert_eq!(form.submit().await, SubmitOutcome::Submitted);
    assert!(!repo.has_draft("quote_form"));

    let stored = state.inbox.list().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quote.service_type, "office");
    assert_eq!(stored[0].quote.completion_time, Some(75));
    assert!(stored[0].quote.text_ok);
}

#[tokio::test]
async fn server_rejection_surfaces_generic_message() {
    let state = common::test_state();
    let endpoint = serve(common::build_test_app(state.clone())).await;

    let clock = Arc::new(ManualClock::starting_now());
    let repo = Arc::new(DraftRepo::new(Arc::new(MemoryDraftStore::new()), clock.clone()));
    let site = SiteSession::new(
        Arc::new(EventBus::default()),
        clock.clone(),
        repo,
        Arc::new(HttpSubmitter::new(endpoint).unwrap()),
        PageContext::default(),
    );

    // The form has no length caps; the intake server does.
    let mut form = site.quote_form(FormConfig::default()).unwrap();
    form.update_field(FormField::Name, "Jane Doe");
    form.update_field(FormField::Mobile, "865-555-0123");
    form.update_field(FormField::Email, "jane@example.com");
    form.update_field(FormField::Address, "37919");
    form.update_field(FormField::ServiceType, "office");
    form.update_field(FormField::Rooms, "4 rooms");
    form.update_field(FormField::AddOns, "x".repeat(2000));
    clock.advance(Duration::seconds(30));

    match form.submit().await {
        SubmitOutcome::Failed { message } => {
            assert_eq!(message, sparkle_form::submit::USER_MESSAGE_GENERIC);
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(state.inbox.is_empty().await);
}
