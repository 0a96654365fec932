//! Debounced draft auto-save.
//!
//! The session pushes every new snapshot into a `watch` channel. A single
//! background task waits for the channel to go quiet for the configured
//! interval and then writes the latest snapshot through [`DraftRepo`]. Each
//! change re-arms the timer, so at most one write is ever pending.
//!
//! Dropping the [`Autosave`] cancels the task; nothing is written after
//! that.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sparkle_core::form::FormSnapshot;
use sparkle_core::types::EpochMillis;
use sparkle_db::DraftRepo;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type LastSaved = Arc<Mutex<Option<EpochMillis>>>;

pub struct Autosave {
    tx: watch::Sender<Option<FormSnapshot>>,
    cancel: CancellationToken,
    last_saved: LastSaved,
    handle: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Spawn the auto-save task for `form_id`. Must be called inside a tokio
    /// runtime.
    pub fn spawn(repo: Arc<DraftRepo>, form_id: impl Into<String>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let last_saved = LastSaved::default();

        let handle = tokio::spawn(run(
            repo,
            form_id.into(),
            interval,
            rx,
            cancel.clone(),
            last_saved.clone(),
        ));

        Self {
            tx,
            cancel,
            last_saved,
            handle: Some(handle),
        }
    }

    /// Queue `snapshot` for saving once edits go quiet.
    pub fn schedule(&self, snapshot: FormSnapshot) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.tx.send_replace(Some(snapshot));
    }

    /// Drop any pending write without stopping the task.
    pub fn discard(&self) {
        self.tx.send_replace(None);
    }

    /// Stop the task; pending writes are lost.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// When the last successful write happened.
    pub fn last_saved(&self) -> Option<EpochMillis> {
        *self.last_saved.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Auto-save task ended abnormally");
            }
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    repo: Arc<DraftRepo>,
    form_id: String,
    interval: Duration,
    mut rx: watch::Receiver<Option<FormSnapshot>>,
    cancel: CancellationToken,
    last_saved: LastSaved,
) {
    tracing::debug!(form_id, interval_ms = interval.as_millis() as u64, "Auto-save started");

    'outer: loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Debounce: every further change restarts the quiet period.
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'outer,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break 'outer;
                    }
                }
                _ = tokio::time::sleep(interval) => break,
            }
        }

        let Some(snapshot) = rx.borrow_and_update().clone() else {
            continue;
        };

        if repo.save_draft(&form_id, &snapshot) {
            let saved_at = repo.get_draft_info(&form_id).map(|info| info.timestamp);
            *last_saved.lock().unwrap_or_else(|e| e.into_inner()) = saved_at;
            tracing::debug!(form_id, "Draft auto-saved");
        }
    }

    tracing::debug!(form_id, "Auto-save stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkle_core::clock::ManualClock;
    use sparkle_db::MemoryDraftStore;

    const FORM_ID: &str = "quote_form";
    const INTERVAL: Duration = Duration::from_millis(3000);

    fn repo() -> Arc<DraftRepo> {
        Arc::new(DraftRepo::new(
            Arc::new(MemoryDraftStore::new()),
            Arc::new(ManualClock::starting_now()),
        ))
    }

    fn snapshot(name: &str) -> FormSnapshot {
        FormSnapshot {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn writes_latest_snapshot_after_quiet_period() {
        let repo = repo();
        let autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        autosave.schedule(snapshot("J"));
        tokio::time::sleep(Duration::from_millis(2000)).await;
        autosave.schedule(snapshot("Jane"));

        // 2.9 s after the second edit: timer was re-armed, nothing yet.
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(!repo.has_draft(FORM_ID));
        assert!(autosave.last_saved().is_none());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(repo.load_draft(FORM_ID).unwrap().name, "Jane");
        assert!(autosave.last_saved().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_written_without_a_change() {
        let repo = repo();
        let _autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!repo.has_draft(FORM_ID));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_pending_write() {
        let repo = repo();
        let autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        autosave.schedule(snapshot("Jane"));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        autosave.cancel();
        autosave.schedule(snapshot("ignored"));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!repo.has_draft(FORM_ID));
        assert!(autosave.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_task() {
        let repo = repo();
        let autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        autosave.schedule(snapshot("Jane"));
        drop(autosave);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!repo.has_draft(FORM_ID));
    }

    #[tokio::test(start_paused = true)]
    async fn discard_drops_the_pending_snapshot() {
        let repo = repo();
        let autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        autosave.schedule(snapshot("Jane"));
        tokio::time::sleep(Duration::from_millis(500)).await;
        autosave.discard();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!repo.has_draft(FORM_ID));

        autosave.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn saves_again_after_later_edits() {
        let repo = repo();
        let autosave = Autosave::spawn(repo.clone(), FORM_ID, INTERVAL);

        autosave.schedule(snapshot("Jane"));
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(repo.load_draft(FORM_ID).unwrap().name, "Jane");

        autosave.schedule(snapshot("Jane Doe"));
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(repo.load_draft(FORM_ID).unwrap().name, "Jane Doe");
    }
}
