//! Expiring, namespaced form drafts over a [`DraftStore`].
//!
//! One draft per form id, stored as a JSON [`DraftRecord`] under
//! `<prefix><form_id>`. Reads treat expired or unparseable records as absent
//! and delete them. No method returns an error: storage trouble is logged
//! and reported as "no draft" / `false` / `0`, so the form keeps working
//! without persistence.

use std::sync::Arc;

use chrono::Duration;
use sparkle_core::clock::Clock;
use sparkle_core::form::FormSnapshot;

use crate::models::draft::{DraftInfo, DraftRecord};
use crate::store::{DraftStore, StoreError};

/// Namespace shared by every form draft key.
pub const STORAGE_KEY_PREFIX: &str = "southern_scrubbin_form_";

/// Drafts older than this are discarded.
pub const DRAFT_EXPIRY_DAYS: i64 = 7;

/// Key used to probe whether the backend accepts writes.
const PROBE_KEY: &str = "__test__";

/// Outcome of reading one key, before the caller decides what to expose.
enum Lookup {
    Missing,
    Live(DraftRecord),
    Stale,
}

/// Draft persistence for quote forms.
pub struct DraftRepo {
    store: Arc<dyn DraftStore>,
    clock: Arc<dyn Clock>,
    prefix: String,
    expiry: Duration,
}

impl DraftRepo {
    pub fn new(store: Arc<dyn DraftStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            prefix: STORAGE_KEY_PREFIX.to_string(),
            expiry: Duration::days(DRAFT_EXPIRY_DAYS),
        }
    }

    /// Override the key namespace.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Override the expiry window.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn storage_key(&self, form_id: &str) -> String {
        format!("{}{form_id}", self.prefix)
    }

    /// Whether the backend accepts a write and a remove right now.
    pub fn is_available(&self) -> bool {
        let probe = self
            .store
            .set(PROBE_KEY, "test")
            .and_then(|()| self.store.remove(PROBE_KEY));
        match probe {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Draft storage unavailable");
                false
            }
        }
    }

    /// Save `snapshot` as the draft for `form_id`, stamped with the current
    /// time. Returns whether the write succeeded.
    pub fn save_draft(&self, form_id: &str, snapshot: &FormSnapshot) -> bool {
        if !self.is_available() {
            return false;
        }

        let record = DraftRecord::new(snapshot.clone(), self.clock.now_millis());
        let result = serde_json::to_string(&record)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(&self.storage_key(form_id), &raw));

        match result {
            Ok(()) => {
                tracing::debug!(form_id, "Form draft saved");
                true
            }
            Err(e) => {
                tracing::warn!(form_id, error = %e, "Failed to save form draft");
                false
            }
        }
    }

    /// The unexpired draft for `form_id`, if any.
    pub fn load_draft(&self, form_id: &str) -> Option<FormSnapshot> {
        match self.lookup(form_id, "load")? {
            Lookup::Live(record) => Some(record.data),
            Lookup::Missing | Lookup::Stale => None,
        }
    }

    /// Whether an unexpired draft exists for `form_id`.
    pub fn has_draft(&self, form_id: &str) -> bool {
        matches!(self.lookup(form_id, "check"), Some(Lookup::Live(_)))
    }

    /// Delete the draft for `form_id`. Deleting a missing draft succeeds.
    pub fn clear_draft(&self, form_id: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match self.store.remove(&self.storage_key(form_id)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(form_id, error = %e, "Failed to clear form draft");
                false
            }
        }
    }

    /// Timestamp and age of the unexpired draft for `form_id`.
    pub fn get_draft_info(&self, form_id: &str) -> Option<DraftInfo> {
        let now = self.clock.now_millis();
        match self.lookup(form_id, "inspect")? {
            Lookup::Live(record) => Some(record.info(now)),
            Lookup::Missing | Lookup::Stale => None,
        }
    }

    /// Remove every expired or corrupt draft under the prefix. Returns how
    /// many entries were removed. Keys outside the prefix are left alone.
    pub fn cleanup_expired_drafts(&self) -> usize {
        if !self.is_available() {
            return 0;
        }

        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list drafts for cleanup");
                return 0;
            }
        };

        let now = self.clock.now_millis();
        let mut cleaned = 0;

        for key in keys.iter().filter(|k| k.starts_with(&self.prefix)) {
            let stale = match self.store.get(key) {
                Ok(Some(raw)) => match serde_json::from_str::<DraftRecord>(&raw) {
                    Ok(record) => record.is_expired(now, self.expiry_ms()),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to read draft during cleanup");
                    false
                }
            };

            if stale {
                match self.store.remove(key) {
                    Ok(()) => cleaned += 1,
                    Err(e) => tracing::warn!(key = %key, error = %e, "Failed to remove stale draft"),
                }
            }
        }

        if cleaned > 0 {
            tracing::info!(cleaned, "Cleaned up expired form drafts");
        }
        cleaned
    }

    fn expiry_ms(&self) -> i64 {
        self.expiry.num_milliseconds()
    }

    /// Read and classify the record for `form_id`, purging stale entries.
    ///
    /// `None` means the backend could not be used at all.
    fn lookup(&self, form_id: &str, action: &'static str) -> Option<Lookup> {
        if !self.is_available() {
            return None;
        }

        let key = self.storage_key(form_id);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(Lookup::Missing),
            Err(e) => {
                tracing::warn!(form_id, action, error = %e, "Failed to read form draft");
                return None;
            }
        };

        let record = match serde_json::from_str::<DraftRecord>(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(form_id, action, error = %e, "Discarding corrupt form draft");
                self.purge(&key);
                return Some(Lookup::Stale);
            }
        };

        if record.is_expired(self.clock.now_millis(), self.expiry_ms()) {
            tracing::debug!(form_id, "Discarding expired form draft");
            self.purge(&key);
            return Some(Lookup::Stale);
        }

        Some(Lookup::Live(record))
    }

    fn purge(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "Failed to remove stale draft");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
