//! Draft record model and derived age info.

use serde::{Deserialize, Serialize};
use sparkle_core::form::FormSnapshot;
use sparkle_core::types::EpochMillis;

/// Schema tag written with every draft.
pub const DRAFT_VERSION: &str = "1.0";

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// What is stored under a draft key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub data: FormSnapshot,
    /// Last save, in milliseconds since the Unix epoch.
    pub timestamp: EpochMillis,
    pub version: String,
}

impl DraftRecord {
    pub fn new(data: FormSnapshot, timestamp: EpochMillis) -> Self {
        Self {
            data,
            timestamp,
            version: DRAFT_VERSION.to_string(),
        }
    }

    /// Milliseconds since the draft was saved. Negative if the clock went
    /// backwards; saturates on out-of-range stored timestamps, which then
    /// read as expired.
    pub fn age_ms(&self, now: EpochMillis) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    pub fn is_expired(&self, now: EpochMillis, expiry_ms: i64) -> bool {
        self.age_ms(now) > expiry_ms
    }

    pub fn info(&self, now: EpochMillis) -> DraftInfo {
        let age = self.age_ms(now);
        DraftInfo {
            timestamp: self.timestamp,
            age,
            age_in_hours: age.div_euclid(MS_PER_HOUR),
            age_in_days: age.div_euclid(MS_PER_DAY),
            version: self.version.clone(),
        }
    }
}

/// Age metrics for "restore your draft from N hours ago" messaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInfo {
    pub timestamp: EpochMillis,
    /// Milliseconds.
    pub age: i64,
    pub age_in_hours: i64,
    pub age_in_days: i64,
    pub version: String,
}

impl DraftInfo {
    /// Human phrase for the restore prompt.
    pub fn describe_age(&self) -> String {
        match (self.age_in_days, self.age_in_hours) {
            (0, 0) => "less than an hour ago".to_string(),
            (0, 1) => "1 hour ago".to_string(),
            (0, h) => format!("{h} hours ago"),
            (1, _) => "1 day ago".to_string(),
            (d, _) => format!("{d} days ago"),
        }
    }
}
