//! Form session settings.

use std::time::Duration;

use sparkle_core::spam::SpamConfig;
use sparkle_events::form_events::DEFAULT_FORM_TYPE;

/// Quiet period after the last edit before the draft is written.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_millis(3000);

/// Drafts younger than this are restored without asking.
pub const AUTO_RESTORE_WINDOW_HOURS: i64 = 1;

#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Draft key suffix and analytics label.
    pub form_id: String,
    pub autosave_interval: Duration,
    pub auto_restore_window_hours: i64,
    pub spam: SpamConfig,
    /// Reported in the submission payload.
    pub user_agent: Option<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: DEFAULT_FORM_TYPE.to_string(),
            autosave_interval: AUTOSAVE_INTERVAL,
            auto_restore_window_hours: AUTO_RESTORE_WINDOW_HOURS,
            spam: SpamConfig::default(),
            user_agent: None,
        }
    }
}
