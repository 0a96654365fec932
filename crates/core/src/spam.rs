//! Spam heuristics for quote submissions.
//!
//! A honeypot check plus a handful of cheap content heuristics. The numbers
//! in [`SpamConfig::default`] are tuned by eye and can misfire on unusually
//! fast or terse but legitimate submissions, so they are configuration, not
//! literals.

use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::form::{FormField, FormSnapshot};
use crate::threshold_validation::{validate_positive, validate_unit_range};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Submissions completed faster than this are treated as automated.
pub const DEFAULT_MIN_FILL_TIME: Duration = Duration::from_secs(5);

/// Unique-characters / length below this marks a stuffed value.
pub const DEFAULT_MIN_UNIQUE_RATIO: f64 = 0.4;

/// The repetition check only applies to values longer than this.
pub const DEFAULT_REPETITION_MIN_LEN: usize = 4;

pub const DEFAULT_MAX_UPPERCASE_RUN: usize = 10;
pub const DEFAULT_MAX_DIGIT_RUN: usize = 10;

pub const DEFAULT_BLOCKED_KEYWORDS: &[&str] = &["viagra", "casino", "poker", "loan", "credit"];

/// Fields checked for repeated characters.
const REPETITION_FIELDS: &[FormField] = &[FormField::Name, FormField::Email];

/// Fields scanned for URLs, keywords and long runs.
const CONTENT_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::Email,
    FormField::AddOns,
    FormField::ParkingNotes,
];

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tunable thresholds for [`SpamFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamConfig {
    pub min_fill_time: Duration,
    pub min_unique_ratio: f64,
    pub repetition_min_len: usize,
    pub max_uppercase_run: usize,
    pub max_digit_run: usize,
    pub blocked_keywords: Vec<String>,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            min_fill_time: DEFAULT_MIN_FILL_TIME,
            min_unique_ratio: DEFAULT_MIN_UNIQUE_RATIO,
            repetition_min_len: DEFAULT_REPETITION_MIN_LEN,
            max_uppercase_run: DEFAULT_MAX_UPPERCASE_RUN,
            max_digit_run: DEFAULT_MAX_DIGIT_RUN,
            blocked_keywords: DEFAULT_BLOCKED_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl SpamConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_unit_range(self.min_unique_ratio, "min_unique_ratio")?;
        validate_positive(self.max_uppercase_run, "max_uppercase_run")?;
        validate_positive(self.max_digit_run, "max_digit_run")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Why a submission was classified as spam. Only ever logged, never shown
/// to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum SpamSignal {
    Honeypot,
    TooFast { elapsed_ms: u64 },
    RepeatedCharacters { field: FormField },
    Url { field: FormField },
    BlockedKeyword { field: FormField },
    ShoutingRun { field: FormField },
    DigitRun { field: FormField },
}

impl SpamSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Honeypot => "honeypot",
            Self::TooFast { .. } => "too_fast",
            Self::RepeatedCharacters { .. } => "repeated_characters",
            Self::Url { .. } => "url",
            Self::BlockedKeyword { .. } => "blocked_keyword",
            Self::ShoutingRun { .. } => "shouting_run",
            Self::DigitRun { .. } => "digit_run",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Compiled spam heuristics.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    config: SpamConfig,
    url: Regex,
    keywords: Option<Regex>,
    uppercase_run: Regex,
    digit_run: Regex,
}

impl SpamFilter {
    pub fn new(config: SpamConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let url = Regex::new(r"(?i)https?://").map_err(compile_error)?;

        let keywords = if config.blocked_keywords.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = config
                .blocked_keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect();
            let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(compile_error)?)
        };

        let uppercase_run =
            Regex::new(&format!("[A-Z]{{{},}}", config.max_uppercase_run)).map_err(compile_error)?;
        let digit_run =
            Regex::new(&format!("[0-9]{{{},}}", config.max_digit_run)).map_err(compile_error)?;

        Ok(Self {
            config,
            url,
            keywords,
            uppercase_run,
            digit_run,
        })
    }

    pub fn config(&self) -> &SpamConfig {
        &self.config
    }

    /// First heuristic that fires, checked in a fixed order: honeypot,
    /// fill time, repetition, then content patterns.
    ///
    /// `fill_time` is the time from first interaction to the submit attempt;
    /// `None` (never interacted) skips the speed check.
    pub fn detect(&self, form: &FormSnapshot, fill_time: Option<Duration>) -> Option<SpamSignal> {
        if form.honeypot_filled() {
            return Some(SpamSignal::Honeypot);
        }

        if let Some(elapsed) = fill_time {
            if elapsed < self.config.min_fill_time {
                return Some(SpamSignal::TooFast {
                    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }

        for &field in REPETITION_FIELDS {
            if self.is_repetitive(form.get(field)) {
                return Some(SpamSignal::RepeatedCharacters { field });
            }
        }

        for &field in CONTENT_FIELDS {
            let value = form.get(field);
            if value.is_empty() {
                continue;
            }
            if self.url.is_match(value) {
                return Some(SpamSignal::Url { field });
            }
            if self.keywords.as_ref().is_some_and(|re| re.is_match(value)) {
                return Some(SpamSignal::BlockedKeyword { field });
            }
            if self.uppercase_run.is_match(value) {
                return Some(SpamSignal::ShoutingRun { field });
            }
            if self.digit_run.is_match(value) {
                return Some(SpamSignal::DigitRun { field });
            }
        }

        None
    }

    pub fn is_spam_submission(&self, form: &FormSnapshot, fill_time: Option<Duration>) -> bool {
        self.detect(form, fill_time).is_some()
    }

    /// Lower-cased, whitespace-free value longer than the minimum length
    /// whose unique-character ratio falls below the threshold.
    fn is_repetitive(&self, value: &str) -> bool {
        let chars: Vec<char> = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if chars.len() <= self.config.repetition_min_len {
            return false;
        }
        let mut unique = chars.clone();
        unique.sort_unstable();
        unique.dedup();
        (unique.len() as f64) / (chars.len() as f64) < self.config.min_unique_ratio
    }
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::new(SpamConfig::default()).expect("default spam config is valid")
    }
}

fn compile_error(err: regex::Error) -> CoreError {
    CoreError::SpamConfig(err.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
