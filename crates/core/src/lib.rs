//! Domain logic for the Sparkle Scrub quote-request form.
//!
//! Everything here is pure: field validation, spam heuristics, completion
//! figures and the submission payload. Storage lives in `sparkle-db`,
//! analytics in `sparkle-events`, and the stateful form session in
//! `sparkle-form`.

pub mod clock;
pub mod completion;
pub mod error;
pub mod form;
pub mod spam;
pub mod submission;
pub mod threshold_validation;
pub mod types;
pub mod validation;
