//! Stateful quote-form session.
//!
//! - [`QuoteFormSession`]: per-form controller: edits, draft restore,
//!   validation, spam screening, submission and abandonment reporting.
//! - [`Autosave`]: debounced background draft writer.
//! - [`QuoteSubmitter`]: delivery seam, with [`HttpSubmitter`] and
//!   [`SimulatedSubmitter`].
//! - [`SiteSession`]: page-level shell owning analytics and engagement.

pub mod autosave;
pub mod config;
pub mod session;
pub mod shell;
pub mod submit;

pub use autosave::Autosave;
pub use config::FormConfig;
pub use session::{DraftRestore, QuoteFormSession, SubmitOutcome};
pub use shell::SiteSession;
pub use submit::{HttpSubmitter, QuoteSubmitter, SimulatedSubmitter, SubmitError};
