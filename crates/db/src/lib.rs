//! Draft persistence for the quote form.
//!
//! - [`store`]: the [`DraftStore`](store::DraftStore) key-value trait with
//!   in-memory and JSON-file backends.
//! - [`models`]: the stored [`DraftRecord`](models::draft::DraftRecord) and
//!   its derived age info.
//! - [`repositories`]: [`DraftRepo`], expiry-aware save/load/cleanup.

pub mod models;
pub mod repositories;
pub mod store;

pub use repositories::DraftRepo;
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore, StoreError};
