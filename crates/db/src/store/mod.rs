//! Key-value backends for draft storage.
//!
//! [`DraftStore`] is the minimal browser-storage shape (`get`/`set`/
//! `remove`/`keys`) the draft repository needs. Any backend can fail at any
//! call; the repository turns those failures into "no draft".

pub mod file;
pub mod memory;

pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;

/// Error type for key-value backend failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend refuses access altogether (private browsing, quota 0,
    /// read-only mount).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data could not be encoded or decoded.
    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// String-keyed, string-valued storage.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
