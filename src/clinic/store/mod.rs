//! # Storage Layer
//!
//! The durable key-value store the overlay is persisted in. The
//! [`KeyValueStore`] trait is the only thing the overlay logic knows about
//! persistence, so it can be swapped without touching merge semantics.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: Production file-based storage
//!   - One JSON file per key: `<root>/<key>.json`
//!   - Writes are atomic (tmp file, then rename)
//!
//! - [`memory::MemBackend`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate read and write failures
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! ~/.local/share/clinic/
//! ├── appointments.local.json       # {"items": [...], "deletedIds": [...]}
//! ├── billing.invoices.local.json
//! ├── patients.local.json
//! └── config.json
//! ```
//!
//! The store is process-wide and keyed by namespace. There is no locking:
//! two processes writing the same key concurrently means the last writer wins.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for raw string-keyed storage.
///
/// All methods take `&self`; the overlay store does a fresh read and a fresh
/// write per call and never holds state between calls.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
