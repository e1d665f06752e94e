//! Backing stores for [`crate::PersistentCache`].

use std::io;

use thiserror::Error;

use super::{CacheKey, CacheValue};

/// One raw row read back from a store, header excluded.
///
/// Well-formed rows have exactly two fields: the encoded key and the value's
/// text. Stores hand back rows as found; the cache decides what to keep.
pub type StoredRow = Vec<String>;

/// A key with its memoized value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    /// Canonical argument key.
    pub key: CacheKey,
    /// Memoized result.
    pub value: CacheValue,
}

/// Errors raised by [`CacheStore`] implementations.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    /// The store could not be opened or created.
    #[error("failed to open cache store at {location}: {source}")]
    Open {
        /// Human-readable store location.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Existing rows could not be read.
    #[error("failed to read cache store at {location}: {message}")]
    Read {
        /// Human-readable store location.
        location: String,
        /// Reader error description.
        message: String,
    },
    /// A new row could not be appended.
    #[error("failed to append to cache store at {location}: {message}")]
    Append {
        /// Human-readable store location.
        location: String,
        /// Writer error description.
        message: String,
    },
}

/// Append-only persistence for cache records.
///
/// Stores never rewrite or delete rows. [`CacheStore::append`] must make the
/// row durable before returning so that a process killed afterwards keeps it.
pub trait CacheStore {
    /// Read every row currently held, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheStoreError::Read`] when the store cannot be read at all.
    /// Individual unreadable rows should be skipped with a warning instead.
    fn load(&mut self) -> Result<Vec<StoredRow>, CacheStoreError>;

    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns [`CacheStoreError::Append`] when the row could not be written.
    fn append(&mut self, record: &CacheRecord) -> Result<(), CacheStoreError>;

    /// Human-readable location used in log messages.
    fn location(&self) -> String;
}
