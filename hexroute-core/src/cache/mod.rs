//! Durable memoization of expensive calls.
//!
//! A [`PersistentCache`] owns an in-memory map from [`CacheKey`] to
//! [`CacheValue`] and the [`CacheStore`] backing it. Entries are loaded once
//! when the cache is initialised and every new entry is appended to the store
//! the moment it is recorded, so an interrupted run loses nothing it already
//! computed.
//!
//! Keys come from [`CacheKey::from_args`] and friends, a canonical encoding
//! of a call's argument list. Values are stored as text and re-read through
//! [`CacheValue::parse`], which collapses integral numbers to integers.
//!
//! The cache is single-writer: two processes appending to one store can
//! interleave rows.

mod key;
mod memo;
mod persistent;
mod store;
mod value;

pub use key::CacheKey;
pub use memo::{CachedDuration, cached_duration};
pub use persistent::{CacheStats, PersistentCache};
pub use store::{CacheRecord, CacheStore, CacheStoreError, StoredRow};
pub use value::CacheValue;
