//! The in-memory map and its append-only backing store.

use std::collections::HashMap;

use log::{debug, warn};

use super::{CacheKey, CacheRecord, CacheStore, CacheStoreError, CacheValue};

/// Counters describing a cache's life so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Rows accepted from the store at initialisation.
    pub loaded: usize,
    /// Rows skipped at initialisation for having the wrong field count.
    pub skipped: usize,
    /// Records added during this process.
    pub recorded: usize,
    /// Records kept in memory but not persisted.
    pub persist_failures: usize,
}

/// Durable key/value memoization over a [`CacheStore`].
///
/// Construct one per process and pass it by mutable reference to every call
/// site that memoizes through it.
///
/// A failed append is logged and counted but does not fail the call: the
/// value stays in memory for the rest of the run and is recomputed after a
/// restart.
///
/// # Examples
///
/// ```
/// use hexroute_core::{CacheKey, CacheValue, PersistentCache};
/// use hexroute_core::test_support::MemoryCacheStore;
///
/// let mut cache = PersistentCache::initialize(MemoryCacheStore::default())?;
/// let key = CacheKey::from_args(&["answer".into()]);
/// cache.record(key.clone(), CacheValue::Integer(42));
/// assert_eq!(cache.lookup(&key), Some(&CacheValue::Integer(42)));
/// # Ok::<(), hexroute_core::CacheStoreError>(())
/// ```
#[derive(Debug)]
pub struct PersistentCache<S> {
    store: S,
    entries: HashMap<CacheKey, CacheValue>,
    stats: CacheStats,
}

impl<S: CacheStore> PersistentCache<S> {
    /// Load every well-formed row from `store`.
    ///
    /// Rows without exactly two fields are skipped with a warning. Later rows
    /// win over earlier rows with the same key.
    ///
    /// # Errors
    ///
    /// Propagates [`CacheStoreError`] when the store cannot be read.
    pub fn initialize(mut store: S) -> Result<Self, CacheStoreError> {
        let rows = store.load()?;
        let mut entries = HashMap::with_capacity(rows.len());
        let mut stats = CacheStats::default();
        for row in rows {
            let [key, raw] = match <[String; 2]>::try_from(row) {
                Ok(fields) => fields,
                Err(row) => {
                    warn!(
                        "skipping invalid cache row in {} ({} fields): {row:?}",
                        store.location(),
                        row.len()
                    );
                    stats.skipped += 1;
                    continue;
                }
            };
            entries.insert(CacheKey::from_raw(key), CacheValue::parse(&raw));
            stats.loaded += 1;
        }
        debug!(
            "loaded {} cached entries from {}",
            entries.len(),
            store.location()
        );
        Ok(Self {
            store,
            entries,
            stats,
        })
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn lookup(&self, key: &CacheKey) -> Option<&CacheValue> {
        self.entries.get(key)
    }

    /// Insert `value` and append it to the store immediately.
    pub fn record(&mut self, key: CacheKey, value: CacheValue) {
        let record = CacheRecord { key, value };
        if let Err(err) = self.store.append(&record) {
            warn!("{err}; the entry will be recomputed on the next run");
            self.stats.persist_failures += 1;
        }
        self.stats.recorded += 1;
        self.entries.insert(record.key, record.value);
    }

    /// Return the cached value for `key`, computing and recording it when
    /// absent.
    ///
    /// # Errors
    ///
    /// Propagates the error from `compute`; nothing is recorded in that case.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: CacheKey, compute: F) -> Result<CacheValue, E>
    where
        F: FnOnce() -> Result<CacheValue, E>,
    {
        if let Some(value) = self.entries.get(&key) {
            return Ok(value.clone());
        }
        let value = compute()?;
        self.record(key, value.clone());
        Ok(value)
    }

    /// Number of entries held in memory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counters for this cache.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Release the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
