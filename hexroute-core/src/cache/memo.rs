//! Memoized duration queries.

use log::warn;

use crate::{Cell, DurationError, DurationProvider, RouteDuration, TravelMode};

use super::{CacheKey, CacheStore, CacheValue, PersistentCache};

/// Code reported for routes a previous query found unavailable.
const UNAVAILABLE_CODE: &str = "Cached";

/// A duration together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedDuration {
    /// The resolved duration.
    pub duration: RouteDuration,
    /// Whether the value was served from the cache.
    pub from_cache: bool,
}

/// Resolve a directional duration through `cache`, querying `provider` only on
/// a miss.
///
/// Every answer from the provider is recorded. An unavailable route is stored
/// as an empty value so later lookups, in this run or the next, do not ask
/// again. A cached value that is not a number reads back as unavailable.
///
/// # Errors
///
/// Propagates [`DurationError`] from the provider. Nothing is recorded in that
/// case.
pub fn cached_duration<P, S>(
    cache: &mut PersistentCache<S>,
    provider: &P,
    source: &Cell,
    destination: &Cell,
    mode: &TravelMode,
) -> Result<CachedDuration, DurationError>
where
    P: DurationProvider + ?Sized,
    S: CacheStore,
{
    let key = CacheKey::for_duration(source, destination, mode);
    if let Some(value) = cache.lookup(&key) {
        let duration = match value.as_f64() {
            Some(seconds) => RouteDuration::Seconds(seconds),
            None => {
                if !matches!(value, CacheValue::Text(text) if text.is_empty()) {
                    warn!("cached duration for {key} is not numeric: {value:?}");
                }
                RouteDuration::Unavailable {
                    code: UNAVAILABLE_CODE.to_owned(),
                    message: value.to_string(),
                }
            }
        };
        return Ok(CachedDuration {
            duration,
            from_cache: true,
        });
    }

    let duration = provider.duration(source, destination, mode)?;
    let value = match &duration {
        RouteDuration::Seconds(seconds) => CacheValue::Float(*seconds),
        RouteDuration::Unavailable { .. } => CacheValue::Text(String::new()),
    };
    cache.record(key, value);
    Ok(CachedDuration {
        duration,
        from_cache: false,
    })
}
