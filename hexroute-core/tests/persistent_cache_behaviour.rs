//! Behavioural tests for `PersistentCache` and memoized duration queries.

use std::cell::RefCell;

use hexroute_core::test_support::{CountingDurationProvider, MemoryCacheStore};
use hexroute_core::{
    CacheKey, CacheValue, Cell, PersistentCache, StoredRow, TravelMode, cached_duration,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// World state for cache scenarios.
#[derive(Debug, Default)]
struct CacheWorld {
    seed_rows: RefCell<Vec<StoredRow>>,
    cache: RefCell<Option<PersistentCache<MemoryCacheStore>>>,
    provider: RefCell<Option<CountingDurationProvider>>,
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld::default()
}

fn key(name: &str) -> CacheKey {
    CacheKey::from_args(&[name.trim_matches('"').into()])
}

fn with_cache<T>(world: &CacheWorld, f: impl FnOnce(&mut PersistentCache<MemoryCacheStore>) -> T) -> T {
    let mut cache = world.cache.borrow_mut();
    f(cache.as_mut().expect("cache should be loaded"))
}

#[given("an empty cache")]
fn given_empty(world: &CacheWorld) {
    let cache =
        PersistentCache::initialize(MemoryCacheStore::default()).expect("memory store should load");
    world.cache.replace(Some(cache));
}

#[given("a store holding a three-column row and a valid row")]
fn given_malformed(world: &CacheWorld) {
    world.seed_rows.replace(vec![
        vec!["k1".to_owned(), "v1".to_owned(), "extra".to_owned()],
        vec!["k2".to_owned(), "12.5".to_owned()],
    ]);
}

#[when("I load the cache")]
fn when_load(world: &CacheWorld) {
    let store = MemoryCacheStore::with_rows(world.seed_rows.take());
    let cache = PersistentCache::initialize(store).expect("memory store should load");
    world.cache.replace(Some(cache));
}

#[when("I record {value} under {name}")]
fn when_record(world: &CacheWorld, value: String, name: String) {
    with_cache(world, |cache| cache.record(key(&name), CacheValue::parse(&value)));
}

#[when("I reload the cache from its store")]
fn when_reload(world: &CacheWorld) {
    let previous = world.cache.take().expect("cache should be loaded");
    let rows = previous.into_store().rows().to_vec();
    let cache = PersistentCache::initialize(MemoryCacheStore::with_rows(rows))
        .expect("memory store should reload");
    world.cache.replace(Some(cache));
}

#[when("I request the duration from {source} to {destination} twice")]
fn when_request_twice(world: &CacheWorld, source: String, destination: String) {
    let provider = CountingDurationProvider::uniform(75.0);
    let from = Cell::from(source.trim_matches('"'));
    let to = Cell::from(destination.trim_matches('"'));
    with_cache(world, |cache| {
        for _ in 0..2 {
            cached_duration(cache, &provider, &from, &to, &TravelMode::driving())
                .expect("duration should resolve");
        }
    });
    world.provider.replace(Some(provider));
}

#[then("{name} holds the integer {expected}")]
fn then_integer(world: &CacheWorld, name: String, expected: i64) {
    let value = with_cache(world, |cache| cache.lookup(&key(&name)).cloned());
    assert_eq!(value, Some(CacheValue::Integer(expected)));
}

#[then("{name} holds the float {expected}")]
fn then_float(world: &CacheWorld, name: String, expected: f64) {
    let value = with_cache(world, |cache| cache.lookup(&key(&name)).cloned());
    assert_eq!(value, Some(CacheValue::Float(expected)));
}

#[then("the cache holds {count} entry")]
fn then_len(world: &CacheWorld, count: usize) {
    assert_eq!(with_cache(world, |cache| cache.len()), count);
}

#[then("{count} row was skipped")]
fn then_skipped(world: &CacheWorld, count: usize) {
    assert_eq!(with_cache(world, |cache| cache.stats().skipped), count);
}

#[then("the provider was queried once")]
fn then_once(world: &CacheWorld) {
    let provider = world.provider.borrow();
    assert_eq!(provider.as_ref().map(CountingDurationProvider::calls), Some(1));
}

#[scenario(path = "tests/features/persistent_cache.feature", index = 0)]
fn round_trip(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/persistent_cache.feature", index = 1)]
fn malformed_rows(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/persistent_cache.feature", index = 2)]
fn idempotent_calls(world: CacheWorld) {
    let _ = world;
}
