use super::FunctionalKey;
use connector::Record;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Records already resolved by key, consulted before querying the backend.
pub trait ResolutionCache: Send + Sync {
    fn get(&self, key: &FunctionalKey) -> Option<Record>;

    /// Stores `record` under `key`. An existing entry is kept.
    fn push(&self, key: FunctionalKey, record: Record);
}

/// Always misses and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResolutionCache for NoopCache {
    fn get(&self, _: &FunctionalKey) -> Option<Record> {
        None
    }

    fn push(&self, _: FunctionalKey, _: Record) {}
}

/// An unbounded cache that can be shared between concurrent resolutions.
#[derive(Debug, Default)]
pub struct SharedCache {
    records: RwLock<HashMap<FunctionalKey, Record>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ResolutionCache for SharedCache {
    fn get(&self, key: &FunctionalKey) -> Option<Record> {
        self.records.read().get(key).cloned()
    }

    fn push(&self, key: FunctionalKey, record: Record) {
        self.records.write().entry(key).or_insert(record);
    }
}
