use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::listing::FileDescriptor;

/// Process-lifetime listing cache keyed by the public link as submitted.
///
/// Entries never expire. Lookups are exact string matches, so links that
/// differ only by a trailing slash are distinct keys.
#[derive(Debug, Default)]
pub struct ListingCache {
    entries: Mutex<HashMap<String, Arc<[FileDescriptor]>>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<[FileDescriptor]>> {
        self.lock().get(key).cloned()
    }

    /// Store a listing. A concurrent `put` for the same key wins if it
    /// lands later.
    pub fn put(&self, key: impl Into<String>, items: Arc<[FileDescriptor]>) {
        self.lock().insert(key.into(), items);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[FileDescriptor]>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
