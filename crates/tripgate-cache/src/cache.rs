use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use tripgate_core::NormalizedHost;

/// A cache of redirect targets keyed by host.
///
/// The cache is an accelerator only: a miss always falls through to a fresh
/// resolution.
pub trait TargetCache: Send + Sync + 'static {
    /// Returns the cached target for `host`, if any.
    fn get(&self, host: &NormalizedHost) -> Option<String>;

    /// Stores `target` for `host`, replacing any previous value.
    fn put(&self, host: NormalizedHost, target: String);

    /// Drops every entry in one step and returns how many were dropped.
    fn reset_all(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process [`TargetCache`] guarded by a single reader/writer lock.
///
/// Reads share the lock; `put` and `reset_all` hold it exclusively. The lock
/// covers the whole map rather than single keys since invalidation is global
/// and writes are rare (one per host per day). Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct FreshnessCache {
    entries: Arc<RwLock<HashMap<NormalizedHost, String>>>,
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TargetCache for FreshnessCache {
    fn get(&self, host: &NormalizedHost) -> Option<String> {
        let entries = self.entries.read();
        match entries.get(host) {
            Some(target) => {
                trace!(host = %host, "Cache hit");
                Some(target.clone())
            }
            None => {
                trace!(host = %host, "Cache miss");
                None
            }
        }
    }

    fn put(&self, host: NormalizedHost, target: String) {
        debug!(host = %host, target = %target, "Caching redirect target");
        self.entries.write().insert(host, target);
    }

    fn reset_all(&self) -> usize {
        let previous = std::mem::take(&mut *self.entries.write());
        previous.len()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
