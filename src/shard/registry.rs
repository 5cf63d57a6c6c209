use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flurry::HashMap;
use log::debug;

use crate::index::Index;
use crate::shard::Core;
use crate::JoinError;

/// Explicit registry of named cores for cross-shard joins.
///
/// Deliberately a plain value handed to whoever needs cross-shard lookup;
/// there is no process-wide registry. The clock is a registry-scoped
/// monotonic counter, so open-time stamps are deterministic and immune to
/// wall-clock skew.
pub struct CoreRegistry {
    cores: HashMap<String, Arc<Core>>,
    clock: AtomicU64,
}

impl Default for CoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreRegistry {
    pub fn new() -> Self {
        Self { cores: HashMap::new(), clock: AtomicU64::new(1) }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    pub fn register(&self, name: &str, index: Index) -> Arc<Core> {
        let core = Arc::new(Core::new(name.to_string(), index, self.tick()));
        debug!("registered core {} at open time {}", name, core.open_time());
        self.cores.pin().insert(name.to_string(), core.clone());
        core
    }

    pub fn get(&self, name: &str) -> Option<Arc<Core>> {
        self.cores.pin().get(name).cloned()
    }

    /// Replaces the core's index and searcher, bumping its open time.
    pub fn reopen(&self, name: &str, index: Index) -> crate::Result<()> {
        let open_time = self.tick();
        let guard = self.cores.pin();
        let core = guard
            .get(name)
            .ok_or_else(|| JoinError::BadRequest(format!("no such core {name}")))?;
        core.reopen(index, open_time);
        Ok(())
    }
}
