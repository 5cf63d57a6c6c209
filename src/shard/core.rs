use std::fmt;

use parking_lot::RwLock;

use crate::index::Index;
use crate::reader::Searcher;

/// A named shard: one index plus its currently registered searcher.
///
/// Reopening swaps the searcher and bumps the open-time stamp, which feeds
/// join-query identity so cached enclosing queries invalidate when the shard
/// reopens.
pub struct Core {
    name: String,
    slot: RwLock<CoreSlot>,
}

struct CoreSlot {
    index: Index,
    searcher: Searcher,
    open_time: u64,
}

impl Core {
    pub(crate) fn new(name: String, index: Index, open_time: u64) -> Self {
        let searcher = index.searcher();
        Self { name, slot: RwLock::new(CoreSlot { index, searcher, open_time }) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registered searcher. Callers hold the returned clone for the
    /// duration of one join invocation and drop it on every exit path.
    pub fn searcher(&self) -> Searcher {
        self.slot.read().searcher.clone()
    }

    pub fn index(&self) -> Index {
        self.slot.read().index.clone()
    }

    /// Stamp of the last (re)open, from the registry's monotonic clock.
    pub fn open_time(&self) -> u64 {
        self.slot.read().open_time
    }

    pub(crate) fn reopen(&self, index: Index, open_time: u64) {
        let searcher = index.searcher();
        let mut slot = self.slot.write();
        slot.index = index;
        slot.searcher = searcher;
        slot.open_time = open_time;
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("Core")
            .field("name", &self.name)
            .field("open_time", &slot.open_time)
            .finish()
    }
}
