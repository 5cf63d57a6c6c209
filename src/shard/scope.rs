use std::sync::Arc;

use log::trace;

use crate::reader::Searcher;
use crate::shard::Core;

/// Scoped ownership of the from-side core reference of one cross-shard join
/// invocation.
///
/// The core is acquired at most once per invocation; release is idempotent
/// and guaranteed on every exit path, normal or error, because the scope is
/// dropped with the invocation's stack frame.
pub struct FromCoreScope {
    acquired: Option<(Arc<Core>, Searcher)>,
}

impl FromCoreScope {
    /// Scope of a same-core join: nothing to acquire or release.
    pub fn same_core() -> Self {
        Self { acquired: None }
    }

    pub fn cross_core(core: Arc<Core>, searcher: Searcher) -> Self {
        Self { acquired: Some((core, searcher)) }
    }

    /// The from-side searcher, when this scope holds a cross-shard core.
    pub fn searcher(&self) -> Option<&Searcher> {
        self.acquired.as_ref().map(|(_, searcher)| searcher)
    }

    /// Drops the core and searcher references. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some((core, _)) = self.acquired.take() {
            trace!("released from-side core {}", core.name());
        }
    }
}

impl Drop for FromCoreScope {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::index::{FieldEntry, IndexBuilder, Schema};
    use crate::shard::CoreRegistry;

    #[test]
    fn test_release_is_idempotent() {
        let mut schema = Schema::new();
        schema.add_field(FieldEntry::new("from_id"));
        let mut builder = IndexBuilder::new(schema);
        builder.add_doc(doc!("from_id" => "a")).unwrap();
        let index = builder.build();

        let registry = CoreRegistry::new();
        let core = registry.register("shard_a", index.clone());
        // the core's own registered searcher
        assert_eq!(index.searcher_generations_alive(), 1);

        let mut scope = FromCoreScope::cross_core(core.clone(), core.searcher());
        assert!(scope.searcher().is_some());
        scope.release();
        scope.release();
        assert!(scope.searcher().is_none());
        drop(scope);
        assert_eq!(index.searcher_generations_alive(), 1);
    }
}
