pub mod common;
pub mod core;
pub mod index;
pub mod reader;
pub mod shard;

mod macros;

pub use crate::common::errors::JoinError;

/// Identifier of a document within one reader.
///
/// Per-segment ("local") ids are rebased by each segment's `base` offset into
/// the composite id space of the owning searcher.
pub type DocId = u32;

/// Sentinel terminating every postings cursor. No stored document may carry
/// this id; a reader encountering it as data treats the index as corrupt.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

pub type Result<T> = std::result::Result<T, JoinError>;

pub use crate::core::docset::{BitDocSet, DocSet, DocSetOps, FixedBitSet, SortedIntDocSet};
pub use crate::core::join::{
    create_join_query, DebugSink, JoinDebugInfo, JoinFilter, JoinOptions, JoinQuery, JoinStats,
    JoinThresholds,
};
pub use crate::core::query::Query;
pub use crate::index::{FieldEntry, Index, IndexBuilder, Schema};
pub use crate::reader::{LeafReaderContext, Searcher};
pub use crate::shard::{Core, CoreRegistry};
