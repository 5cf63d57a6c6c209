use std::fmt;
use std::sync::Arc;

use census::TrackedObject;
use flurry::HashMap;
use log::trace;

use crate::common::constants::{SMALL_SET_PAD, SMALL_SET_SHIFT};
use crate::core::docset::{BitDocSet, DocSet, FixedBitSet, SortedIntDocSet};
use crate::core::postings::LiveFilteredPostings;
use crate::core::query::Query;
use crate::core::terms::{MultiTermCursor, SeekStatus, SegmentTermCursor};
use crate::index::{Index, Schema, SegmentReader};
use crate::{DocId, JoinError, NO_MORE_DOCS};

/// Identifies the snapshot a [`Searcher`] reads: which segments, under which
/// generation id. Tracked in the owning index's inventory so tests can
/// observe that every acquired searcher reference is eventually released.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearcherGeneration {
    segments: Vec<usize>,
    generation_id: u64,
}

impl SearcherGeneration {
    pub fn generation_id(&self) -> u64 {
        self.generation_id
    }

    pub fn segments(&self) -> &[usize] {
        &self.segments
    }
}

/// `(field, term, live-filtered)`. The filtering flag is part of the key:
/// the same term may be cached both ways within one searcher.
type TermCacheKey = (String, Box<[u8]>, bool);

/// One leaf (segment) of a composite reader, as handed to filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafReaderContext {
    pub ord: usize,
    pub base: DocId,
    pub max_doc: DocId,
}

/// An immutable snapshot over the sealed segments of one index, plus the
/// per-searcher doc-set caches the join executor consumes.
///
/// Cheap to clone; clones share one tracked generation, and the generation
/// is released when the last clone drops.
#[derive(Clone)]
pub struct Searcher {
    inner: Arc<SearcherInner>,
}

struct SearcherInner {
    index: Index,
    readers: Vec<SegmentReader>,
    max_doc: DocId,
    live_docs: Option<FixedBitSet>,
    query_cache: HashMap<Query, Arc<DocSet>>,
    term_cache: HashMap<TermCacheKey, Arc<DocSet>>,
    generation: TrackedObject<SearcherGeneration>,
}

impl Searcher {
    pub fn open(index: &Index) -> Searcher {
        let mut readers = Vec::with_capacity(index.segments().len());
        let mut base = 0;
        for segment in index.segments() {
            readers.push(SegmentReader::new(segment.clone(), base));
            base += segment.max_doc();
        }
        let max_doc = base;

        let has_deletes = readers.iter().any(|reader| reader.deleted().is_some());
        let live_docs = has_deletes.then(|| {
            let mut live_docs = FixedBitSet::new(max_doc);
            live_docs.insert_all();
            for reader in &readers {
                if let Some(deleted) = reader.deleted() {
                    for local_doc in deleted.iter() {
                        live_docs.remove(reader.base() + local_doc);
                    }
                }
            }
            live_docs
        });

        let generation = SearcherGeneration {
            segments: index.segments().iter().map(|segment| segment.id()).collect(),
            generation_id: index.next_generation_id(),
        };
        let generation = index.searcher_inventory().track(generation);

        Searcher {
            inner: Arc::new(SearcherInner {
                index: index.clone(),
                readers,
                max_doc,
                live_docs,
                query_cache: HashMap::new(),
                term_cache: HashMap::new(),
                generation,
            }),
        }
    }

    pub fn index(&self) -> &Index {
        &self.inner.index
    }

    pub fn schema(&self) -> &Schema {
        self.inner.index.schema()
    }

    pub fn max_doc(&self) -> DocId {
        self.inner.max_doc
    }

    /// Composite live-docs bits; `None` when no segment carries deletes.
    pub fn live_docs(&self) -> Option<&FixedBitSet> {
        self.inner.live_docs.as_ref()
    }

    pub fn num_live_docs(&self) -> u32 {
        match &self.inner.live_docs {
            Some(live_docs) => live_docs.count_ones(),
            None => self.inner.max_doc,
        }
    }

    pub fn generation(&self) -> &SearcherGeneration {
        &self.inner.generation
    }

    pub fn leaves(&self) -> Vec<LeafReaderContext> {
        self.inner
            .readers
            .iter()
            .enumerate()
            .map(|(ord, reader)| LeafReaderContext {
                ord,
                base: reader.base(),
                max_doc: reader.max_doc(),
            })
            .collect()
    }

    /// True when both searchers read the same snapshot.
    pub fn same_reader(&self, other: &Searcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Composite term cursor over `field`, or `None` when no segment holds
    /// terms for it.
    pub fn terms(&self, field: &str) -> Option<MultiTermCursor<'_>> {
        let subs: Vec<SegmentTermCursor<'_>> = self
            .inner
            .readers
            .iter()
            .filter_map(|reader| {
                reader
                    .segment()
                    .field_terms(field)
                    .filter(|field_terms| !field_terms.is_empty())
                    .map(|field_terms| SegmentTermCursor::new(field_terms, reader.base()))
            })
            .collect();
        if subs.is_empty() {
            None
        } else {
            Some(MultiTermCursor::new(subs))
        }
    }

    /// Evaluates `query` to its document set, through the per-searcher
    /// cache.
    ///
    /// Evaluation spans live and deleted documents alike; deletes are a
    /// result-side concern applied where matched docs surface.
    pub fn get_doc_set(&self, query: &Query) -> crate::Result<Arc<DocSet>> {
        if matches!(query, Query::MatchNone) {
            return Ok(DocSet::shared_empty());
        }
        let cache = self.inner.query_cache.pin();
        if let Some(doc_set) = cache.get(query) {
            return Ok(doc_set.clone());
        }
        let doc_set = Arc::new(self.eval(query)?);
        cache.insert(query.clone(), doc_set.clone());
        Ok(doc_set)
    }

    fn eval(&self, query: &Query) -> crate::Result<DocSet> {
        match query {
            Query::MatchNone => Ok(DocSet::empty()),
            Query::MatchAll => {
                let mut bits = FixedBitSet::new(self.inner.max_doc);
                bits.insert_all();
                Ok(DocSet::Bits(BitDocSet::from(bits)))
            }
            Query::Term { field, value } => {
                let Some(mut cursor) = self.terms(field) else {
                    return Ok(DocSet::empty());
                };
                if cursor.seek_ceil(value.as_bytes()) != SeekStatus::Found {
                    return Ok(DocSet::empty());
                }
                Ok(self.materialize(cursor.doc_freq(), cursor.postings(), None))
            }
        }
    }

    /// Cached doc set for the term the cursor is positioned at, restricted
    /// to `live_docs` when given. The join executor only ever consumes sets
    /// through this facade; it never writes a cache itself.
    pub fn get_doc_set_for_term(
        &self,
        field: &str,
        cursor: &MultiTermCursor<'_>,
        live_docs: Option<&FixedBitSet>,
    ) -> crate::Result<Arc<DocSet>> {
        let term = cursor.term().ok_or_else(|| {
            JoinError::BadRequest(format!("term cursor for field {field} is unpositioned"))
        })?;
        let key = (field.to_string(), Box::<[u8]>::from(term), live_docs.is_some());
        let cache = self.inner.term_cache.pin();
        if let Some(doc_set) = cache.get(&key) {
            return Ok(doc_set.clone());
        }
        trace!("materializing doc set for {}:{:?}", field, term);
        let doc_set = Arc::new(self.materialize(cursor.doc_freq(), cursor.postings(), live_docs));
        cache.insert(key, doc_set.clone());
        Ok(doc_set)
    }

    /// Collects a postings stream into the cheapest doc-set representation.
    /// `df` is the pre-filter size estimate steering the representation.
    fn materialize(
        &self,
        df: usize,
        postings: crate::core::postings::MultiPostings<'_>,
        live_docs: Option<&FixedBitSet>,
    ) -> DocSet {
        let small_bound = ((self.inner.max_doc as usize) >> SMALL_SET_SHIFT) + SMALL_SET_PAD;
        let mut postings = postings;
        if df < small_bound {
            let mut docs = Vec::with_capacity(df);
            match live_docs {
                Some(live_docs) => {
                    let mut filtered = LiveFilteredPostings::new(postings, live_docs);
                    loop {
                        let doc_id = filtered.next_doc();
                        if doc_id == NO_MORE_DOCS {
                            break;
                        }
                        docs.push(doc_id);
                    }
                }
                None => loop {
                    let doc_id = postings.next_doc();
                    if doc_id == NO_MORE_DOCS {
                        break;
                    }
                    docs.push(doc_id);
                },
            }
            if docs.is_empty() {
                DocSet::empty()
            } else {
                DocSet::Sorted(SortedIntDocSet::from_sorted(docs))
            }
        } else {
            let mut bits = FixedBitSet::new(self.inner.max_doc);
            loop {
                let doc_id = postings.next_doc();
                if doc_id == NO_MORE_DOCS {
                    break;
                }
                match live_docs {
                    Some(live_docs) if !live_docs.contains(doc_id) => {}
                    _ => bits.insert(doc_id),
                }
            }
            DocSet::Bits(BitDocSet::from(bits))
        }
    }
}

impl Index {
    /// Opens a fresh searcher over this index's current segments.
    pub fn searcher(&self) -> Searcher {
        Searcher::open(self)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("generation", &self.inner.generation.generation_id())
            .field("segments", &self.inner.readers.len())
            .field("max_doc", &self.inner.max_doc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docset::DocSetOps;
    use crate::doc;
    use crate::index::{FieldEntry, IndexBuilder};

    fn sample_index() -> Index {
        let mut schema = Schema::new();
        schema.add_field(FieldEntry::new("from_id"));
        schema.add_field(FieldEntry::new("to_id"));
        let mut builder = IndexBuilder::new(schema);
        builder.add_doc(doc!("from_id" => "a")).unwrap();
        builder.add_doc(doc!("from_id" => "b", "to_id" => "a")).unwrap();
        builder.commit();
        builder.add_doc(doc!("from_id" => "b", "to_id" => "b")).unwrap();
        builder.build()
    }

    #[test]
    fn test_max_doc_and_leaves() {
        let searcher = sample_index().searcher();
        assert_eq!(searcher.max_doc(), 3);
        let leaves = searcher.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].base, 0);
        assert_eq!(leaves[1].base, 2);
        assert_eq!(leaves[1].max_doc, 1);
    }

    #[test]
    fn test_terms_across_segments() {
        let searcher = sample_index().searcher();
        let mut cursor = searcher.terms("from_id").unwrap();
        assert_eq!(cursor.seek_ceil(b"b"), SeekStatus::Found);
        // "b" appears in both segments
        assert_eq!(cursor.doc_freq(), 2);
        assert!(searcher.terms("missing").is_none());
    }

    #[test]
    fn test_get_doc_set_match_all_spans_deleted_docs() {
        let mut schema = Schema::new();
        schema.add_field(FieldEntry::new("from_id"));
        let mut builder = IndexBuilder::new(schema);
        builder.add_doc(doc!("from_id" => "a")).unwrap();
        builder.add_doc(doc!("from_id" => "b")).unwrap();
        builder.delete(0);
        let searcher = builder.build().searcher();
        // query evaluation spans deleted docs; deletes apply where results
        // surface
        let doc_set = searcher.get_doc_set(&Query::MatchAll).unwrap();
        assert_eq!(doc_set.size(), 2);
        assert_eq!(searcher.num_live_docs(), 1);
    }

    #[test]
    fn test_term_doc_set_live_filtering_is_keyed() {
        let mut schema = Schema::new();
        schema.add_field(FieldEntry::new("from_id"));
        let mut builder = IndexBuilder::new(schema);
        builder.add_doc(doc!("from_id" => "a")).unwrap();
        builder.add_doc(doc!("from_id" => "a")).unwrap();
        builder.delete(0);
        let searcher = builder.build().searcher();
        let mut cursor = searcher.terms("from_id").unwrap();
        cursor.seek_ceil(b"a");
        let unfiltered = searcher.get_doc_set_for_term("from_id", &cursor, None).unwrap();
        let filtered = searcher
            .get_doc_set_for_term("from_id", &cursor, searcher.live_docs())
            .unwrap();
        assert_eq!(unfiltered.size(), 2);
        assert_eq!(filtered.size(), 1);
        assert_eq!(filtered.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_get_doc_set_term_cached() {
        let searcher = sample_index().searcher();
        let query = Query::term("from_id", "b");
        let first = searcher.get_doc_set(&query).unwrap();
        let second = searcher.get_doc_set(&query).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_generation_released_with_last_clone() {
        let index = sample_index();
        assert_eq!(index.searcher_generations_alive(), 0);
        let searcher = index.searcher();
        let clone = searcher.clone();
        assert_eq!(index.searcher_generations_alive(), 1);
        drop(searcher);
        assert_eq!(index.searcher_generations_alive(), 1);
        drop(clone);
        assert_eq!(index.searcher_generations_alive(), 0);
    }
}
