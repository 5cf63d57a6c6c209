use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use census::Inventory;
use log::debug;

use crate::core::docset::FixedBitSet;
use crate::index::segment::{FieldTerms, Segment, TermPostings};
use crate::index::Schema;
use crate::reader::SearcherGeneration;
use crate::{DocId, JoinError};

/// An immutable, fully committed set of segments plus the schema they were
/// written under. Cheap to clone; all heavy state is shared.
#[derive(Clone)]
pub struct Index {
    inner: Arc<IndexInner>,
}

struct IndexInner {
    schema: Schema,
    segments: Vec<Arc<Segment>>,
    searcher_inventory: Inventory<SearcherGeneration>,
    generation_counter: AtomicU64,
}

impl Index {
    fn new(schema: Schema, segments: Vec<Arc<Segment>>) -> Self {
        Self {
            inner: Arc::new(IndexInner {
                schema,
                segments,
                searcher_inventory: Inventory::new(),
                generation_counter: AtomicU64::new(0),
            }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.inner.segments
    }

    /// Total doc count, deleted docs included.
    pub fn max_doc(&self) -> DocId {
        self.inner.segments.iter().map(|segment| segment.max_doc()).sum()
    }

    /// Number of searcher generations still referenced somewhere. Used to
    /// verify that joins release every searcher they acquire.
    pub fn searcher_generations_alive(&self) -> usize {
        self.inner.searcher_inventory.list().len()
    }

    pub(crate) fn searcher_inventory(&self) -> &Inventory<SearcherGeneration> {
        &self.inner.searcher_inventory
    }

    pub(crate) fn next_generation_id(&self) -> u64 {
        self.inner.generation_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("segments", &self.inner.segments.len())
            .field("max_doc", &self.max_doc())
            .finish()
    }
}

/// Accumulates documents into segments. `commit()` seals the pending docs
/// into an immutable segment; `build()` commits and produces the [`Index`].
pub struct IndexBuilder {
    schema: Schema,
    sealed: Vec<Segment>,
    sealed_base: DocId,
    writer: SegmentWriter,
}

#[derive(Default)]
struct SegmentWriter {
    postings: BTreeMap<String, BTreeMap<Box<[u8]>, Vec<DocId>>>,
    next_doc: DocId,
    deleted: Vec<DocId>,
}

impl IndexBuilder {
    pub fn new(schema: Schema) -> Self {
        Self { schema, sealed: Vec::new(), sealed_base: 0, writer: SegmentWriter::default() }
    }

    /// Adds one document and returns its composite doc id. A field name may
    /// repeat to produce a multi-valued field.
    pub fn add_doc(&mut self, fields: Vec<(&str, &str)>) -> crate::Result<DocId> {
        for (field, _) in &fields {
            let entry = self
                .schema
                .get_field(field)
                .ok_or_else(|| JoinError::BadRequest(format!("undefined field: {field}")))?;
            if !entry.indexed {
                return Err(JoinError::BadRequest(format!("field {field} is not indexed")));
            }
        }
        let local_doc = self.writer.next_doc;
        self.writer.next_doc += 1;
        for (field, value) in fields {
            let docs = self
                .writer
                .postings
                .entry(field.to_string())
                .or_default()
                .entry(value.as_bytes().into())
                .or_default();
            // the same value may appear twice in one multi-valued field
            if docs.last() != Some(&local_doc) {
                docs.push(local_doc);
            }
        }
        Ok(self.sealed_base + local_doc)
    }

    /// Seals the pending documents into a segment. A no-op when nothing is
    /// pending.
    pub fn commit(&mut self) {
        if self.writer.next_doc == 0 {
            return;
        }
        let writer = std::mem::take(&mut self.writer);
        let max_doc = writer.next_doc;
        let fields = writer
            .postings
            .into_iter()
            .map(|(field, terms)| {
                let terms = terms
                    .into_iter()
                    .map(|(term, docs)| TermPostings { term, docs: docs.into_boxed_slice() })
                    .collect();
                (field, FieldTerms { terms })
            })
            .collect();
        let deleted = if writer.deleted.is_empty() {
            None
        } else {
            let mut bits = FixedBitSet::new(max_doc);
            for local_doc in writer.deleted {
                bits.insert(local_doc);
            }
            Some(bits)
        };
        let segment = Segment::new(self.sealed.len(), fields, max_doc, deleted);
        debug!("sealed segment {} with {} docs", segment.id(), max_doc);
        self.sealed.push(segment);
        self.sealed_base += max_doc;
    }

    /// Marks a composite doc id deleted. Postings keep the doc; readers
    /// filter it through the live-docs bits.
    pub fn delete(&mut self, doc_id: DocId) {
        if doc_id >= self.sealed_base {
            let local_doc = doc_id - self.sealed_base;
            debug_assert!(local_doc < self.writer.next_doc, "delete of unknown doc {doc_id}");
            self.writer.deleted.push(local_doc);
            return;
        }
        let mut base = 0;
        for segment in &mut self.sealed {
            let next_base = base + segment.max_doc();
            if doc_id < next_base {
                segment.mark_deleted(doc_id - base);
                return;
            }
            base = next_base;
        }
    }

    pub fn build(mut self) -> Index {
        self.commit();
        Index::new(self.schema, self.sealed.into_iter().map(Arc::new).collect())
    }
}
