use std::collections::BTreeMap;

use crate::core::docset::FixedBitSet;
use crate::DocId;

/// One term of a field with its local postings.
#[derive(Debug, Clone)]
pub struct TermPostings {
    pub term: Box<[u8]>,
    /// Ascending local doc ids. Deletes never shrink this list, so its
    /// length is the term's df over live+deleted docs.
    pub docs: Box<[DocId]>,
}

/// The sorted term dictionary of one field within one segment.
#[derive(Debug, Clone, Default)]
pub struct FieldTerms {
    pub terms: Vec<TermPostings>,
}

impl FieldTerms {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// An immutable slice of the index: term dictionaries plus a delete bitset.
///
/// Local doc ids run `0..max_doc`; the owning searcher rebases them by this
/// segment's base offset.
#[derive(Debug)]
pub struct Segment {
    id: usize,
    fields: BTreeMap<String, FieldTerms>,
    max_doc: DocId,
    deleted: Option<FixedBitSet>,
}

impl Segment {
    pub(crate) fn new(
        id: usize,
        fields: BTreeMap<String, FieldTerms>,
        max_doc: DocId,
        deleted: Option<FixedBitSet>,
    ) -> Self {
        Self { id, fields, max_doc, deleted }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    pub fn field_terms(&self, field: &str) -> Option<&FieldTerms> {
        self.fields.get(field)
    }

    /// Local-id delete bitset; `None` when nothing was deleted.
    pub fn deleted(&self) -> Option<&FixedBitSet> {
        self.deleted.as_ref()
    }

    pub(crate) fn mark_deleted(&mut self, local_doc: DocId) {
        debug_assert!(local_doc < self.max_doc);
        self.deleted.get_or_insert_with(|| FixedBitSet::new(self.max_doc)).insert(local_doc);
    }

    pub fn num_deleted(&self) -> u32 {
        self.deleted.as_ref().map(|bits| bits.count_ones()).unwrap_or(0)
    }
}
