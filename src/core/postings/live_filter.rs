use crate::core::docset::FixedBitSet;
use crate::core::postings::MultiPostings;
use crate::{DocId, NO_MORE_DOCS};

/// Postings stream restricted to live documents. Deleted doc ids are
/// silently skipped.
#[derive(Debug)]
pub struct LiveFilteredPostings<'a> {
    inner: MultiPostings<'a>,
    live_docs: &'a FixedBitSet,
}

impl<'a> LiveFilteredPostings<'a> {
    pub fn new(inner: MultiPostings<'a>, live_docs: &'a FixedBitSet) -> Self {
        Self { inner, live_docs }
    }

    pub fn next_doc(&mut self) -> DocId {
        loop {
            let doc_id = self.inner.next_doc();
            if doc_id == NO_MORE_DOCS || self.live_docs.contains(doc_id) {
                return doc_id;
            }
        }
    }
}
