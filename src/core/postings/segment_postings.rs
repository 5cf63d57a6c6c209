use crate::{DocId, NO_MORE_DOCS};

/// Forward cursor over one segment's postings for one term, yielding
/// composite ids `local + base`.
#[derive(Debug, Clone)]
pub struct SegmentPostings<'a> {
    docs: &'a [DocId],
    base: DocId,
    pos: usize,
}

impl<'a> SegmentPostings<'a> {
    pub fn new(docs: &'a [DocId], base: DocId) -> Self {
        Self { docs, base, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Next composite doc id, or [`NO_MORE_DOCS`] once exhausted. Behavior
    /// after exhaustion is unspecified by the contract; this implementation
    /// keeps answering the sentinel.
    pub fn next_doc(&mut self) -> DocId {
        match self.docs.get(self.pos) {
            Some(&local_doc) => {
                self.pos += 1;
                local_doc + self.base
            }
            None => NO_MORE_DOCS,
        }
    }
}
