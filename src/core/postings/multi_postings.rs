use crate::core::postings::SegmentPostings;
use crate::{DocId, NO_MORE_DOCS};

/// Concatenation of per-segment postings cursors into one ascending stream
/// over the composite id space. Sub-cursor bases are disjoint and ascending,
/// so the stream never repeats a doc id. Empty subs are skipped.
#[derive(Debug, Clone)]
pub struct MultiPostings<'a> {
    subs: Vec<SegmentPostings<'a>>,
    sub_idx: usize,
}

impl<'a> MultiPostings<'a> {
    pub fn new(subs: Vec<SegmentPostings<'a>>) -> Self {
        Self { subs, sub_idx: 0 }
    }

    pub fn next_doc(&mut self) -> DocId {
        while let Some(sub) = self.subs.get_mut(self.sub_idx) {
            let doc_id = sub.next_doc();
            if doc_id != NO_MORE_DOCS {
                return doc_id;
            }
            self.sub_idx += 1;
        }
        NO_MORE_DOCS
    }
}
