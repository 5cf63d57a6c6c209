use crate::core::postings::SegmentPostings;
use crate::core::terms::SeekStatus;
use crate::index::{FieldTerms, TermPostings};
use crate::DocId;

/// Positioned enumeration over one segment's sorted term dictionary for one
/// field. Created unpositioned; `next()` or `seek_ceil()` position it.
#[derive(Debug, Clone)]
pub struct SegmentTermCursor<'a> {
    terms: &'a [TermPostings],
    base: DocId,
    pos: Option<usize>,
}

impl<'a> SegmentTermCursor<'a> {
    pub fn new(field_terms: &'a FieldTerms, base: DocId) -> Self {
        Self { terms: &field_terms.terms, base, pos: None }
    }

    pub fn seek_ceil(&mut self, target: &[u8]) -> SeekStatus {
        let pos = self.terms.partition_point(|entry| entry.term.as_ref() < target);
        self.pos = Some(pos);
        if pos == self.terms.len() {
            SeekStatus::End
        } else if self.terms[pos].term.as_ref() == target {
            SeekStatus::Found
        } else {
            SeekStatus::NotFound
        }
    }

    pub fn next(&mut self) -> Option<&'a [u8]> {
        let next = match self.pos {
            None => 0,
            Some(pos) => (pos + 1).min(self.terms.len()),
        };
        self.pos = Some(next);
        self.terms.get(next).map(|entry| entry.term.as_ref())
    }

    /// Currently positioned term; `None` when unpositioned or exhausted.
    pub fn term(&self) -> Option<&'a [u8]> {
        self.pos.and_then(|pos| self.terms.get(pos)).map(|entry| entry.term.as_ref())
    }

    /// df of the positioned term over live+deleted docs.
    pub fn doc_freq(&self) -> usize {
        self.pos.and_then(|pos| self.terms.get(pos)).map(|entry| entry.docs.len()).unwrap_or(0)
    }

    /// Postings of the positioned term, rebased by this segment's base.
    /// The returned cursor borrows the segment, not this cursor.
    pub fn postings(&self) -> Option<SegmentPostings<'a>> {
        self.pos
            .and_then(|pos| self.terms.get(pos))
            .map(|entry| SegmentPostings::new(&entry.docs, self.base))
    }
}
