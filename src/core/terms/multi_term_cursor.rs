use crate::core::postings::{MultiPostings, SegmentPostings};
use crate::core::terms::{SeekStatus, SegmentTermCursor};

/// Interleaves the sorted term dictionaries of every segment holding the
/// field, without materializing the union. The cursor owns a copy of the
/// current term bytes so callers can hold postings and doc-set handles while
/// advancing.
#[derive(Debug)]
pub struct MultiTermCursor<'a> {
    subs: Vec<SegmentTermCursor<'a>>,
    current: Option<Vec<u8>>,
}

impl<'a> MultiTermCursor<'a> {
    /// `subs` must be ordered by segment base.
    pub(crate) fn new(subs: Vec<SegmentTermCursor<'a>>) -> Self {
        Self { subs, current: None }
    }

    /// Advances to the next distinct term in lexicographic order. Returns
    /// false once every sub-dictionary is exhausted.
    pub fn next(&mut self) -> bool {
        match self.current.take() {
            None => {
                for sub in &mut self.subs {
                    sub.next();
                }
            }
            Some(current) => {
                // only the subs positioned at the current term move
                for sub in &mut self.subs {
                    if sub.term() == Some(current.as_slice()) {
                        sub.next();
                    }
                }
            }
        }
        self.refresh_current();
        self.current.is_some()
    }

    pub fn seek_ceil(&mut self, target: &[u8]) -> SeekStatus {
        for sub in &mut self.subs {
            sub.seek_ceil(target);
        }
        self.refresh_current();
        match &self.current {
            None => SeekStatus::End,
            Some(term) if term.as_slice() == target => SeekStatus::Found,
            Some(_) => SeekStatus::NotFound,
        }
    }

    fn refresh_current(&mut self) {
        self.current = self
            .subs
            .iter()
            .filter_map(|sub| sub.term())
            .min()
            .map(|term| term.to_vec());
    }

    pub fn term(&self) -> Option<&[u8]> {
        self.current.as_deref()
    }

    /// Summed df of the current term across segments, live+deleted.
    pub fn doc_freq(&self) -> usize {
        let Some(current) = self.current.as_deref() else {
            return 0;
        };
        self.subs
            .iter()
            .filter(|sub| sub.term() == Some(current))
            .map(|sub| sub.doc_freq())
            .sum()
    }

    /// Composite postings of the current term: the concatenation of each
    /// matching segment's postings, pre-rebased. Borrows the segments, not
    /// this cursor.
    pub fn postings(&self) -> MultiPostings<'a> {
        let Some(current) = self.current.as_deref() else {
            return MultiPostings::new(Vec::new());
        };
        let subs: Vec<SegmentPostings<'a>> = self
            .subs
            .iter()
            .filter(|sub| sub.term() == Some(current))
            .filter_map(|sub| sub.postings())
            .collect();
        MultiPostings::new(subs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{FieldTerms, TermPostings};
    use crate::{DocId, NO_MORE_DOCS};

    fn field_terms(entries: &[(&str, &[DocId])]) -> FieldTerms {
        FieldTerms {
            terms: entries
                .iter()
                .map(|(term, docs)| TermPostings {
                    term: term.as_bytes().into(),
                    docs: (*docs).into(),
                })
                .collect(),
        }
    }

    fn drain(cursor: &mut MultiTermCursor<'_>) -> Vec<Vec<u8>> {
        let mut terms = Vec::new();
        while cursor.next() {
            terms.push(cursor.term().unwrap().to_vec());
        }
        terms
    }

    #[test]
    fn test_interleaves_two_segments() {
        let seg_a = field_terms(&[("a", &[0]), ("c", &[1])]);
        let seg_b = field_terms(&[("b", &[0]), ("c", &[1, 2])]);
        let mut cursor = MultiTermCursor::new(vec![
            SegmentTermCursor::new(&seg_a, 0),
            SegmentTermCursor::new(&seg_b, 2),
        ]);
        assert_eq!(drain(&mut cursor), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(!cursor.next());
    }

    #[test]
    fn test_doc_freq_sums_segments() {
        let seg_a = field_terms(&[("c", &[1])]);
        let seg_b = field_terms(&[("c", &[1, 2])]);
        let mut cursor = MultiTermCursor::new(vec![
            SegmentTermCursor::new(&seg_a, 0),
            SegmentTermCursor::new(&seg_b, 2),
        ]);
        assert_eq!(cursor.seek_ceil(b"c"), SeekStatus::Found);
        assert_eq!(cursor.doc_freq(), 3);
    }

    #[test]
    fn test_postings_concatenate_rebased() {
        let seg_a = field_terms(&[("c", &[1])]);
        let seg_b = field_terms(&[("b", &[0]), ("c", &[0, 2])]);
        let mut cursor = MultiTermCursor::new(vec![
            SegmentTermCursor::new(&seg_a, 0),
            SegmentTermCursor::new(&seg_b, 2),
        ]);
        cursor.seek_ceil(b"c");
        let mut postings = cursor.postings();
        assert_eq!(postings.next_doc(), 1);
        assert_eq!(postings.next_doc(), 2);
        assert_eq!(postings.next_doc(), 4);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn test_seek_ceil_statuses() {
        let seg_a = field_terms(&[("b", &[0]), ("d", &[1])]);
        let mut cursor = MultiTermCursor::new(vec![SegmentTermCursor::new(&seg_a, 0)]);
        assert_eq!(cursor.seek_ceil(b"a"), SeekStatus::NotFound);
        assert_eq!(cursor.term(), Some(&b"b"[..]));
        assert_eq!(cursor.seek_ceil(b"d"), SeekStatus::Found);
        assert_eq!(cursor.seek_ceil(b"e"), SeekStatus::End);
        assert_eq!(cursor.term(), None);
    }
}
