use std::fmt;
use std::sync::Arc;

use crate::core::docset::FixedBitSet;
use crate::index::Segment;
use crate::DocId;

/// Read access to one sealed segment, pinned at the base offset the owning
/// searcher assigned to it.
#[derive(Clone)]
pub struct SegmentReader {
    segment: Arc<Segment>,
    base: DocId,
}

impl SegmentReader {
    pub(crate) fn new(segment: Arc<Segment>, base: DocId) -> Self {
        Self { segment, base }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// First composite doc id of this segment.
    pub fn base(&self) -> DocId {
        self.base
    }

    pub fn max_doc(&self) -> DocId {
        self.segment.max_doc()
    }

    pub fn deleted(&self) -> Option<&FixedBitSet> {
        self.segment.deleted()
    }
}

impl fmt::Debug for SegmentReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentReader")
            .field("segment_id", &self.segment.id())
            .field("base", &self.base)
            .field("max_doc", &self.max_doc())
            .finish()
    }
}
