use std::borrow::Cow;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use once_cell::sync::Lazy;

use crate::core::docset::{BitDocSet, FixedBitSet, SortedIntDocSet};
use crate::DocId;

static EMPTY_DOC_SET: Lazy<Arc<DocSet>> = Lazy::new(|| Arc::new(DocSet::Empty(EmptyDocSet)));

/// Capability surface shared by every doc-set variant.
#[enum_dispatch]
pub trait DocSetOps {
    /// Exact cardinality.
    fn size(&self) -> usize;

    /// True iff the two sets share any doc id.
    fn intersects(&self, other: &DocSet) -> bool;

    /// Union into a dense bitset of the owning reader's `max_doc` length.
    fn add_all_to(&self, bits: &mut FixedBitSet);
}

/// A set of composite doc ids on one side of a join.
///
/// The executor treats this as opaque except for one variant check: a
/// bitset-backed set can be cloned wholesale into the result accumulator
/// instead of being re-added bit by bit.
#[enum_dispatch(DocSetOps)]
#[derive(Debug, Clone)]
pub enum DocSet {
    Empty(EmptyDocSet),
    Sorted(SortedIntDocSet),
    Bits(BitDocSet),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDocSet;

impl DocSetOps for EmptyDocSet {
    fn size(&self) -> usize {
        0
    }

    fn intersects(&self, _other: &DocSet) -> bool {
        false
    }

    fn add_all_to(&self, _bits: &mut FixedBitSet) {}
}

impl DocSetOps for SortedIntDocSet {
    fn size(&self) -> usize {
        self.len()
    }

    fn intersects(&self, other: &DocSet) -> bool {
        match other {
            DocSet::Empty(_) => false,
            DocSet::Sorted(sorted) => self.intersects_sorted(sorted),
            DocSet::Bits(bit_set) => self.intersects_bits(bit_set.bits()),
        }
    }

    fn add_all_to(&self, bits: &mut FixedBitSet) {
        SortedIntDocSet::add_all_to(self, bits)
    }
}

impl DocSetOps for BitDocSet {
    fn size(&self) -> usize {
        self.len()
    }

    fn intersects(&self, other: &DocSet) -> bool {
        match other {
            DocSet::Empty(_) => false,
            DocSet::Sorted(sorted) => sorted.intersects_bits(self.bits()),
            DocSet::Bits(bit_set) => self.bits().intersects(bit_set.bits()),
        }
    }

    fn add_all_to(&self, bits: &mut FixedBitSet) {
        bits.union_with(self.bits());
    }
}

impl DocSet {
    pub fn empty() -> DocSet {
        DocSet::Empty(EmptyDocSet)
    }

    /// The shared empty set handed out by caching facades.
    pub fn shared_empty() -> Arc<DocSet> {
        EMPTY_DOC_SET.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Random-access membership predicate over this set, or `None` when no
    /// set bits exist to probe. A `Sorted` set materializes its bits here;
    /// callers build the view once per invocation, never per term.
    pub fn membership_view(&self) -> Option<Cow<'_, FixedBitSet>> {
        match self {
            DocSet::Empty(_) => None,
            DocSet::Sorted(sorted) => {
                if sorted.is_empty() {
                    None
                } else {
                    Some(Cow::Owned(sorted.to_bits()))
                }
            }
            DocSet::Bits(bit_set) => Some(Cow::Borrowed(bit_set.bits())),
        }
    }

    /// Ascending iteration over all member doc ids.
    pub fn iter(&self) -> DocSetIter<'_> {
        self.iter_from(0)
    }

    /// Ascending iteration over member doc ids `>= lower`.
    pub fn iter_from(&self, lower: DocId) -> DocSetIter<'_> {
        match self {
            DocSet::Empty(_) => DocSetIter::Empty,
            DocSet::Sorted(sorted) => {
                let start = sorted.docs().partition_point(|&doc_id| doc_id < lower);
                DocSetIter::Sorted(sorted.docs()[start..].iter().copied())
            }
            DocSet::Bits(bit_set) => DocSetIter::Bits(bit_set.bits().iter_from(lower)),
        }
    }
}

pub enum DocSetIter<'a> {
    Empty,
    Sorted(std::iter::Copied<std::slice::Iter<'a, DocId>>),
    Bits(super::bits::Ones<'a>),
}

impl Iterator for DocSetIter<'_> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        match self {
            DocSetIter::Empty => None,
            DocSetIter::Sorted(iter) => iter.next(),
            DocSetIter::Bits(iter) => iter.next(),
        }
    }
}
