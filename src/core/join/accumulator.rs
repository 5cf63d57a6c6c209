use std::sync::Arc;

use itertools::Itertools;
use log::error;
use smallvec::SmallVec;

use crate::core::docset::{BitDocSet, DocSet, DocSetOps, FixedBitSet, SortedIntDocSet};
use crate::core::join::debug::JoinStats;
use crate::core::join::JoinThresholds;
use crate::core::postings::{LiveFilteredPostings, MultiPostings};
use crate::{DocId, NO_MORE_DOCS};

/// How one to-term's docs enter the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToTermRoute {
    /// Take the cached doc set and merge it in.
    Cached,
    /// Write the term's postings straight into the result bitset.
    Direct,
}

/// Decision for one to-term: whether to promote the accumulator to a dense
/// bitset first, and which route the term's docs take afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ToTermDecision {
    pub promote: bool,
    pub route: ToTermRoute,
}

/// Pure routing function, kept free of accumulator state so the decision
/// table can be tested in isolation.
pub(crate) fn route_to_term(
    df_to: usize,
    result_list_docs: u64,
    bits_present: bool,
    list_len: usize,
    thresholds: &JoinThresholds,
) -> ToTermDecision {
    // this term's contribution is what forces the dense representation;
    // sets deferred so far are folded in at finalization
    let promote = !bits_present
        && df_to as u64 + result_list_docs > thresholds.max_sorted_int_size as u64
        && list_len > 0;
    let route = if df_to >= thresholds.min_doc_freq_to || !(bits_present || promote) {
        ToTermRoute::Cached
    } else {
        ToTermRoute::Direct
    };
    ToTermDecision { promote, route }
}

/// Adaptive result builder on the to-side: a sparse list of small sorted
/// sets until the accumulated size argues for a dense bitset, then one-way
/// promotion.
pub(crate) struct ToSideAccumulator {
    result_bits: Option<FixedBitSet>,
    result_list: SmallVec<[Arc<DocSet>; 8]>,
    result_list_docs: u64,
    to_max_doc: DocId,
    thresholds: JoinThresholds,
}

impl ToSideAccumulator {
    pub fn new(to_max_doc: DocId, thresholds: JoinThresholds) -> Self {
        Self {
            result_bits: None,
            result_list: SmallVec::new(),
            result_list_docs: 0,
            to_max_doc,
            thresholds,
        }
    }

    pub fn decide(&self, df_to: usize) -> ToTermDecision {
        route_to_term(
            df_to,
            self.result_list_docs,
            self.result_bits.is_some(),
            self.result_list.len(),
            &self.thresholds,
        )
    }

    /// One-way switch to the dense representation. Deferred sets stay in
    /// the list until finalization.
    pub fn promote(&mut self) {
        debug_assert!(self.result_bits.is_none());
        self.result_bits = Some(FixedBitSet::new(self.to_max_doc));
    }

    pub fn push_cached(&mut self, to_term_set: Arc<DocSet>) {
        self.result_list_docs += to_term_set.size() as u64;
        if let Some(bits) = self.result_bits.as_mut() {
            to_term_set.add_all_to(bits);
        } else if let DocSet::Bits(bit_set) = &*to_term_set {
            // cloning the backing bits beats re-adding them term by term
            self.result_bits = Some(bit_set.bits().clone());
        } else {
            self.result_list.push(to_term_set);
        }
    }

    pub fn write_postings(&mut self, mut postings: MultiPostings<'_>) {
        let Some(bits) = self.result_bits.as_mut() else {
            error!("direct write routed without a result bitset");
            return;
        };
        loop {
            let doc_id = postings.next_doc();
            if doc_id == NO_MORE_DOCS {
                break;
            }
            self.result_list_docs += 1;
            bits.insert(doc_id);
        }
    }

    pub fn write_postings_filtered(&mut self, mut postings: LiveFilteredPostings<'_>) {
        let Some(bits) = self.result_bits.as_mut() else {
            error!("direct write routed without a result bitset");
            return;
        };
        loop {
            let doc_id = postings.next_doc();
            if doc_id == NO_MORE_DOCS {
                break;
            }
            self.result_list_docs += 1;
            bits.insert(doc_id);
        }
    }

    pub fn finish(self, stats: &mut JoinStats) -> DocSet {
        stats.small_sets_deferred = self.result_list.len() as u32;
        stats.to_set_docs_added = self.result_list_docs;

        if let Some(mut bits) = self.result_bits {
            for deferred in &self.result_list {
                deferred.add_all_to(&mut bits);
            }
            return DocSet::Bits(BitDocSet::from(bits));
        }
        match self.result_list.len() {
            0 => DocSet::empty(),
            1 => (*self.result_list[0]).clone(),
            _ => {
                let merged: Vec<DocId> = self
                    .result_list
                    .iter()
                    .map(|deferred| deferred.iter())
                    .kmerge()
                    .dedup()
                    .collect();
                DocSet::Sorted(SortedIntDocSet::from_sorted(merged))
            }
        }
    }
}
