/// Floor for both per-side document-frequency thresholds.
pub const MIN_DOC_FREQ_FLOOR: usize = 5;

/// Shift applied to a searcher's `max_doc` to derive its df threshold.
pub const MIN_DOC_FREQ_SHIFT: u32 = 13;

/// Floor for the sorted-set accumulation budget.
pub const MAX_SORTED_INT_FLOOR: usize = 10;

/// Shift applied to the to-side `max_doc` to derive the sorted-set budget.
/// Smaller than the usual small-set bound since the deferred sets still have
/// to be sorted and deduplicated at finalization.
pub const MAX_SORTED_INT_SHIFT: u32 = 10;

/// A doc set whose cardinality stays below
/// `(max_doc >> SMALL_SET_SHIFT) + SMALL_SET_PAD` is materialized as a
/// sorted int set rather than a bitset.
pub const SMALL_SET_SHIFT: u32 = 6;

/// Additive slack on the small-set bound so tiny indexes still produce
/// sorted sets.
pub const SMALL_SET_PAD: usize = 5;
