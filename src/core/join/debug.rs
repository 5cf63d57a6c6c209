use serde::Serialize;
use serde_json::{json, Value};

/// Counters accumulated over one join invocation. Deterministic: two runs
/// over identical readers produce identical values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// Docs matching the from-side subquery.
    pub from_set_size: u32,
    /// Docs in the produced result set.
    pub to_set_size: u32,
    pub from_term_count: u32,
    pub from_term_total_df: u64,
    /// From-terms too rare for the cached path.
    pub from_term_direct_count: u32,
    /// From-terms that intersected the subquery's doc set.
    pub from_term_hits: u32,
    pub from_term_hits_total_df: u64,
    /// Intersecting from-terms that also exist in the to field.
    pub to_term_hits: u32,
    pub to_term_hits_total_df: u64,
    /// To-terms written straight into the result bitset.
    pub to_term_direct_count: u32,
    /// Small sets still deferred at finalization.
    pub small_sets_deferred: u32,
    /// Total docs collected into the accumulator, duplicates included.
    pub to_set_docs_added: u64,
}

/// One invocation's diagnostics: the counters plus elapsed wall time.
#[derive(Debug, Clone, Serialize)]
pub struct JoinDebugInfo {
    pub time_ms: u64,
    #[serde(flatten)]
    pub stats: JoinStats,
}

impl JoinDebugInfo {
    pub fn to_value(&self) -> Value {
        json!({
            "time": self.time_ms,
            "fromSetSize": self.stats.from_set_size,
            "toSetSize": self.stats.to_set_size,
            "fromTermCount": self.stats.from_term_count,
            "fromTermTotalDf": self.stats.from_term_total_df,
            "fromTermDirectCount": self.stats.from_term_direct_count,
            "fromTermHits": self.stats.from_term_hits,
            "fromTermHitsTotalDf": self.stats.from_term_hits_total_df,
            "toTermHits": self.stats.to_term_hits,
            "toTermHitsTotalDf": self.stats.to_term_hits_total_df,
            "toTermDirectCount": self.stats.to_term_direct_count,
            "smallSetsDeferred": self.stats.small_sets_deferred,
            "toSetDocsAdded": self.stats.to_set_docs_added,
        })
    }
}

/// Ordered key/value accumulator the engine hangs diagnostics onto. Opaque
/// to the executor; it only ever appends.
#[derive(Debug, Default)]
pub struct DebugSink {
    entries: Vec<(String, Value)>,
}

impl DebugSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str, value: Value) {
        self.entries.push((label.to_string(), value));
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Entries recorded under `label`, in insertion order.
    pub fn get(&self, label: &str) -> Vec<&Value> {
        self.entries
            .iter()
            .filter(|(entry_label, _)| entry_label == label)
            .map(|(_, value)| value)
            .collect()
    }
}
