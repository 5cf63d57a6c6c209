use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use crate::core::docset::{DocSet, DocSetIter};
use crate::core::join::executor::JoinExecutor;
use crate::core::join::{DebugSink, JoinDebugInfo, JoinThresholds};
use crate::core::query::Query;
use crate::index::FieldEntry;
use crate::reader::{LeafReaderContext, Searcher};
use crate::shard::{CoreRegistry, FromCoreScope};
use crate::{DocId, JoinError};

/// A constant-score join filter: matches every to-side document sharing at
/// least one `from_field` term value with any document matched by `q`.
///
/// Identity folds in `from_core_open_time` so that weights cached upstream
/// invalidate when the remote shard reopens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TypedBuilder)]
pub struct JoinQuery {
    #[builder(setter(into))]
    pub from_field: String,

    #[builder(setter(into))]
    pub to_field: String,

    /// Shard holding the from side, when it differs from the current core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub from_index: Option<String>,

    /// The subquery defining the from-side doc set. Not rewritten here;
    /// rewrite policy stays with the caller.
    pub q: Query,

    /// Open-time stamp of the from-side core at parse time; zero for
    /// same-core joins.
    #[serde(default)]
    #[builder(default)]
    pub from_core_open_time: u64,
}

/// Creates a non-scoring join over two fields of the same core.
pub fn create_join_query<F, T>(sub_query: Query, from_field: F, to_field: T) -> JoinQuery
where
    F: Into<String>,
    T: Into<String>,
{
    JoinQuery::builder().from_field(from_field).to_field(to_field).q(sub_query).build()
}

/// Per-invocation collaborators and overrides. Everything is optional; the
/// defaults run a same-core join with computed thresholds and no
/// diagnostics.
#[derive(Default)]
pub struct JoinOptions<'a> {
    /// Required for cross-shard joins.
    pub registry: Option<&'a CoreRegistry>,

    /// Checked at the start of each term iteration; raising it makes the
    /// invocation return [`JoinError::Aborted`] with no partial result.
    pub abort: Option<&'a AtomicBool>,

    /// Diagnostic sink; counters are recorded under the `"join"` label.
    pub debug: Option<&'a mut DebugSink>,

    /// Routing-threshold override. The result set is invariant under any
    /// legal values; only the execution path changes.
    pub thresholds: Option<JoinThresholds>,
}

impl JoinQuery {
    /// Runs the join and produces the filter over the to-side searcher.
    ///
    /// Searcher and core references acquired here are released on every exit
    /// path; on error no partial result or diagnostics survive.
    pub fn filter(
        &self,
        to_searcher: &Searcher,
        options: JoinOptions<'_>,
    ) -> crate::Result<JoinFilter> {
        let start = Instant::now();

        let scope = self.resolve_from_side(to_searcher, options.registry)?;
        let from_searcher = scope.searcher().unwrap_or(to_searcher);

        let from_entry = Self::indexed_field(from_searcher, &self.from_field)?;
        Self::indexed_field(to_searcher, &self.to_field)?;
        let prefix = from_entry.term_prefix.clone();

        let thresholds = options.thresholds.unwrap_or_else(|| {
            JoinThresholds::compute(from_searcher.max_doc(), to_searcher.max_doc())
        });

        let executor = JoinExecutor {
            from_searcher,
            to_searcher,
            from_field: &self.from_field,
            to_field: &self.to_field,
            query: &self.q,
            prefix: prefix.as_deref().map(str::as_bytes),
            thresholds,
            abort: options.abort,
        };
        let (doc_set, stats) = executor.execute()?;

        let info = JoinDebugInfo { time_ms: start.elapsed().as_millis() as u64, stats };
        debug!(
            "join {self} matched {} docs over {} from-terms in {}ms",
            stats.to_set_size, stats.from_term_count, info.time_ms
        );
        if let Some(sink) = options.debug {
            let mut per_query = Map::new();
            per_query.insert(self.to_string(), info.to_value());
            sink.add("join", Value::Object(per_query));
        }

        Ok(JoinFilter { doc_set: Arc::new(doc_set), debug: info })
    }

    fn resolve_from_side(
        &self,
        to_searcher: &Searcher,
        registry: Option<&CoreRegistry>,
    ) -> crate::Result<FromCoreScope> {
        let Some(from_index) = &self.from_index else {
            return Ok(FromCoreScope::same_core());
        };
        let registry = registry.ok_or_else(|| {
            JoinError::BadRequest("cross-core join requires a core registry".to_string())
        })?;
        let core = registry.get(from_index).ok_or_else(|| {
            JoinError::BadRequest(format!("cross-core join: no such core {from_index}"))
        })?;
        let from_searcher = core.searcher();
        if from_searcher.same_reader(to_searcher) {
            // the "remote" core resolves to the searcher we were handed;
            // treat as a same-core join so both sides share one snapshot
            Ok(FromCoreScope::same_core())
        } else {
            Ok(FromCoreScope::cross_core(core, from_searcher))
        }
    }

    fn indexed_field<'a>(searcher: &'a Searcher, field: &str) -> crate::Result<&'a FieldEntry> {
        let entry = searcher
            .schema()
            .get_field(field)
            .ok_or_else(|| JoinError::BadRequest(format!("undefined field: {field}")))?;
        if !entry.indexed {
            return Err(JoinError::BadRequest(format!(
                "field {field} is not indexed for term access"
            )));
        }
        Ok(entry)
    }
}

impl fmt::Display for JoinQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{!join from={} to={}", self.from_field, self.to_field)?;
        if let Some(from_index) = &self.from_index {
            write!(f, " fromIndex={from_index}")?;
        }
        write!(f, "}}{}", self.q)
    }
}

/// The produced filter: a constant-score doc set over the to-side searcher,
/// sliced per leaf on demand.
#[derive(Debug, Clone)]
pub struct JoinFilter {
    doc_set: Arc<DocSet>,
    debug: JoinDebugInfo,
}

impl JoinFilter {
    /// The composite result set, ascending and deduplicated.
    pub fn doc_set(&self) -> &DocSet {
        &self.doc_set
    }

    pub fn debug(&self) -> &JoinDebugInfo {
        &self.debug
    }

    /// Join results are typically too large to cache per-leaf; upstream
    /// caches the enclosing query instead.
    pub fn is_cacheable(&self) -> bool {
        false
    }

    /// Ascending iterator over matching local doc ids of one leaf, or
    /// `None` when the leaf holds no matches.
    pub fn leaf_iterator(&self, leaf: &LeafReaderContext) -> Option<LeafDocIdIterator<'_>> {
        let end = leaf.base + leaf.max_doc;
        let mut inner = self.doc_set.iter_from(leaf.base);
        let first = inner.next().filter(|&doc_id| doc_id < end)?;
        Some(LeafDocIdIterator { inner, pending: Some(first), done: false, base: leaf.base, end })
    }
}

/// Iterator over one leaf's matches, yielding local (un-rebased) doc ids in
/// strictly increasing order.
pub struct LeafDocIdIterator<'a> {
    inner: DocSetIter<'a>,
    pending: Option<DocId>,
    done: bool,
    base: DocId,
    end: DocId,
}

impl Iterator for LeafDocIdIterator<'_> {
    type Item = DocId;

    fn next(&mut self) -> Option<DocId> {
        if self.done {
            return None;
        }
        let doc_id = match self.pending.take() {
            Some(doc_id) => doc_id,
            None => match self.inner.next() {
                Some(doc_id) => doc_id,
                None => {
                    self.done = true;
                    return None;
                }
            },
        };
        if doc_id < self.end {
            Some(doc_id - self.base)
        } else {
            self.done = true;
            None
        }
    }
}
