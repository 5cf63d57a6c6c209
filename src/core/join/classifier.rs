use crate::core::docset::{DocSet, DocSetOps, FixedBitSet};
use crate::core::join::debug::JoinStats;
use crate::core::terms::MultiTermCursor;
use crate::reader::Searcher;
use crate::NO_MORE_DOCS;

/// Decides whether the from-term the cursor is positioned at intersects the
/// subquery's doc set.
///
/// Rare terms scan their postings directly, probing the membership view;
/// materializing a cached set for a term seen once rarely pays off. Common
/// terms go through the searcher's cached facade, where the set amortizes
/// across repeated queries. Both paths answer identically.
pub(crate) fn from_term_intersects(
    from_cursor: &MultiTermCursor<'_>,
    df_from: usize,
    from_set: &DocSet,
    from_view: Option<&FixedBitSet>,
    from_searcher: &Searcher,
    from_field: &str,
    min_doc_freq_from: usize,
    stats: &mut JoinStats,
) -> crate::Result<bool> {
    if df_from < min_doc_freq_from {
        stats.from_term_direct_count += 1;
        // raw postings suffice: the membership view already restricts to
        // docs matching the subquery
        let Some(view) = from_view else {
            return Ok(false);
        };
        let mut postings = from_cursor.postings();
        loop {
            let doc_id = postings.next_doc();
            if doc_id == NO_MORE_DOCS {
                return Ok(false);
            }
            if view.contains(doc_id) {
                return Ok(true);
            }
        }
    }
    let from_term_set = from_searcher.get_doc_set_for_term(from_field, from_cursor, None)?;
    Ok(from_set.intersects(&from_term_set))
}
