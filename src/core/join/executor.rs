use std::sync::atomic::{AtomicBool, Ordering};

use log::trace;

use crate::core::docset::{DocSet, DocSetOps};
use crate::core::join::accumulator::{ToSideAccumulator, ToTermRoute};
use crate::core::join::classifier::from_term_intersects;
use crate::core::join::debug::JoinStats;
use crate::core::join::JoinThresholds;
use crate::core::postings::LiveFilteredPostings;
use crate::core::query::Query;
use crate::core::terms::SeekStatus;
use crate::reader::Searcher;
use crate::JoinError;

/// One join invocation: walks the from-field term dictionary in order,
/// classifies each term against the subquery's doc set, seeks the matching
/// to-field term and routes its docs into the adaptive accumulator.
///
/// The executor exclusively owns every cursor and accumulator it allocates;
/// the searchers are borrowed from the caller for the invocation.
pub(crate) struct JoinExecutor<'a> {
    pub from_searcher: &'a Searcher,
    pub to_searcher: &'a Searcher,
    pub from_field: &'a str,
    pub to_field: &'a str,
    pub query: &'a Query,
    pub prefix: Option<&'a [u8]>,
    pub thresholds: JoinThresholds,
    pub abort: Option<&'a AtomicBool>,
}

impl JoinExecutor<'_> {
    pub fn execute(&self) -> crate::Result<(DocSet, JoinStats)> {
        let mut stats = JoinStats::default();

        let from_set = self.from_searcher.get_doc_set(self.query)?;
        stats.from_set_size = from_set.size() as u32;

        // built once per invocation; probing it is the direct classifier's
        // inner loop
        let from_view = if self.thresholds.min_doc_freq_from == 0 {
            None
        } else {
            from_set.membership_view()
        };

        let Some(mut from_cursor) = self.from_searcher.terms(self.from_field) else {
            return Ok((DocSet::empty(), stats));
        };
        let Some(mut to_cursor) = self.to_searcher.terms(self.to_field) else {
            return Ok((DocSet::empty(), stats));
        };

        let mut accumulator =
            ToSideAccumulator::new(self.to_searcher.max_doc(), self.thresholds);

        let mut positioned = match self.prefix {
            Some(prefix) => from_cursor.seek_ceil(prefix) != SeekStatus::End,
            None => from_cursor.next(),
        };

        'terms: while positioned {
            if let Some(abort) = self.abort {
                if abort.load(Ordering::Relaxed) {
                    return Err(JoinError::Aborted);
                }
            }
            let Some(term) = from_cursor.term().map(<[u8]>::to_vec) else {
                break;
            };
            if let Some(prefix) = self.prefix {
                if !term.starts_with(prefix) {
                    break;
                }
            }

            stats.from_term_count += 1;
            let df_from = from_cursor.doc_freq();
            stats.from_term_total_df += df_from as u64;

            let intersects = from_term_intersects(
                &from_cursor,
                df_from,
                &from_set,
                from_view.as_deref(),
                self.from_searcher,
                self.from_field,
                self.thresholds.min_doc_freq_from,
                &mut stats,
            )?;

            if intersects {
                stats.from_term_hits += 1;
                stats.from_term_hits_total_df += df_from as u64;

                match to_cursor.seek_ceil(&term) {
                    // no to-side term can match any later from-term either
                    SeekStatus::End => break 'terms,
                    SeekStatus::NotFound => {}
                    SeekStatus::Found => {
                        stats.to_term_hits += 1;
                        let df_to = to_cursor.doc_freq();
                        stats.to_term_hits_total_df += df_to as u64;

                        let decision = accumulator.decide(df_to);
                        if decision.promote {
                            trace!(
                                "promoting join accumulator to bitset at term {:?}",
                                String::from_utf8_lossy(&term)
                            );
                            accumulator.promote();
                        }
                        match decision.route {
                            ToTermRoute::Cached => {
                                // to-side sets are live-filtered so deleted
                                // docs never reach the result
                                let to_term_set = self.to_searcher.get_doc_set_for_term(
                                    self.to_field,
                                    &to_cursor,
                                    self.to_searcher.live_docs(),
                                )?;
                                accumulator.push_cached(to_term_set);
                            }
                            ToTermRoute::Direct => {
                                stats.to_term_direct_count += 1;
                                let postings = to_cursor.postings();
                                // deleted docs must not leak into the result
                                match self.to_searcher.live_docs() {
                                    Some(live_docs) => accumulator.write_postings_filtered(
                                        LiveFilteredPostings::new(postings, live_docs),
                                    ),
                                    None => accumulator.write_postings(postings),
                                }
                            }
                        }
                    }
                }
            }

            positioned = from_cursor.next();
        }

        let doc_set = accumulator.finish(&mut stats);
        stats.to_set_size = doc_set.size() as u32;
        Ok((doc_set, stats))
    }
}
