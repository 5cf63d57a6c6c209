mod live_filter;
mod multi_postings;
mod segment_postings;

pub use live_filter::LiveFilteredPostings;
pub use multi_postings::MultiPostings;
pub use segment_postings::SegmentPostings;
