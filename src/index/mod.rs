mod index;
mod schema;
mod segment;
mod segment_reader;

pub use index::{Index, IndexBuilder};
pub use schema::{FieldEntry, Schema};
pub use segment::{FieldTerms, Segment, TermPostings};
pub use segment_reader::SegmentReader;
