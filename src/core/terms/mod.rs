mod multi_term_cursor;
mod segment_term_cursor;

pub use multi_term_cursor::MultiTermCursor;
pub use segment_term_cursor::SegmentTermCursor;

/// Outcome of positioning a term cursor at the smallest term `>= target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekStatus {
    /// Positioned exactly at `target`.
    Found,
    /// Positioned at the smallest term greater than `target`.
    NotFound,
    /// No term `>= target` exists; the cursor is exhausted.
    End,
}
