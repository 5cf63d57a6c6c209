use std::io;
use std::sync::Arc;

use thiserror::Error;

/// The library's error enum.
#[derive(Debug, Clone, Error)]
pub enum JoinError {
    /// The request itself is malformed: unknown cross-shard target, a field
    /// missing from its schema, or a field stored in a mode that cannot be
    /// joined on.
    #[error("Bad request: '{0}'")]
    BadRequest(String),

    /// Failure reading the term dictionary or postings.
    #[error("An index IO error occurred: '{0}'")]
    IndexIo(Arc<io::Error>),

    /// The caller cancelled the join. Partial results are never surfaced.
    #[error("Join was aborted by the caller")]
    Aborted,
}

impl From<io::Error> for JoinError {
    fn from(io_err: io::Error) -> JoinError {
        JoinError::IndexIo(Arc::new(io_err))
    }
}
