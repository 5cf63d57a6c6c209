use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed subquery defining the from-side document set of a join.
///
/// Kept deliberately small: joins consume an already-parsed query and
/// evaluate it through the searcher's caching facade. Query syntax and
/// rewriting live with the caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Every document.
    MatchAll,
    /// No document.
    MatchNone,
    /// Documents carrying `value` in `field`.
    Term { field: String, value: String },
}

impl Query {
    pub fn term<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        Query::Term { field: field.into(), value: value.into() }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::MatchAll => write!(f, "*:*"),
            Query::MatchNone => write!(f, "-*:*"),
            Query::Term { field, value } => write!(f, "{field}:{value}"),
        }
    }
}
