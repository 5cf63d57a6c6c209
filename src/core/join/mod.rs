mod accumulator;
mod classifier;
mod debug;
mod executor;
mod join_query;
mod thresholds;


pub use debug::{DebugSink, JoinDebugInfo, JoinStats};
pub use join_query::{
    create_join_query, JoinFilter, JoinOptions, JoinQuery, LeafDocIdIterator,
};
pub use thresholds::JoinThresholds;
