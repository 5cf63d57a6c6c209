mod searcher;

pub use searcher::{LeafReaderContext, Searcher, SearcherGeneration};
