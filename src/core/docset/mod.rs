mod bit_docset;
mod bits;
mod docset;
mod sorted_docset;

pub use bit_docset::BitDocSet;
pub use bits::{FixedBitSet, Ones};
pub use docset::{DocSet, DocSetIter, DocSetOps, EmptyDocSet};
pub use sorted_docset::SortedIntDocSet;
