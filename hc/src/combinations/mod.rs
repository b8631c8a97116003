//! Enumeration of the candidate space
//!
//! Pure functions: the indexer maps ranks to candidate strings and sizes the
//! space, the partitioner splits that space into per-worker shares.

mod alphabet;
mod indexer;
mod partition;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use indexer::{index_of_word, total_combinations, word_by_index};
pub use partition::shares_range;
