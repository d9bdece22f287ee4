//! # triematch
//!
//! Dictionary search automata with per-key payloads.
//!
//! A dictionary is a batch of `(sequence, payload)` pairs over any
//! symbol type. Built once, the automaton answers four kinds of
//! queries:
//!
//! 1. **Exact lookup**: the payload bound to a key.
//! 2. **Prefix enumeration**: every key beginning with a prefix, in
//!    output-linear time via a precomputed reachable-value cache.
//! 3. **Fuzzy search**: every key (or key prefix) within a
//!    generalized Levenshtein distance of a query, with pluggable edit
//!    costs, driven by a pruned Wagner-Fischer column walk.
//! 4. **Substring matching**: every key occurring anywhere in a text,
//!    via an Aho-Corasick suffix-link overlay.
//!
//! [`Trie`] answers the first three; [`AhoCorasick`] answers all four.
//! Construction is a one-shot batch; afterwards everything is
//! read-only and queries may run from any number of threads.
//!
//! ## Example
//!
//! ```rust
//! use triematch::prelude::*;
//!
//! let trie: Trie<char, i32> = Trie::from_pairs(vec![
//!     ("qwerty".chars(), 1),
//!     ("asdfgh".chars(), 2),
//!     ("qwe".chars(), 3),
//! ]);
//!
//! assert_eq!(trie.find("qwe".chars()), Some(&3));
//!
//! let close: Vec<_> = trie
//!     .find_levenshtein(levenshtein(1), "qwerta".chars())
//!     .map(|candidate| (*candidate.value, candidate.distance))
//!     .collect();
//! assert_eq!(close, vec![(1, 1)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aho_corasick;
pub mod automaton;
pub mod fsm;
pub mod levenshtein;
pub mod trie;

pub use aho_corasick::AhoCorasick;
pub use automaton::{Candidate, FuzzyMatches, PrefixMatches, SearchAutomaton};
pub use levenshtein::{levenshtein, levenshtein_with, LevenshteinParameters};
pub use trie::Trie;

/// Common imports for convenient usage.
pub mod prelude {
    pub use crate::aho_corasick::AhoCorasick;
    pub use crate::automaton::{Candidate, SearchAutomaton, StateAttribute};
    pub use crate::fsm::{Fsm, StateId, TransitionMap};
    pub use crate::levenshtein::{levenshtein, levenshtein_with, Cost, LevenshteinParameters};
    pub use crate::trie::Trie;
}
