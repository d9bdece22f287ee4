//! The plain prefix tree.
//!
//! [`Trie`] is the [`SearchAutomaton`] engine instantiated with the
//! one-bit attribute record: exact lookup, prefix enumeration and both
//! fuzzy searches, no substring matching. Use
//! [`AhoCorasick`](crate::aho_corasick::AhoCorasick) when substring
//! matching is needed.
//!
//! # Examples
//!
//! ```
//! use triematch::trie::Trie;
//!
//! let trie: Trie<char, i32> = Trie::from_pairs(vec![
//!     ("rust".chars(), 1),
//!     ("rustic".chars(), 2),
//!     ("trust".chars(), 3),
//! ]);
//!
//! assert_eq!(trie.find("rust".chars()), Some(&1));
//! assert_eq!(trie.find("rus".chars()), None);
//!
//! let mut with_prefix: Vec<i32> = trie.find_prefix("rust".chars()).copied().collect();
//! with_prefix.sort_unstable();
//! assert_eq!(with_prefix, vec![1, 2]);
//! ```

use std::collections::BTreeMap;

use crate::automaton::{SearchAutomaton, StateAttribute};
use crate::fsm::StateId;

/// Attribute record of a trie state: just the accept bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrieStateAttribute {
    is_accept: bool,
}

impl StateAttribute for TrieStateAttribute {
    fn is_accept(&self) -> bool {
        self.is_accept
    }

    fn set_accept(&mut self) {
        self.is_accept = true;
    }
}

/// A payload-carrying prefix tree.
///
/// See the [module documentation](self) for an overview and the engine
/// methods on [`SearchAutomaton`] for the full query surface.
pub type Trie<T, V, M = BTreeMap<T, StateId>> = SearchAutomaton<T, V, TrieStateAttribute, M>;
