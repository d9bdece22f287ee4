//! Aho-Corasick overlay: multi-pattern substring matching.
//!
//! [`AhoCorasick`] is the [`SearchAutomaton`] engine with the attribute
//! record extended by a suffix link and an accepting-suffix link per
//! state. The links are computed by one breadth-first pass after the
//! trie is populated; they turn the trie into a matching automaton that
//! finds every dictionary key occurring anywhere in a text in a single
//! left-to-right scan. All trie queries remain available.
//!
//! # Examples
//!
//! ```
//! use triematch::aho_corasick::AhoCorasick;
//!
//! let automaton: AhoCorasick<char, i32> = AhoCorasick::from_pairs(vec![
//!     ("he".chars(), 1),
//!     ("she".chars(), 2),
//!     ("hers".chars(), 3),
//! ]);
//!
//! let mut found: Vec<i32> = automaton.matches("ushers".chars()).copied().collect();
//! found.sort_unstable();
//! assert_eq!(found, vec![1, 2, 3]);
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, VecDeque};

use crate::automaton::{
    Candidate, FuzzyMatches, PrefixMatches, SearchAutomaton, StateAttribute,
};
use crate::fsm::{Fsm, StateId, TransitionMap};
use crate::levenshtein::{Cost, DeletionOrInsertionPenalty, LevenshteinParameters, ReplacementPenalty};

/// Sentinel for an absent state reference.
const NO_STATE: StateId = StateId::MAX;

/// Attribute record of an Aho-Corasick state.
///
/// Extends the accept bit with the suffix link (always set after
/// construction; the root links to itself) and the accepting-suffix
/// link (the nearest accepting state strictly above this one along the
/// suffix-link chain, or unset when none exists).
#[derive(Clone, Copy, Debug)]
pub struct AhoCorasickStateAttribute {
    is_accept: bool,
    suffix_link: StateId,
    accept_suffix_link: StateId,
}

impl Default for AhoCorasickStateAttribute {
    fn default() -> Self {
        Self {
            is_accept: false,
            suffix_link: NO_STATE,
            accept_suffix_link: NO_STATE,
        }
    }
}

impl StateAttribute for AhoCorasickStateAttribute {
    fn is_accept(&self) -> bool {
        self.is_accept
    }

    fn set_accept(&mut self) {
        self.is_accept = true;
    }
}

/// Extended transition δ*: follow the edge labeled `symbol`, falling
/// back along suffix links until an edge is found or the root is
/// reached. Total: always returns a valid state.
///
/// Correct only once the suffix links of every state closer to the
/// root than `source` are populated; breadth-first construction order
/// guarantees that.
fn extended_next<T, M: TransitionMap<T>>(
    fsm: &Fsm<T, M>,
    attributes: &[AhoCorasickStateAttribute],
    mut source: StateId,
    symbol: &T,
) -> StateId {
    loop {
        if let Some(destination) = fsm.next(source, symbol) {
            return destination;
        }
        if fsm.is_root(source) {
            return fsm.root();
        }
        source = attributes[source as usize].suffix_link;
    }
}

/// A dictionary automaton with substring matching.
///
/// Construction inserts every `(sequence, payload)` pair into the
/// underlying trie and then computes the suffix links. The full trie
/// query surface (exact lookup, prefix enumeration, fuzzy search) is
/// re-exposed here unchanged; [`matches`](AhoCorasick::matches) is the
/// operation the overlay adds.
#[derive(Clone, Debug)]
pub struct AhoCorasick<T, V, M = BTreeMap<T, StateId>> {
    engine: SearchAutomaton<T, V, AhoCorasickStateAttribute, M>,
}

impl<T, V, M: TransitionMap<T>> AhoCorasick<T, V, M> {
    /// Create an empty automaton that matches nothing.
    pub fn new() -> Self {
        let mut automaton = Self {
            engine: SearchAutomaton::new(),
        };
        automaton.build_suffix_links();
        automaton
    }

    /// Build an automaton from `(sequence, payload)` pairs.
    ///
    /// Duplicate keys keep their first binding, as for
    /// [`Trie`](crate::trie::Trie).
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: IntoIterator<Item = T>,
    {
        let mut automaton = Self {
            engine: SearchAutomaton::from_pairs(pairs),
        };
        automaton.build_suffix_links();
        automaton
    }

    /// Compute suffix and accepting-suffix links by breadth-first
    /// traversal. Valid only on a fully populated trie.
    fn build_suffix_links(&mut self) {
        let SearchAutomaton {
            fsm, attributes, ..
        } = &mut self.engine;
        let fsm: &Fsm<T, M> = fsm;

        let root = fsm.root();
        attributes[root as usize].suffix_link = root;

        let mut queue = VecDeque::new();
        fsm.visit_transitions(root, |_, _, destination| {
            attributes[destination as usize].suffix_link = root;
            queue.push_back(destination);
        });

        while let Some(state) = queue.pop_front() {
            let state_suffix_link = attributes[state as usize].suffix_link;
            fsm.visit_transitions(state, |_, symbol, destination| {
                let link = extended_next(fsm, attributes, state_suffix_link, symbol);
                let (link_accepts, link_accept_suffix) = {
                    let link_attributes = &attributes[link as usize];
                    (link_attributes.is_accept, link_attributes.accept_suffix_link)
                };

                let destination_attributes = &mut attributes[destination as usize];
                destination_attributes.suffix_link = link;
                destination_attributes.accept_suffix_link = if link_accepts {
                    link
                } else {
                    link_accept_suffix
                };

                queue.push_back(destination);
            });
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Whether the automaton holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Number of automaton states, root included.
    pub fn state_count(&self) -> usize {
        self.engine.state_count()
    }

    /// Iterate over the payloads in key insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.engine.iter()
    }

    /// Exact key lookup. See [`SearchAutomaton::find`].
    pub fn find<I>(&self, sequence: I) -> Option<&V>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.engine.find(sequence)
    }

    /// Prefix enumeration. See [`SearchAutomaton::find_prefix`].
    pub fn find_prefix<I>(&self, prefix: I) -> PrefixMatches<'_, V>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.engine.find_prefix(prefix)
    }

    /// Fuzzy whole-key search. See [`SearchAutomaton::find_levenshtein`].
    pub fn find_levenshtein<I, D, F, G>(
        &self,
        parameters: LevenshteinParameters<D, F, G>,
        query: I,
    ) -> FuzzyMatches<'_, T, V, AhoCorasickStateAttribute, M, D, F, G>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        T: Clone,
        D: Cost,
        F: DeletionOrInsertionPenalty<T, D>,
        G: ReplacementPenalty<T, D>,
    {
        self.engine.find_levenshtein(parameters, query)
    }

    /// Fuzzy prefix search. See
    /// [`SearchAutomaton::find_prefix_levenshtein`].
    pub fn find_prefix_levenshtein<I, D, F, G>(
        &self,
        parameters: LevenshteinParameters<D, F, G>,
        query: I,
    ) -> Vec<Candidate<'_, V, D>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        T: Clone,
        D: Cost,
        F: DeletionOrInsertionPenalty<T, D>,
        G: ReplacementPenalty<T, D>,
    {
        self.engine.find_prefix_levenshtein(parameters, query)
    }

    /// Find every dictionary key occurring as a contiguous substring of
    /// `text`.
    ///
    /// Lazily yields the payload of each occurrence, in ascending order
    /// of text position; the order of several keys ending at the same
    /// position is unspecified. A key occurring `k` times is yielded
    /// `k` times.
    pub fn matches<I>(&self, text: I) -> Matches<'_, T, V, M, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        Matches {
            automaton: self,
            text: text.into_iter(),
            state: self.engine.fsm.root(),
            emit: NO_STATE,
        }
    }
}

impl<T, V, M: TransitionMap<T>> Default for AhoCorasick<T, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over substring matches.
///
/// Created by [`AhoCorasick::matches`]. Advances the automaton one
/// text symbol at a time and drains the accepting-suffix-link chain of
/// every state it lands on.
pub struct Matches<'a, T, V, M, I> {
    automaton: &'a AhoCorasick<T, V, M>,
    text: I,
    state: StateId,
    emit: StateId,
}

impl<'a, T, V, M, I> Iterator for Matches<'a, T, V, M, I>
where
    M: TransitionMap<T>,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.emit != NO_STATE {
                let state = self.emit;
                self.emit =
                    self.automaton.engine.attributes[state as usize].accept_suffix_link;
                return Some(self.automaton.engine.value_of(state));
            }

            let symbol = self.text.next()?;
            let engine = &self.automaton.engine;
            self.state =
                extended_next(&engine.fsm, &engine.attributes, self.state, symbol.borrow());
            let attribute = &engine.attributes[self.state as usize];
            self.emit = if attribute.is_accept {
                self.state
            } else {
                attribute.accept_suffix_link
            };
        }
    }
}
