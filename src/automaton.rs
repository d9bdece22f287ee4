//! The shared search engine: a payload-carrying prefix tree.
//!
//! [`SearchAutomaton`] owns the automaton, the per-state attribute
//! records, the payload store and the reachable-value cache, and
//! implements every query that does not need suffix links: exact
//! lookup, prefix enumeration, and the two fuzzy searches driven by a
//! Wagner-Fischer column walk. It is generic over the attribute record
//! so the Aho-Corasick overlay can extend states with suffix links
//! while reusing all of the machinery here.
//!
//! Everything is built once from an input batch and is read-only
//! afterwards; queries take `&self` and any number of them may run
//! concurrently.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::fsm::{Fsm, StateId, TransitionMap};
use crate::levenshtein::{
    fill_row, seed_row, Cost, DeletionOrInsertionPenalty, LevenshteinParameters,
    ReplacementPenalty,
};

/// Per-state attribute record of the engine.
///
/// The plain trie needs one bit (is this state accepting?); the
/// Aho-Corasick overlay extends the record with suffix links. The
/// engine only ever touches the accept bit.
pub trait StateAttribute: Default {
    /// Whether some key terminates at this state.
    fn is_accept(&self) -> bool;

    /// Mark this state as accepting. Never unset afterwards.
    fn set_accept(&mut self);
}

/// A fuzzy-search result: a borrowed payload and its edit distance
/// from the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a, V, D> {
    /// The payload of the matched key.
    pub value: &'a V,
    /// Edit distance between the query and the matched key (or key
    /// prefix, for prefix searches) under the supplied cost functions.
    pub distance: D,
}

/// Pool of Wagner-Fischer row buffers.
///
/// The column walk allocates one row per visited state; recycling the
/// buffers keeps the walk to a handful of allocations per query. LIFO
/// reuse, capped so a deep walk cannot pin memory indefinitely.
struct RowPool<D> {
    rows: Vec<Vec<D>>,
}

impl<D: Cost> RowPool<D> {
    const MAX_POOLED: usize = 32;

    fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn acquire(&mut self, len: usize) -> Vec<D> {
        match self.rows.pop() {
            Some(mut row) => {
                row.clear();
                row.resize(len, D::ZERO);
                row
            }
            None => vec![D::ZERO; len],
        }
    }

    fn release(&mut self, row: Vec<D>) {
        if self.rows.len() < Self::MAX_POOLED {
            self.rows.push(row);
        }
    }
}

/// The generic prefix-tree search engine.
///
/// `T` is the symbol type, `V` the payload type, `A` the per-state
/// attribute record and `M` the transition-table representation.
/// Use the [`Trie`](crate::trie::Trie) alias or the
/// [`AhoCorasick`](crate::aho_corasick::AhoCorasick) wrapper instead of
/// naming this type directly unless you are plugging in your own
/// transition map.
#[derive(Clone, Debug)]
pub struct SearchAutomaton<T, V, A, M = BTreeMap<T, StateId>> {
    pub(crate) fsm: Fsm<T, M>,
    pub(crate) attributes: Vec<A>,
    pub(crate) reachable: Vec<SmallVec<[u32; 4]>>,
    pub(crate) values: Vec<V>,
    pub(crate) value_indices: FxHashMap<StateId, u32>,
}

impl<T, V, A, M> SearchAutomaton<T, V, A, M>
where
    A: StateAttribute,
    M: TransitionMap<T>,
{
    /// Create an empty engine: one root state, no keys.
    pub fn new() -> Self {
        Self {
            fsm: Fsm::new(),
            attributes: vec![A::default()],
            reachable: vec![SmallVec::new()],
            values: Vec::new(),
            value_indices: FxHashMap::default(),
        }
    }

    /// Build an engine from `(sequence, payload)` pairs.
    ///
    /// When the same key appears more than once, the first binding wins
    /// and later occurrences are silently dropped.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: IntoIterator<Item = T>,
    {
        let mut automaton = Self::new();
        for (sequence, value) in pairs {
            automaton.insert(sequence, value);
        }
        debug_assert_eq!(automaton.attributes.len(), automaton.fsm.state_count());
        debug_assert_eq!(automaton.reachable.len(), automaton.fsm.state_count());
        automaton
    }

    /// Insert one key, extending the automaton along its path and
    /// annotating every state on the path with the new value index.
    pub(crate) fn insert<S: IntoIterator<Item = T>>(&mut self, sequence: S, value: V) {
        let mut state = self.fsm.root();
        let mut path = vec![state];
        for symbol in sequence {
            state = match self.fsm.next(state, &symbol) {
                Some(next) => next,
                None => {
                    let (next, inserted) = self.fsm.add_transition(state, symbol);
                    debug_assert!(inserted);
                    self.attributes.push(A::default());
                    self.reachable.push(SmallVec::new());
                    next
                }
            };
            path.push(state);
        }

        if self.attributes[state as usize].is_accept() {
            return;
        }
        let index = self.values.len() as u32;
        self.values.push(value);
        self.value_indices.insert(state, index);
        self.attributes[state as usize].set_accept();
        for visited in path {
            self.reachable[visited as usize].push(index);
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the engine holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of automaton states, root included.
    pub fn state_count(&self) -> usize {
        self.fsm.state_count()
    }

    /// Iterate over the payloads in key insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Walk the automaton along `sequence` from the root; `Some(state)`
    /// if the whole sequence was consumed.
    pub(crate) fn traverse<I>(&self, sequence: I) -> Option<StateId>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut state = self.fsm.root();
        for symbol in sequence {
            state = self.fsm.next(state, symbol.borrow())?;
        }
        Some(state)
    }

    /// The payload of the accepting state `state`.
    pub(crate) fn value_of(&self, state: StateId) -> &V {
        debug_assert!(self.attributes[state as usize].is_accept());
        &self.values[self.value_indices[&state] as usize]
    }

    /// Exact key lookup.
    ///
    /// Returns the payload bound to `sequence`, or `None` when the
    /// sequence is not a key of this engine.
    pub fn find<I>(&self, sequence: I) -> Option<&V>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let state = self.traverse(sequence)?;
        let index = self.value_indices.get(&state)?;
        Some(&self.values[*index as usize])
    }

    /// Enumerate the payloads of every key beginning with `prefix`.
    ///
    /// Output-linear: the reachable-value cache of the state the prefix
    /// leads to is emitted directly, in cache (key insertion) order.
    /// Empty when no key starts with the prefix.
    pub fn find_prefix<I>(&self, prefix: I) -> PrefixMatches<'_, V>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        const EMPTY: &[u32] = &[];
        let indices = match self.traverse(prefix) {
            Some(state) => self.reachable[state as usize].iter(),
            None => EMPTY.iter(),
        };
        PrefixMatches {
            values: &self.values,
            indices,
        }
    }

    /// Fuzzy whole-key search by generalized Levenshtein distance.
    ///
    /// Lazily yields a [`Candidate`] for every key whose distance from
    /// `query` under `parameters` does not exceed the distance limit.
    /// Each key is yielded at most once; the order is unspecified.
    ///
    /// The walk carries one Wagner-Fischer row per visited state and
    /// prunes a subtree as soon as every entry of the current row
    /// exceeds the limit.
    pub fn find_levenshtein<I, D, F, G>(
        &self,
        parameters: LevenshteinParameters<D, F, G>,
        query: I,
    ) -> FuzzyMatches<'_, T, V, A, M, D, F, G>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        T: Clone,
        D: Cost,
        F: DeletionOrInsertionPenalty<T, D>,
        G: ReplacementPenalty<T, D>,
    {
        let query: Vec<T> = query.into_iter().map(|s| s.borrow().clone()).collect();
        FuzzyMatches {
            walker: CloseStates::new(self, parameters, query),
        }
    }

    /// Fuzzy prefix search by generalized Levenshtein distance.
    ///
    /// Finds every state whose spelt sequence is within the distance
    /// limit of `query` and emits all keys reachable from it, each at
    /// the distance of that state. Results are de-duplicated by value
    /// identity, keeping the smallest observed distance; their order is
    /// unspecified.
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
        let query: Vec<T> = query.into_iter().map(|s| s.borrow().clone()).collect();
        let mut walker = CloseStates::new(self, parameters, query);

        let mut found: Vec<(u32, D)> = Vec::new();
        while let Some((state, distance)) = walker.next_close() {
            for &index in self.reachable[state as usize].iter() {
                found.push((index, distance));
            }
        }

        // Keep the smallest distance seen for each value index.
        found.sort_by(|left, right| {
            left.0.cmp(&right.0).then(
                left.1
                    .partial_cmp(&right.1)
                    .unwrap_or(Ordering::Equal),
            )
        });
        found.dedup_by_key(|entry| entry.0);

        found
            .into_iter()
            .map(|(index, distance)| Candidate {
                value: &self.values[index as usize],
                distance,
            })
            .collect()
    }
}

impl<T, V, A, M> Default for SearchAutomaton<T, V, A, M>
where
    A: StateAttribute,
    M: TransitionMap<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the payloads reachable from a prefix.
///
/// Created by [`SearchAutomaton::find_prefix`]; yields borrowed
/// payloads in key insertion order.
#[derive(Clone, Debug)]
pub struct PrefixMatches<'a, V> {
    values: &'a [V],
    indices: std::slice::Iter<'a, u32>,
}

impl<'a, V> Iterator for PrefixMatches<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices
            .next()
            .map(|&index| &self.values[index as usize])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<V> ExactSizeIterator for PrefixMatches<'_, V> {}

/// Depth-first Wagner-Fischer walk over the automaton.
///
/// Yields `(state, distance)` for every state whose last-column cost is
/// within the distance limit; both fuzzy searches are layered on top of
/// this. Descent into a subtree is skipped when every entry of the
/// current row already exceeds the limit.
struct CloseStates<'a, T, V, A, M, D, F, G> {
    automaton: &'a SearchAutomaton<T, V, A, M>,
    parameters: LevenshteinParameters<D, F, G>,
    query: Vec<T>,
    stack: Vec<(StateId, Vec<D>)>,
    pool: RowPool<D>,
}

impl<'a, T, V, A, M, D, F, G> CloseStates<'a, T, V, A, M, D, F, G>
where
    A: StateAttribute,
    M: TransitionMap<T>,
    D: Cost,
    F: DeletionOrInsertionPenalty<T, D>,
    G: ReplacementPenalty<T, D>,
{
    fn new(
        automaton: &'a SearchAutomaton<T, V, A, M>,
        parameters: LevenshteinParameters<D, F, G>,
        query: Vec<T>,
    ) -> Self {
        let mut row = vec![D::ZERO; query.len() + 1];
        seed_row(&parameters, &query, &mut row);
        Self {
            automaton,
            parameters,
            query,
            stack: vec![(automaton.fsm.root(), row)],
            pool: RowPool::new(),
        }
    }

    fn next_close(&mut self) -> Option<(StateId, D)> {
        let limit = self.parameters.distance_limit;
        while let Some((source, row)) = self.stack.pop() {
            if row.iter().any(|cost| *cost <= limit) {
                let automaton = self.automaton;
                let stack = &mut self.stack;
                let pool = &mut self.pool;
                let parameters = &self.parameters;
                let query = &self.query;
                automaton
                    .fsm
                    .visit_transitions(source, |_, symbol, destination| {
                        let mut destination_row = pool.acquire(row.len());
                        fill_row(parameters, query, &row, symbol, &mut destination_row);
                        stack.push((destination, destination_row));
                    });
            }

            let distance = row[row.len() - 1];
            self.pool.release(row);
            if distance <= limit {
                return Some((source, distance));
            }
        }
        None
    }
}

/// Lazy iterator over fuzzy whole-key matches.
///
/// Created by [`SearchAutomaton::find_levenshtein`].
pub struct FuzzyMatches<'a, T, V, A, M, D, F, G> {
    walker: CloseStates<'a, T, V, A, M, D, F, G>,
}

impl<'a, T, V, A, M, D, F, G> Iterator for FuzzyMatches<'a, T, V, A, M, D, F, G>
where
    A: StateAttribute,
    M: TransitionMap<T>,
    D: Cost,
    F: DeletionOrInsertionPenalty<T, D>,
    G: ReplacementPenalty<T, D>,
{
    type Item = Candidate<'a, V, D>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((state, distance)) = self.walker.next_close() {
            let automaton = self.walker.automaton;
            if automaton.attributes[state as usize].is_accept() {
                return Some(Candidate {
                    value: automaton.value_of(state),
                    distance,
                });
            }
        }
        None
    }
}
