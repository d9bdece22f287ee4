//! Property-based cross-validation of the automaton walks against
//! naive reference implementations.

use proptest::prelude::*;
use triematch::prelude::*;

fn word_strategy() -> impl Strategy<Value = String> {
    "[abc]{0,8}"
}

fn dictionary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{1,6}", 1..=8)
}

fn naive_levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (i, left_symbol) in left.iter().enumerate() {
        current[0] = i + 1;
        for (j, right_symbol) in right.iter().enumerate() {
            let substitution = usize::from(left_symbol != right_symbol);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + substitution);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

fn build_trie(words: &[String]) -> Trie<char, usize> {
    Trie::from_pairs(
        words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.chars().collect::<Vec<_>>().into_iter(), id)),
    )
}

proptest! {
    /// Every reported distance equals the naive Wagner-Fischer distance
    /// between the query and the key owning the payload, and every key
    /// within the limit is reported exactly once.
    #[test]
    fn fuzzy_find_agrees_with_the_naive_distance(
        words in dictionary_strategy(),
        query in word_strategy(),
        limit in 0usize..4,
    ) {
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();
        let trie = build_trie(&distinct);

        let mut found: Vec<(usize, usize)> = trie
            .find_levenshtein(levenshtein(limit), query.chars())
            .map(|candidate| (*candidate.value, candidate.distance))
            .collect();
        found.sort_unstable();

        let mut expected: Vec<(usize, usize)> = distinct
            .iter()
            .enumerate()
            .map(|(id, word)| (id, naive_levenshtein(&query, word)))
            .filter(|(_, distance)| *distance <= limit)
            .collect();
        expected.sort_unstable();

        prop_assert_eq!(found, expected);
    }

    /// Exact lookup agrees with a linear scan of the batch.
    #[test]
    fn exact_find_agrees_with_a_linear_scan(
        words in dictionary_strategy(),
        query in word_strategy(),
    ) {
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();
        let trie = build_trie(&distinct);

        let expected = distinct.iter().position(|word| *word == query);
        prop_assert_eq!(trie.find(query.chars()).copied(), expected);
    }

    /// Prefix enumeration emits exactly the keys beginning with the
    /// prefix.
    #[test]
    fn prefix_enumeration_agrees_with_a_linear_scan(
        words in dictionary_strategy(),
        prefix in "[abc]{0,4}",
    ) {
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();
        let trie = build_trie(&distinct);

        let mut found: Vec<usize> = trie.find_prefix(prefix.chars()).copied().collect();
        found.sort_unstable();

        let mut expected: Vec<usize> = distinct
            .iter()
            .enumerate()
            .filter(|(_, word)| word.starts_with(&prefix))
            .map(|(id, _)| id)
            .collect();
        expected.sort_unstable();

        prop_assert_eq!(found, expected);
    }

    /// Substring matching agrees with a naive scan over every text
    /// position, occurrence counts included.
    #[test]
    fn substring_matching_agrees_with_a_naive_scan(
        words in dictionary_strategy(),
        text in "[abc]{0,16}",
    ) {
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();

        let automaton: AhoCorasick<char, usize> = AhoCorasick::from_pairs(
            distinct
                .iter()
                .enumerate()
                .map(|(id, word)| (word.chars().collect::<Vec<_>>().into_iter(), id)),
        );

        let mut found: Vec<usize> = automaton.matches(text.chars()).copied().collect();
        found.sort_unstable();

        let mut expected: Vec<usize> = Vec::new();
        for (id, word) in distinct.iter().enumerate() {
            for at in 0..=text.len().saturating_sub(word.len()) {
                if text[at..].starts_with(word.as_str()) {
                    expected.push(id);
                }
            }
        }
        expected.sort_unstable();

        prop_assert_eq!(found, expected);
    }

    /// Permuting the input batch never changes any query answer.
    #[test]
    fn queries_are_independent_of_insertion_order(
        words in dictionary_strategy(),
        query in word_strategy(),
    ) {
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();

        let forward: Trie<char, String> = Trie::from_pairs(
            distinct
                .iter()
                .map(|word| (word.chars().collect::<Vec<_>>().into_iter(), word.clone())),
        );
        let backward: Trie<char, String> = Trie::from_pairs(
            distinct
                .iter()
                .rev()
                .map(|word| (word.chars().collect::<Vec<_>>().into_iter(), word.clone())),
        );

        prop_assert_eq!(forward.len(), backward.len());
        prop_assert_eq!(forward.find(query.chars()), backward.find(query.chars()));

        let mut forward_close: Vec<(String, usize)> = forward
            .find_levenshtein(levenshtein(2), query.chars())
            .map(|candidate| (candidate.value.clone(), candidate.distance))
            .collect();
        forward_close.sort_unstable();
        let mut backward_close: Vec<(String, usize)> = backward
            .find_levenshtein(levenshtein(2), query.chars())
            .map(|candidate| (candidate.value.clone(), candidate.distance))
            .collect();
        backward_close.sort_unstable();

        prop_assert_eq!(forward_close, backward_close);
    }
}
