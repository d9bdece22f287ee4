//! Benchmarks for automaton construction and the four query kinds.
//!
//! The corpus is a seeded random word list so runs are reproducible.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};

use triematch::prelude::*;

const WORD_COUNT: usize = 1_000;

fn generate_words(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Word lengths in natural language are roughly log-normal with
    // 1.1 <= mu <= 1.3 and 0.6 <= sigma <= 0.8.
    let length_distribution: LogNormal<f64> =
        LogNormal::new(1.2, 0.7).expect("valid log-normal parameters");
    let mut words = std::collections::HashSet::new();
    while words.len() < count {
        let length = (length_distribution.sample(&mut rng).round() as usize).max(1);
        let word: String = (0..length)
            .map(|_| (b'a' + rng.gen_range(0..26)) as char)
            .collect();
        words.insert(word);
    }
    let mut words: Vec<String> = words.into_iter().collect();
    words.sort();
    words
}

fn word_pairs(words: &[String]) -> Vec<(std::vec::IntoIter<char>, u32)> {
    words
        .iter()
        .enumerate()
        .map(|(id, word)| (word.chars().collect::<Vec<_>>().into_iter(), id as u32))
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let words = generate_words(WORD_COUNT, 42);

    let mut group = c.benchmark_group("construction");
    group.throughput(Throughput::Elements(WORD_COUNT as u64));

    group.bench_function("trie", |b| {
        b.iter(|| Trie::<char, u32>::from_pairs(word_pairs(black_box(&words))))
    });
    group.bench_function("aho_corasick", |b| {
        b.iter(|| AhoCorasick::<char, u32>::from_pairs(word_pairs(black_box(&words))))
    });

    group.finish();
}

fn bench_fuzzy_find(c: &mut Criterion) {
    let words = generate_words(WORD_COUNT, 42);
    let trie = Trie::<char, u32>::from_pairs(word_pairs(&words));
    let queries: Vec<&String> = words.iter().step_by(97).collect();

    let mut group = c.benchmark_group("fuzzy_find");
    group.throughput(Throughput::Elements(queries.len() as u64));

    for distance in [1usize, 2, 3] {
        group.bench_with_input(
            BenchmarkId::from_parameter(distance),
            &distance,
            |b, &distance| {
                b.iter(|| {
                    let mut found = 0usize;
                    for query in &queries {
                        found += trie
                            .find_levenshtein(levenshtein(distance), query.chars())
                            .count();
                    }
                    black_box(found)
                })
            },
        );
    }

    group.finish();
}

fn bench_exact_and_prefix(c: &mut Criterion) {
    let words = generate_words(WORD_COUNT, 42);
    let trie = Trie::<char, u32>::from_pairs(word_pairs(&words));
    let queries: Vec<&String> = words.iter().step_by(13).collect();

    let mut group = c.benchmark_group("walks");
    group.throughput(Throughput::Elements(queries.len() as u64));

    group.bench_function("exact_find", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for query in &queries {
                found += usize::from(trie.find(query.chars()).is_some());
            }
            black_box(found)
        })
    });

    group.bench_function("prefix_enumeration", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for query in &queries {
                let prefix = &query[..query.len().min(3)];
                found += trie.find_prefix(prefix.chars()).count();
            }
            black_box(found)
        })
    });

    group.finish();
}

fn bench_substring_matching(c: &mut Criterion) {
    let words = generate_words(WORD_COUNT, 42);
    let automaton = AhoCorasick::<char, u32>::from_pairs(word_pairs(&words));

    let text: String = {
        let mut rng = StdRng::seed_from_u64(7);
        (0..10_000)
            .map(|_| (b'a' + rng.gen_range(0..26)) as char)
            .collect()
    };

    let mut group = c.benchmark_group("substring_matching");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("match_text", |b| {
        b.iter(|| black_box(automaton.matches(text.chars()).count()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_fuzzy_find,
    bench_exact_and_prefix,
    bench_substring_matching
);
criterion_main!(benches);
