//! Interactive word-suggestion demo.
//!
//! Builds a substring-matching automaton over the distinct words of a
//! line-oriented index file, then answers queries from stdin with
//! fuzzy-prefix matches ranked by a distance/position weight.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use triematch::levenshtein::levenshtein;
use triematch::AhoCorasick;

#[derive(Parser)]
#[command(
    name = "suggest",
    about = "Suggest index words close to each query word"
)]
struct Args {
    /// Index file, one document per line.
    index: PathBuf,

    /// Maximum number of candidates to print per query.
    max_candidates: usize,
}

struct Index {
    automaton: AhoCorasick<char, u32>,
    words: Vec<String>,
}

fn split_words(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(|c: char| c.is_whitespace() || c == ';' || c == '|')
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
}

fn build_index(path: &Path) -> Result<Index> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut words: Vec<String> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        for word in split_words(&line) {
            if seen.insert(word.clone()) {
                words.push(word);
            }
        }
    }

    let automaton = AhoCorasick::from_pairs(
        words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.chars().collect::<Vec<_>>().into_iter(), id as u32)),
    );

    Ok(Index { automaton, words })
}

struct Suggestion<'a> {
    word: &'a str,
    distance_weight: f64,
    position_weight: f64,
    exact: bool,
}

fn suggest<'a>(index: &'a Index, query: &str) -> Vec<Suggestion<'a>> {
    let query_length = query.chars().count() as f64;

    let mut suggestions: Vec<Suggestion<'a>> = index
        .automaton
        .find_prefix_levenshtein(levenshtein(1.0), query.chars())
        .into_iter()
        .map(|candidate| {
            let word = index.words[*candidate.value as usize].as_str();
            let matched = query
                .chars()
                .zip(word.chars())
                .take_while(|(left, right)| left == right)
                .count();
            Suggestion {
                word,
                distance_weight: (query_length - candidate.distance) / query_length,
                position_weight: (matched as f64 + 1.0) / (query_length + 1.0),
                exact: query == word,
            }
        })
        .collect();

    suggestions.sort_by(|left, right| {
        (
            right.distance_weight,
            right.position_weight,
            right.exact,
        )
            .partial_cmp(&(left.distance_weight, left.position_weight, left.exact))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    suggestions
}

fn run() -> Result<()> {
    let args = Args::parse();

    let start = Instant::now();
    let index = build_index(&args.index)?;
    println!(
        "indexed {} words in {:.3} s",
        index.words.len(),
        start.elapsed().as_secs_f64()
    );

    println!("enter a word:");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading query")?;
        let query = line.trim().to_lowercase();
        if query.is_empty() {
            continue;
        }

        let start = Instant::now();
        let suggestions = suggest(&index, &query);
        let elapsed = start.elapsed();

        let total = suggestions.len();
        for suggestion in suggestions.into_iter().take(args.max_candidates) {
            writeln!(
                stdout,
                "\t{:.2}\t{:.2}\t{}\t{}",
                suggestion.distance_weight,
                suggestion.position_weight,
                u8::from(suggestion.exact),
                suggestion.word
            )?;
        }
        writeln!(stdout, "\t----\n\twords found: {total}")?;
        writeln!(stdout, "\t----\n\tquery time: {:.6} s", elapsed.as_secs_f64())?;
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        process::exit(1);
    }
}
