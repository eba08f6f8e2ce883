//! Keyword Extractor: frequency-ranked stems of the significant words in a résumé.
//!
//! Informational only; nothing here feeds into scoring.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use crate::analysis::text::tokenize;

pub const MAX_KEYWORDS: usize = 10;

/// Tokens at or below this many characters are discarded.
const MIN_TOKEN_CHARS: usize = 3;

/// Common English stop words.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing",
    "during", "each", "few", "for", "from", "further", "get", "got", "has", "had", "he",
    "have", "her", "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it",
    "its", "itself", "like", "make", "many", "me", "might", "more", "most", "much", "must",
    "my", "myself", "never", "now", "of", "on", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "said", "same", "see", "should", "since", "so", "some",
    "still", "such", "take", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "way", "we", "well", "were", "what", "where", "when",
    "which", "while", "who", "whom", "with", "would", "why", "you", "your", "yours",
    "yourself",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Returns up to `MAX_KEYWORDS` stems ordered by descending frequency.
/// Ties keep first-occurrence order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let stemmer = Stemmer::create(Algorithm::English);

    // Insertion-ordered frequency table: `order` remembers first occurrence.
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for word in tokenize(&lower) {
        if word.chars().count() <= MIN_TOKEN_CHARS || is_stop_word(word) {
            continue;
        }

        let stem = stemmer.stem(word).into_owned();
        match index.get(&stem) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(stem.clone(), order.len());
                order.push((stem, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-occurrence order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(stem, _)| stem)
        .collect()
}
