// Text normalization — turns free text into a canonical token sequence.
//
// Steps, in order: lowercase, strip everything that is not [a-z0-9] or
// whitespace, tokenize on whitespace, drop English stopwords, then reduce
// each token to a stem (Snowball English) or a lemma (rule-based noun
// suffix reduction). Deterministic: same input and flag always produce the
// same sequence, order preserved, no dedup.

use std::collections::HashSet;
use std::sync::OnceLock;

use rust_stemmers::{Algorithm, Stemmer};

use crate::extract::TopicBlock;

/// A topic block with heading and content reduced to token sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBlock {
    pub heading: Vec<String>,
    pub content: Vec<String>,
}

fn stopwords() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| {
        stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .collect()
    })
}

/// Normalize one text string into content tokens.
///
/// `use_stemming` selects Snowball stemming over the default lemmatization.
/// Empty or punctuation-only input yields an empty sequence, never an error.
pub fn normalize(text: &str, use_stemming: bool) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let stop = stopwords();
    let stemmer = use_stemming.then(|| Stemmer::create(Algorithm::English));

    cleaned
        .split_whitespace()
        .filter(|token| !stop.contains(*token))
        .map(|token| match &stemmer {
            Some(stemmer) => stemmer.stem(token).into_owned(),
            None => lemmatize(token),
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Normalize extracted topic blocks one-to-one.
pub fn normalize_blocks(blocks: &[TopicBlock], use_stemming: bool) -> Vec<NormalizedBlock> {
    blocks
        .iter()
        .map(|block| NormalizedBlock {
            heading: normalize(&block.heading, use_stemming),
            content: normalize(&block.content, use_stemming),
        })
        .collect()
}

/// Normalize extracted question units one-to-one.
pub fn normalize_questions(questions: &[String], use_stemming: bool) -> Vec<Vec<String>> {
    questions
        .iter()
        .map(|question| normalize(question, use_stemming))
        .collect()
}

/// Reduce an English token to its dictionary base form.
///
/// Rule-based noun suffix reduction in the spirit of WordNet's morphy rules
/// (there is no WordNet-backed lemmatizer in the Rust ecosystem). Longest
/// suffix wins; the plain trailing-s rule is guarded so tokens like "class"
/// or "virus" survive. Already-reduced tokens pass through unchanged.
fn lemmatize(token: &str) -> String {
    const SUFFIX_RULES: [(&str, &str); 7] = [
        ("ches", "ch"),
        ("shes", "sh"),
        ("ies", "y"),
        ("ses", "s"),
        ("xes", "x"),
        ("zes", "z"),
        ("men", "man"),
    ];

    for (suffix, replacement) in SUFFIX_RULES {
        if token.len() > suffix.len() + 1 {
            if let Some(stem) = token.strip_suffix(suffix) {
                return format!("{stem}{replacement}");
            }
        }
    }

    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(normalize("", false).is_empty());
        assert!(normalize("", true).is_empty());
    }

    #[test]
    fn punctuation_only_input_yields_empty_sequence() {
        assert!(normalize("!!! ... ??? ---", false).is_empty());
        assert!(normalize("!!! ... ??? ---", true).is_empty());
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        let tokens = normalize("Dijkstra's Algorithm!", false);
        // The apostrophe is stripped, leaving "dijkstras", which the lemma
        // rules then reduce.
        assert_eq!(tokens, vec!["dijkstra", "algorithm"]);
    }

    #[test]
    fn digits_are_kept() {
        let tokens = normalize("chapter 12 covers b+trees", false);
        assert!(tokens.contains(&"12".to_string()));
        assert!(tokens.contains(&"btrees".to_string()) || tokens.contains(&"btree".to_string()));
    }

    #[test]
    fn stopwords_are_removed() {
        let tokens = normalize("the heap is a tree", false);
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(tokens.contains(&"heap".to_string()));
        assert!(tokens.contains(&"tree".to_string()));
    }

    #[test]
    fn lemmatization_reduces_plurals() {
        assert_eq!(lemmatize("topics"), "topic");
        assert_eq!(lemmatize("classes"), "class");
        assert_eq!(lemmatize("queries"), "query");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("women"), "woman");
    }

    #[test]
    fn lemmatization_guards_false_plurals() {
        assert_eq!(lemmatize("class"), "class");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("bus"), "bus");
        assert_eq!(lemmatize("analysis"), "analysis");
    }

    #[test]
    fn stemming_differs_from_lemmatization() {
        // Snowball strips -ing; the lemma rules only handle noun plurals.
        let stemmed = normalize("sorting algorithms", true);
        let lemmed = normalize("sorting algorithms", false);
        assert_eq!(stemmed, vec!["sort", "algorithm"]);
        assert_eq!(lemmed, vec!["sorting", "algorithm"]);
    }

    #[test]
    fn order_is_preserved_and_no_dedup() {
        let tokens = normalize("heap tree heap", false);
        assert_eq!(tokens, vec!["heap", "tree", "heap"]);
    }

    #[test]
    fn normalization_is_stable_on_its_own_output() {
        let first = normalize("Sorting algorithms and hash tables", false);
        let rejoined = first.join(" ");
        let second = normalize(&rejoined, false);
        assert_eq!(first, second);
    }

    #[test]
    fn blocks_normalize_one_to_one() {
        let blocks = vec![
            TopicBlock {
                heading: "Sorting Algorithms".to_string(),
                content: "Quicksort partitions the array.".to_string(),
            },
            TopicBlock {
                heading: "Hashing".to_string(),
                content: String::new(),
            },
        ];
        let normalized = normalize_blocks(&blocks, false);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].heading, vec!["sorting", "algorithm"]);
        assert!(normalized[1].content.is_empty());
    }
}
