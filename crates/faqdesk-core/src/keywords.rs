//! Keyword extraction.
//!
//! Splits text on runs of non-word characters (a word character is a
//! Unicode letter, a Unicode digit, or `_`), lowercases each token, and
//! drops stop words and tokens of two characters or fewer. Order and
//! duplicates are preserved; overlap scoring works on sets downstream.

use std::collections::HashSet;

/// Function words ignored during keyword extraction.
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "a", "an", "and", "or", "of", "to", "how", "do", "what", "can", "i", "my", "you",
    "we", "in", "on", "for", "are", "be", "it", "will", "did", "was",
];

/// Tokens must be strictly longer than this many characters.
const MIN_TOKEN_CHARS: usize = 2;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Extract content keywords from `text`, in order of appearance.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS && !is_stop_word(t))
        .collect()
}

/// Size of the set intersection between two keyword sequences.
pub fn overlap_count(a: &[String], b: &[String]) -> usize {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.intersection(&b).count()
}
