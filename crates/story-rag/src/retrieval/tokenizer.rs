//! Term extraction shared by indexing and querying

use once_cell::sync::Lazy;
use regex::Regex;

/// Word tokens of two or more word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("unreachable error: invalid token pattern"));

/// Lowercase `text` and split it into terms, in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
