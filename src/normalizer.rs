//! Text canonicalization applied to every answer before linguistic reduction.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes raw answer text into a comparable form.
///
/// Steps run in a fixed order:
/// 1. trim surrounding whitespace
/// 2. canonical decomposition (NFD) with combining marks dropped
/// 3. lowercase
/// 4. drop every character that is neither a word character nor whitespace
///
/// The result is trimmed once more so that stripped trailing punctuation does not
/// leave dangling whitespace behind; this keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    let stripped = strip_diacritics(text.trim());
    let lowered = stripped.to_lowercase();
    let cleaned = strip_punctuation(&lowered);
    cleaned.trim().to_string()
}

fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

fn strip_punctuation(input: &str) -> String {
    input
        .chars()
        .filter(|ch| is_word_char(*ch) || ch.is_whitespace())
        .collect()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
