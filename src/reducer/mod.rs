//! Language-specific stopword removal and stemming.
//!
//! [`LinguisticReducer`] is the capability seam: the pipeline only needs
//! `remove_stopwords` followed by `stem`. [`IndonesianReducer`] is the bundled
//! implementation for Bahasa Indonesia.

mod roots;
mod stemmer;
mod stopwords;

use std::collections::HashSet;

pub use roots::INDONESIAN_ROOT_WORDS;
pub use stemmer::{is_root, stem_word};
pub use stopwords::INDONESIAN_STOPWORDS;

/// Stopword removal plus stemming over normalized text.
pub trait LinguisticReducer: Send + Sync {
    /// Drops stopwords, returning the surviving tokens joined by single spaces.
    fn remove_stopwords(&self, text: &str) -> String;

    /// Reduces every token to its stem, returning tokens joined by single spaces.
    fn stem(&self, text: &str) -> String;

    /// Runs stopword removal first, then stemming.
    ///
    /// The order is fixed: stemming can turn a content word into a form that
    /// collides with a stopword, and such words must survive.
    fn reduce(&self, text: &str) -> String {
        let filtered = self.remove_stopwords(text);
        self.stem(&filtered)
    }
}

/// Bahasa Indonesia reducer backed by a fixed stopword table and a
/// confix-stripping stemmer guarded by a root-word table.
#[derive(Debug, Clone)]
pub struct IndonesianReducer {
    stopwords: HashSet<&'static str>,
}

impl IndonesianReducer {
    /// Builds a reducer using the bundled stopword table.
    pub fn new() -> Self {
        Self {
            stopwords: INDONESIAN_STOPWORDS.iter().copied().collect(),
        }
    }

    /// Returns true when `word` is in the stopword table.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl Default for IndonesianReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl LinguisticReducer for IndonesianReducer {
    fn remove_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|word| !self.is_stopword(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn stem(&self, text: &str) -> String {
        text.split_whitespace()
            .map(stem_word)
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_stopwords_before_stemming() {
        let reducer = IndonesianReducer::new();
        assert_eq!(reducer.reduce("kucing itu lucu"), "kucing lucu");
        assert_eq!(
            reducer.reduce("dia sedang membaca buku di perpustakaan"),
            "sedang baca buku pustaka"
        );
    }

    #[test]
    fn stopword_removal_collapses_whitespace() {
        let reducer = IndonesianReducer::new();
        assert_eq!(reducer.remove_stopwords("  saya   dan  kamu "), "kamu");
    }

    #[test]
    fn empty_and_all_stopword_inputs_reduce_to_empty() {
        let reducer = IndonesianReducer::new();
        assert_eq!(reducer.reduce(""), "");
        assert_eq!(reducer.reduce("yang dan di dari"), "");
    }

    #[test]
    fn deterministic() {
        let reducer = IndonesianReducer::new();
        let text = "pembelajaran mereka sudah dimulaikan";
        assert_eq!(reducer.reduce(text), reducer.reduce(text));
    }

    #[test]
    fn usable_as_trait_object() {
        let reducer: Box<dyn LinguisticReducer> = Box::new(IndonesianReducer::default());
        assert_eq!(reducer.reduce("bukunya"), "buku");
    }
}
