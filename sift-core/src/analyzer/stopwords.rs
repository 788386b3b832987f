//! Stop-word set.
//!
//! Built once per run: the base English list, minus a small set of words
//! that carry sentiment in reviews, plus caller-supplied extensions.

use rustc_hash::FxHashSet;

pub use sift_types::DEFAULT_RETAINED_STOP_WORDS as DEFAULT_RETAINED;

/// Base English stop-word list (179 words).
pub const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him",
    "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its",
    "itself", "they", "them", "their", "theirs", "themselves", "what", "which", "who",
    "whom", "this", "that", "that'll", "these", "those", "am", "is", "are", "was",
    "were", "be", "been", "being", "have", "has", "had", "having", "do", "does", "did",
    "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few",
    "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same",
    "so", "than", "too", "very", "s", "t", "can", "will", "just", "don", "don't",
    "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Lowercase words excluded from term counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: FxHashSet<String>,
}

impl StopWords {
    /// The base English list without the `retained` words.
    pub fn english<S: AsRef<str>>(retained: &[S]) -> Self {
        let retained: FxHashSet<&str> = retained.iter().map(AsRef::as_ref).collect();
        let words = ENGLISH
            .iter()
            .filter(|w| !retained.contains(*w))
            .map(|w| (*w).to_owned())
            .collect();
        Self { words }
    }

    /// Adds every non-blank line of `lines`, trimmed and lowercased.
    pub fn extend_from_lines(&mut self, lines: &str) {
        for line in lines.lines() {
            let word = line.trim();
            if !word.is_empty() {
                self.words.insert(word.to_lowercase());
            }
        }
    }

    /// Builder form of [`StopWords::extend_from_lines`].
    pub fn with_lines(mut self, lines: &str) -> Self {
        self.extend_from_lines(lines);
        self
    }

    /// Adds a single word.
    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    /// Exact lookup; callers pass lowercase words.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the set filters nothing.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_list_size() {
        assert_eq!(ENGLISH.len(), 179);
        let all = StopWords::english::<&str>(&[]);
        assert_eq!(all.len(), 179);
    }

    #[test]
    fn retained_words_are_removed() {
        let sw = StopWords::english(DEFAULT_RETAINED);
        assert_eq!(sw.len(), 173);
        for w in DEFAULT_RETAINED {
            assert!(!sw.contains(w));
        }
        assert!(sw.contains("the"));
        assert!(sw.contains("i"));
    }

    #[test]
    fn extensions_trimmed_and_lowercased() {
        let sw = StopWords::english(DEFAULT_RETAINED).with_lines("  Restaurant \n\nFOOD\r\n");
        assert!(sw.contains("restaurant"));
        assert!(sw.contains("food"));
        assert!(!sw.contains(""));
        assert_eq!(sw.len(), 175);
    }

    #[test]
    fn extension_can_reintroduce_retained_word() {
        let mut sw = StopWords::english(&["not".to_owned()]);
        assert!(!sw.contains("not"));
        sw.insert("NOT");
        assert!(sw.contains("not"));
    }

    #[test]
    fn deterministic() {
        let a = StopWords::english(DEFAULT_RETAINED).with_lines("x\ny");
        let b = StopWords::english(DEFAULT_RETAINED).with_lines("y\nx");
        assert_eq!(a, b);
    }
}
