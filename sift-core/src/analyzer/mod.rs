//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Folds case, expands contractions and reduces raw text
//!   to lowercase ASCII words
//! - **Tokenizer**: Splits normalized text into tokens
//! - **Tagger / Lemmatizer**: Reduce each token to its lemma
//! - **Stop words**: Filter function words out of the term counts
//! - **N-gram**: Sliding windows over the cleaned token sequence

pub mod contractions;
pub mod lemmatizer;
pub mod ngram;
pub mod normalizer;
pub mod stopwords;
pub mod tagger;
pub mod tokenizer;

use std::borrow::Cow;
use std::fmt;

use rustc_hash::FxHashMap;

pub use contractions::ContractionMap;
pub use lemmatizer::{LemmaPos, Lemmatizer, RuleLemmatizer};
pub use ngram::{extract_ngrams, Ngram};
pub use normalizer::TextNormalizer;
pub use stopwords::StopWords;
pub use tagger::{SuffixTagger, TagMap, Tagger};
pub use tokenizer::Tokenizer;

/// Per-document (or merged per-group) term frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts(FxHashMap<String, u32>);

impl TermCounts {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `term`.
    pub fn add(&mut self, term: &str) {
        self.add_n(term, 1);
    }

    /// Adds `n` occurrences of `term`.
    pub fn add_n(&mut self, term: &str, n: u32) {
        if let Some(count) = self.0.get_mut(term) {
            *count += n;
        } else {
            self.0.insert(term.to_owned(), n);
        }
    }

    /// Adds every count of `other` into this counter.
    pub fn merge(&mut self, other: &TermCounts) {
        for (term, &n) in &other.0 {
            self.add_n(term, n);
        }
    }

    /// Count of `term`, zero if absent.
    #[inline]
    pub fn get(&self, term: &str) -> u32 {
        self.0.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no term was counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().map(|&n| n as u64).sum()
    }

    /// Iterates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(t, &n)| (t.as_str(), n))
    }

    /// Terms sorted alphabetically, for deterministic output.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl<'a> FromIterator<&'a str> for TermCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = Self::new();
        for term in iter {
            counts.add(term);
        }
        counts
    }
}

impl serde::Serialize for TermCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sorted())
    }
}

/// Tokenizer/lemmatizer adapter.
///
/// Holds the immutable lexical resources of a run (stop words, tag map,
/// tagger and lemmatizer) and turns normalized text into the cleaned token
/// sequence plus its term counts.
pub struct Analyzer {
    stop_words: StopWords,
    tag_map: TagMap,
    tagger: Box<dyn Tagger>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("stop_words", &self.stop_words.len())
            .field("tag_map", &self.tag_map)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Creates an analyzer using the built-in tagger and lemmatizer.
    pub fn new(stop_words: StopWords) -> Self {
        Self::with_components(
            stop_words,
            TagMap::default(),
            Box::new(SuffixTagger::new()),
            Box::new(RuleLemmatizer::new()),
        )
    }

    /// Creates an analyzer with caller-supplied tagging and lemmatization.
    pub fn with_components(
        stop_words: StopWords,
        tag_map: TagMap,
        tagger: Box<dyn Tagger>,
        lemmatizer: Box<dyn Lemmatizer>,
    ) -> Self {
        Self {
            stop_words,
            tag_map,
            tagger,
            lemmatizer,
        }
    }

    /// Stop words applied by this analyzer.
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Splits `text` into tokens, lemmatizes each one with its coarse POS and
    /// drops stop words.
    ///
    /// Any whitespace separates tokens and tokens are lowercased before the
    /// stop-word lookup, so raw text is accepted as well as the output of
    /// [`TextNormalizer::normalize`]. Empty input yields an empty sequence and
    /// empty counts.
    pub fn tokenize_and_lemmatize(&self, text: &str) -> (Vec<String>, TermCounts) {
        let mut tokens = Vec::new();
        let mut counts = TermCounts::new();

        let text = tidy(text);
        Tokenizer::new().tokenize(&text, |token| {
            if self.stop_words.contains(token) {
                return;
            }
            let tag = self.tagger.tag(token);
            let pos = self.tag_map.resolve(tag);
            let lemma = self.lemmatizer.lemmatize(token, pos);
            if lemma.is_empty() || self.stop_words.contains(&lemma) {
                return;
            }
            counts.add(&lemma);
            tokens.push(lemma.into_owned());
        });

        (tokens, counts)
    }
}

/// Brings `text` into the [`Tokenizer`] input shape: lowercase words joined
/// by single spaces. Normalizer output is borrowed unchanged.
fn tidy(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let ready = bytes.first() != Some(&b' ')
        && bytes.last() != Some(&b' ')
        && !text.contains("  ")
        && !text
            .chars()
            .any(|c| c.is_uppercase() || (c.is_whitespace() && c != ' '));
    if ready {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> Analyzer {
        Analyzer::new(StopWords::english(stopwords::DEFAULT_RETAINED))
    }

    #[test]
    fn empty_input_yields_nothing() {
        let (tokens, counts) = analyzer().tokenize_and_lemmatize("");
        assert!(tokens.is_empty());
        assert!(counts.is_empty());
    }

    #[test]
    fn drops_stop_words_and_keeps_negation() {
        let (tokens, _) =
            analyzer().tokenize_and_lemmatize("i can not believe it is not butter");
        assert_eq!(tokens, ["not", "believe", "not", "butter"]);
    }

    #[test]
    fn lemmatizes_with_pos() {
        let (tokens, counts) =
            analyzer().tokenize_and_lemmatize("we loved the burgers and ordered fries");
        assert_eq!(tokens, ["love", "burger", "order", "fry"]);
        assert_eq!(counts.get("burger"), 1);
    }

    #[test]
    fn counts_match_tokens() {
        let (tokens, counts) =
            analyzer().tokenize_and_lemmatize("pizza pizza pasta pizzas");
        assert_eq!(tokens, ["pizza", "pizza", "pasta", "pizza"]);
        assert_eq!(counts.get("pizza"), 3);
        assert_eq!(counts.get("pasta"), 1);
        assert_eq!(counts.total(), tokens.len() as u64);
    }

    #[test]
    fn never_returns_stop_word() {
        let a = analyzer();
        let text = "this was the best of all the places we have been to and they were very nice";
        let (tokens, _) = a.tokenize_and_lemmatize(text);
        for t in &tokens {
            assert!(!a.stop_words().contains(t), "stop word {t} leaked");
        }
    }

    #[test]
    fn lemma_that_becomes_stop_word_is_dropped() {
        // "others" lemmatizes to "other", which is a stop word
        let (tokens, _) = analyzer().tokenize_and_lemmatize("others loved dinner");
        assert_eq!(tokens, ["love", "dinner"]);
    }

    #[test]
    fn raw_text_is_tidied_before_lookup() {
        let a = analyzer();
        let (tokens, counts) = a.tokenize_and_lemmatize("  The GREAT\tfood   was\nNot bad ");
        assert_eq!(tokens, ["great", "food", "not", "bad"]);
        assert_eq!(counts.get("food"), 1);

        let (tokens, _) = a.tokenize_and_lemmatize("The food");
        assert_eq!(tokens, ["food"]);

        let (tokens, _) = a.tokenize_and_lemmatize(" \t ");
        assert!(tokens.is_empty());
    }

    #[test]
    fn tidy_borrows_normalized_text() {
        assert!(matches!(tidy("great food"), Cow::Borrowed("great food")));
        assert_eq!(tidy(" Great  Food "), "great food");
    }

    #[test]
    fn term_counts_merge_and_sort() {
        let mut a: TermCounts = ["b", "a", "b"].into_iter().collect();
        let b: TermCounts = ["a", "c"].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.sorted(), vec![("a", 2), ("b", 2), ("c", 1)]);
        assert_eq!(a.total(), 5);
    }

    #[test]
    fn term_counts_serialize_sorted() {
        let counts: TermCounts = ["zest", "apple", "zest"].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&counts).unwrap(),
            r#"{"apple":1,"zest":2}"#
        );
    }
}
