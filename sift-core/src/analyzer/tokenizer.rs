//! Streaming Tokenizer Module
//!
//! This module provides a zero-allocation tokenizer that splits normalized review
//! text into word tokens. It's the second stage in our text processing pipeline,
//! taking clean, normalized text and breaking it into units for tagging and
//! lemmatization.
//!
//! ## What It Does
//!
//! Given normalized input like `"great food terrible service"`, it emits each word
//! in document order:
//!
//! ```ignore
//! "great"
//! "food"
//! "terrible"
//! "service"
//! ```
//!
//! ## Key Features
//!
//! - **Zero Allocation**: Tokens are slices of the original string, not new allocations
//! - **Streaming**: Uses a callback to emit tokens, no intermediate collection
//! - **Fast**: Simple byte-scan for ASCII space (0x20) splitting
//!
//! ## Usage
//!
//! ```rust
//! use sift_core::analyzer::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::new();
//!
//! // Tokens are emitted via callback - no allocation!
//! tokenizer.tokenize("great food", |text| {
//!     // Process token: text="great", then "food"
//! });
//! ```
//!
//! ## The Input Contract
//!
//! The tokenizer expects **pre-normalized** input, i.e. the output of
//! [`TextNormalizer`](crate::analyzer::TextNormalizer):
//! - ASCII-only text
//! - All lowercase
//! - No leading or trailing whitespace
//! - No consecutive spaces between words
//!
//! If you violate this contract, the tokenizer will panic in debug mode with a helpful message.
//! Callers holding arbitrary text go through
//! [`Analyzer::tokenize_and_lemmatize`](crate::analyzer::Analyzer::tokenize_and_lemmatize),
//! which tidies the input first.

use core::str;
use memchr::memchr_iter;

/// Streaming tokenizer - splits normalized text into tokens.
///
/// A lightweight, zero-allocation tokenizer that takes normalized text and
/// emits tokens one by one via a callback.
///
/// ## Example
///
/// ```
/// use sift_core::analyzer::tokenizer::Tokenizer;
///
/// let tokenizer = Tokenizer::new();
/// let mut count = 0;
///
/// tokenizer.tokenize("great food here", |_| {
///     count += 1;
/// });
///
/// assert_eq!(count, 3);
/// ```
///
/// ## How It Works
///
/// It does a single forward scan looking for ASCII space bytes (0x20).
/// Each non-space run between spaces becomes a token.
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits each token in order.
    #[inline(always)]
    #[allow(clippy::needless_lifetimes)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace, normalizer contract violated"
        );

        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace, normalizer contract violated"
        );

        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces, normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // SAFETY: `normalized` is valid UTF-8. We split only on ASCII space (0x20),
                // which is never a continuation byte, so `bytes[start..i]` is always a
                // valid UTF-8 subslice.
                emit(unsafe { str::from_utf8_unchecked(&bytes[start..i]) });
            }
            start = i + 1;
        }

        if start < bytes.len() {
            // SAFETY: same invariants as above. `bytes[start..]` is a valid UTF-8
            // subslice since `start` was set to `i + 1` after an ASCII space byte.
            emit(unsafe { str::from_utf8_unchecked(&bytes[start..]) });
        }
    }

    /// Collects the tokens of `normalized` into a vector of slices.
    pub fn split<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut out = Vec::new();
        self.tokenize(normalized, |text| out.push(text));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<&str> {
        Tokenizer::new().split(input)
    }

    #[test]
    fn single_word() {
        assert_eq!(collect("hello"), vec!["hello"]);
    }

    #[test]
    fn two_words() {
        let out = collect("great food");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], "great");
        assert_eq!(out[1], "food");
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn single_char_token() {
        assert_eq!(collect("a"), vec!["a"]);
    }

    #[test]
    fn tokens_are_slices_of_input() {
        let input = String::from("hello world");
        let base = input.as_ptr() as usize;
        let end = base + input.len();

        Tokenizer::new().tokenize(&input, |text| {
            let ptr = text.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn emit_order_is_left_to_right() {
        let words = ["one", "two", "three", "four"];
        let input = words.join(" ");
        let mut i = 0usize;

        Tokenizer::new().tokenize(&input, |text| {
            assert_eq!(text, words[i]);
            i += 1;
        });

        assert_eq!(i, words.len());
    }

    #[test]
    fn split_matches_whitespace_split() {
        let input = "i can not believe it is not butter";
        let expected: Vec<&str> = input.split(' ').collect();
        assert_eq!(Tokenizer::new().split(input), expected);
    }

    #[test]
    fn tokenizer_is_reusable() {
        let t = Tokenizer::new();

        let mut n = 0usize;
        t.tokenize("hello world", |_| n += 1);
        assert_eq!(n, 2);

        n = 0;
        t.tokenize("one two three", |_| n += 1);
        assert_eq!(n, 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "normalizer contract violated")]
    fn leading_space_panics_in_debug() {
        Tokenizer::new().tokenize(" hello", |_| {});
    }
}
