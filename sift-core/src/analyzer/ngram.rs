//! N-gram extraction.
//!
//! Provides sliding windows of `n` consecutive tokens over a cleaned token
//! sequence. Windows never cross document boundaries.

use smallvec::SmallVec;

use crate::NgramSize;

/// A contiguous run of tokens. Inline up to four tokens.
pub type Ngram = SmallVec<[String; 4]>;

/// Extracts n-grams from `tokens` using a sliding window.
///
/// For a sequence of length `len`, exactly `max(0, len - n + 1)` n-grams are
/// emitted, in order.
///
/// # Example
///
/// ```
/// use sift_core::analyzer::extract_ngrams;
/// use sift_types::NgramSize;
///
/// let tokens = ["great", "food", "terrible"].map(String::from);
/// let bigrams = extract_ngrams(&tokens, NgramSize::new(2).unwrap());
///
/// assert_eq!(bigrams.len(), 2); // (great, food), (food, terrible)
/// ```
pub fn extract_ngrams<S: AsRef<str>>(tokens: &[S], n: NgramSize) -> Vec<Ngram> {
    let mut out = Vec::with_capacity(count_ngrams(tokens.len(), n));
    for_each_ngram(tokens, n, |window| {
        out.push(window.iter().map(|t| t.as_ref().to_owned()).collect());
    });
    out
}

/// Calls `callback` with every window of `n` tokens, without allocating.
#[inline(always)]
pub fn for_each_ngram<S, F>(tokens: &[S], n: NgramSize, mut callback: F)
where
    F: FnMut(&[S]),
{
    let n = n.get();
    if tokens.len() < n {
        return;
    }
    for window in tokens.windows(n) {
        callback(window);
    }
}

/// Number of n-grams in a sequence of `len` tokens.
#[inline(always)]
pub fn count_ngrams(len: usize, n: NgramSize) -> usize {
    (len + 1).saturating_sub(n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NgramSize {
        NgramSize::new(n).unwrap()
    }

    fn tokens(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_owned).collect()
    }

    #[test]
    fn bigrams_of_four_tokens() {
        let grams = extract_ngrams(&tokens("great food terrible service"), size(2));
        let grams: Vec<Vec<&str>> = grams
            .iter()
            .map(|g| g.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            grams,
            vec![
                vec!["great", "food"],
                vec!["food", "terrible"],
                vec!["terrible", "service"],
            ]
        );
    }

    #[test]
    fn short_sequence_yields_nothing() {
        assert!(extract_ngrams(&tokens("one two"), size(3)).is_empty());
        assert!(extract_ngrams::<String>(&[], size(2)).is_empty());
    }

    #[test]
    fn exactly_n_tokens() {
        let grams = extract_ngrams(&tokens("a b c"), size(3));
        assert_eq!(grams.len(), 1);
        assert_eq!(grams[0].as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn unigram_windows_are_the_tokens() {
        let grams = extract_ngrams(&tokens("a b c"), size(1));
        assert_eq!(grams.len(), 3);
    }

    #[test]
    fn count_matches_extraction() {
        for len in 0..8 {
            let t: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            for n in 1..5 {
                assert_eq!(extract_ngrams(&t, size(n)).len(), count_ngrams(len, size(n)));
            }
        }
    }

    #[test]
    fn for_each_borrows_windows() {
        let t = tokens("x y z");
        let mut seen = 0;
        for_each_ngram(&t, size(2), |w| {
            assert_eq!(w.len(), 2);
            seen += 1;
        });
        assert_eq!(seen, 2);
    }
}
