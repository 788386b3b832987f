use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::analyzer::contractions::ContractionMap;

#[inline(always)]
const fn is_kept(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9')
}

/// Review text normalizer.
///
/// Performs the following operations, in this order:
/// - Converts all characters to lowercase (Unicode-aware)
/// - Expands contractions through the [`ContractionMap`]
/// - Maps typographic characters (curly quotes, dashes, ellipses, exotic
///   spaces) to ASCII equivalents
/// - Strips diacritical marks and transliterates what is left to ASCII
/// - Replaces everything except `[a-z0-9]` with spaces, collapses runs of
///   spaces and trims both ends
///
/// Each step assumes the previous one ran: contractions must be expanded
/// while apostrophes still exist, and accents must be removed before the
/// final filter or accented letters would be dropped with the punctuation.
///
/// The output is the input contract of [`crate::analyzer::Tokenizer`] and is
/// a fixed point: normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use sift_core::analyzer::{ContractionMap, TextNormalizer};
///
/// let normalizer = TextNormalizer::new(ContractionMap::from_pairs([("can't", "can not")]));
/// assert_eq!(normalizer.normalize("I CAN'T wait — café!"), "i can not wait cafe");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    contractions: ContractionMap,
}

impl TextNormalizer {
    /// Creates a new normalizer using the given contraction table.
    pub fn new(contractions: ContractionMap) -> Self {
        Self { contractions }
    }

    /// The contraction table in use.
    pub fn contractions(&self) -> &ContractionMap {
        &self.contractions
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        let lowered = input.to_lowercase();
        let expanded = self.contractions.expand(&lowered);
        let transformed = transform_characters(&expanded);
        let ascii = strip_accents(&transformed);
        remove_characters_into(&ascii, out);
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Maps typographic characters to their ASCII counterparts.
pub fn transform_characters(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{02BC}' => {
                out.push('\'')
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
            | '\u{00BB}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => {
                out.push(' ')
            }
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' => {}
            '\u{2022}' | '\u{00B7}' | '\u{2027}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Removes diacritics and transliterates the remaining text to ASCII.
///
/// Characters with no ASCII rendering become spaces so that they still
/// separate the words around them.
pub fn strip_accents(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfkd() {
        if c.is_ascii() {
            out.push(c);
        } else if is_combining_mark(c) {
            continue;
        } else if let Some(folded) = fold_to_ascii(c) {
            out.push_str(folded);
        } else {
            out.push(' ');
        }
    }
    out
}

/// Drops every byte other than `[a-z0-9]`, collapsing the gaps into single
/// spaces with no leading or trailing space.
pub fn remove_characters(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    remove_characters_into(input, &mut out);
    out
}

fn remove_characters_into(input: &str, out: &mut String) {
    out.clear();
    out.reserve(input.len());

    let mut pending_space = false;
    for &b in input.as_bytes() {
        if is_kept(b) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(b as char);
        } else {
            pending_space = true;
        }
    }
}

/// Latin letters that have no canonical decomposition.
#[inline(always)]
fn fold_to_ascii(c: char) -> Option<&'static str> {
    let folded = match c {
        'ß' | 'ẞ' => "ss",
        'Æ' | 'æ' => "ae",
        'Œ' | 'œ' => "oe",
        'Ø' | 'ø' => "o",
        'Ł' | 'ł' => "l",
        'Ð' | 'ð' | 'Đ' | 'đ' => "d",
        'Þ' | 'þ' => "th",
        'ı' => "i",
        'Ħ' | 'ħ' => "h",
        'Ŧ' | 'ŧ' => "t",
        'Ŋ' | 'ŋ' => "ng",
        'ĸ' => "k",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        TextNormalizer::default().normalize(input)
    }

    fn norm_contractions(input: &str) -> String {
        TextNormalizer::new(ContractionMap::from_pairs([
            ("can't", "can not"),
            ("it's", "it is"),
            ("he'd", "he had / he would"),
        ]))
        .normalize(input)
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("HeLlO"), "hello");
        assert_eq!(norm("123 ABC!"), "123 abc");
    }

    #[test]
    fn ascii_full_alphabet() {
        let upper: String = (b'A'..=b'Z').map(|b| b as char).collect();
        let lower: String = (b'a'..=b'z').map(|b| b as char).collect();
        assert_eq!(norm(&upper), lower);
    }

    #[test]
    fn punctuation_becomes_separator() {
        assert_eq!(norm("foo-bar_baz"), "foo bar baz");
        assert_eq!(norm("great food,terrible service."), "great food terrible service");
    }

    #[test]
    fn whitespace_collapse() {
        assert_eq!(norm("hello   world"), "hello world");
        assert_eq!(norm("hello\t\nworld"), "hello world");
        assert_eq!(norm("hello \r\n world"), "hello world");
    }

    #[test]
    fn leading_and_trailing_whitespace_removed() {
        assert_eq!(norm("   hello"), "hello");
        assert_eq!(norm("hello   "), "hello");
        assert_eq!(norm(" ... hello !!! "), "hello");
    }

    #[test]
    fn only_whitespace_or_punctuation() {
        assert_eq!(norm("   "), "");
        assert_eq!(norm("\n\t\r"), "");
        assert_eq!(norm("?!..."), "");
    }

    #[test]
    fn empty_input() {
        assert_eq!(norm(""), "");
    }

    #[test]
    fn contractions_expanded_before_punctuation_removed() {
        assert_eq!(
            norm_contractions("I can't believe it's not butter!"),
            "i can not believe it is not butter"
        );
    }

    #[test]
    fn uppercase_contraction_matches_after_case_fold() {
        assert_eq!(norm_contractions("CAN'T"), "can not");
    }

    #[test]
    fn curly_apostrophe_contraction() {
        assert_eq!(norm_contractions("It\u{2019}s great"), "it is great");
    }

    #[test]
    fn expansion_punctuation_removed() {
        assert_eq!(norm_contractions("he'd"), "he had he would");
    }

    #[test]
    fn unknown_contraction_split_on_apostrophe() {
        assert_eq!(norm_contractions("the chef's special"), "the chef s special");
    }

    #[test]
    fn typographic_characters() {
        assert_eq!(transform_characters("a\u{2014}b"), "a-b");
        assert_eq!(transform_characters("\u{201C}hi\u{201D}"), "\"hi\"");
        assert_eq!(transform_characters("wait\u{2026}"), "wait...");
        assert_eq!(transform_characters("a\u{00A0}b"), "a b");
        assert_eq!(transform_characters("a\u{200B}b"), "ab");
        assert_eq!(norm("good\u{2014}really good"), "good really good");
    }

    #[test]
    fn basic_diacritic_strip() {
        assert_eq!(norm("café"), "cafe");
        assert_eq!(norm("Müller"), "muller");
        assert_eq!(norm("São"), "sao");
        assert_eq!(norm("jalapeño crème brûlée"), "jalapeno creme brulee");
    }

    #[test]
    fn extended_latin_strip() {
        assert_eq!(norm("Český"), "cesky");
        assert_eq!(norm("Żółć"), "zolc");
        assert_eq!(norm("ŠĐĆŽčđ"), "sdczcd");
    }

    #[test]
    fn non_decomposing_letters_folded() {
        assert_eq!(norm("straße"), "strasse");
        assert_eq!(norm("Łódź"), "lodz");
        assert_eq!(norm("smørrebrød"), "smorrebrod");
        assert_eq!(norm("œuf"), "oeuf");
    }

    #[test]
    fn combining_diacritics_removed() {
        assert_eq!(norm("caf\u{0301}e"), "cafe");
    }

    #[test]
    fn compatibility_characters_decomposed() {
        assert_eq!(norm("ﬁne"), "fine");
        assert_eq!(norm("½ price"), "1 2 price");
    }

    #[test]
    fn non_latin_scripts_become_separators() {
        assert_eq!(norm("great🍕food"), "great food");
        assert_eq!(norm("sushi 寿司 bar"), "sushi bar");
        assert_eq!(norm("ПРИВЕТ"), "");
    }

    #[test]
    fn output_is_ascii_alnum_and_single_spaces() {
        let inputs = [
            "Hello, World!",
            "café — naïve façade",
            "İstanbul kebab",
            "ΠΡΟΒΛΗΜΑ",
            "mixed\u{00A0}spaces\u{2003}here",
            "tabs\tand\nnewlines",
        ];

        for input in inputs {
            let out = norm(input);
            assert!(!out.starts_with(' ') && !out.ends_with(' '));
            assert!(!out.contains("  "));
            assert!(out.bytes().all(|b| b == b' ' || is_kept(b)), "{out:?}");
        }
    }

    #[test]
    fn idempotent() {
        let n = TextNormalizer::new(ContractionMap::from_pairs([
            ("can't", "can not"),
            ("'s", "is"),
        ]));
        let samples = [
            "hello world",
            "foo   bar",
            "ÜBER Café",
            "I can't — won't!",
            "Müller's São Paulo; straße…",
            "",
            "  \u{201C}quoted\u{201D}  ",
        ];

        for s in samples {
            let once = n.normalize(s);
            let twice = n.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn normalize_into_overwrites_buffer() {
        let normalizer = TextNormalizer::default();
        let mut buf = String::from("stale contents");

        normalizer.normalize_into("HELLO", &mut buf);
        assert_eq!(buf, "hello");

        normalizer.normalize_into("", &mut buf);
        assert_eq!(buf, "");
    }

    #[test]
    fn very_long_ascii() {
        let input = "A".repeat(10000);
        let out = norm(&input);
        assert_eq!(out.len(), 10000);
        assert!(out.chars().all(|c| c == 'a'));
    }
}
