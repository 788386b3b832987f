//! Dictionary-free lemmatization.
//!
//! [`RuleLemmatizer`] reduces inflected English words to a base form given a
//! coarse word class. Irregular forms are looked up in per-class exception
//! tables; regular forms go through suffix detachment followed by stem repair
//! (undoubling `stopp` → `stop`, restoring a silent `e` in `lov` → `love`).

use std::borrow::Cow;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Coarse word class used to pick lemmatization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LemmaPos {
    /// Plural suffixes are stripped.
    Noun,
    /// Tense and participle suffixes are stripped.
    Verb,
    /// Comparative and superlative suffixes are stripped.
    Adjective,
    /// Only irregular forms change.
    Adverb,
}

impl LemmaPos {
    #[inline]
    const fn index(self) -> usize {
        match self {
            LemmaPos::Noun => 0,
            LemmaPos::Verb => 1,
            LemmaPos::Adjective => 2,
            LemmaPos::Adverb => 3,
        }
    }
}

/// Reduces a token to its lemma under a given word class.
pub trait Lemmatizer: Send + Sync {
    /// Lemma of `token`. Returns the token itself when no rule applies.
    fn lemmatize<'a>(&self, token: &'a str, pos: LemmaPos) -> Cow<'a, str>;
}

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("brownies", "brownie"), ("calories", "calorie"), ("calves", "calf"),
    ("children", "child"), ("cookies", "cookie"), ("dies", "die"), ("feet", "foot"),
    ("foodies", "foodie"), ("geese", "goose"), ("goodies", "goodie"),
    ("halves", "half"), ("knives", "knife"), ("leaves", "leaf"), ("lies", "lie"),
    ("lives", "life"), ("loaves", "loaf"), ("men", "man"), ("menus", "menu"),
    ("mice", "mouse"), ("movies", "movie"), ("pies", "pie"), ("rookies", "rookie"),
    ("selfies", "selfie"), ("selves", "self"), ("shelves", "shelf"),
    ("smoothies", "smoothie"), ("teeth", "tooth"), ("thieves", "thief"),
    ("ties", "tie"), ("veggies", "veggie"), ("wives", "wife"), ("wolves", "wolf"),
    ("women", "woman"), ("series", "series"), ("species", "species"), ("news", "news"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("added", "add"), ("am", "be"), ("are", "be"), ("ate", "eat"), ("became", "become"),
    ("been", "be"), ("began", "begin"), ("being", "be"), ("bought", "buy"),
    ("brought", "bring"), ("came", "come"), ("chose", "choose"), ("chosen", "choose"),
    ("cut", "cut"), ("did", "do"), ("does", "do"), ("done", "do"), ("drank", "drink"),
    ("drunk", "drink"), ("dying", "die"), ("eaten", "eat"), ("fed", "feed"),
    ("fell", "fall"), ("felt", "feel"), ("forgot", "forget"), ("forgotten", "forget"),
    ("found", "find"), ("gave", "give"), ("given", "give"), ("gone", "go"),
    ("got", "get"), ("gotten", "get"), ("had", "have"), ("has", "have"),
    ("heard", "hear"), ("held", "hold"), ("is", "be"), ("kept", "keep"),
    ("knew", "know"), ("known", "know"), ("led", "lead"), ("left", "leave"),
    ("lost", "lose"), ("lying", "lie"), ("made", "make"), ("meant", "mean"),
    ("met", "meet"), ("paid", "pay"), ("ran", "run"), ("said", "say"), ("sat", "sit"),
    ("saw", "see"), ("seen", "see"), ("sent", "send"), ("sold", "sell"),
    ("spent", "spend"), ("stood", "stand"), ("taken", "take"), ("tasted", "taste"),
    ("tasting", "taste"), ("thought", "think"), ("told", "tell"), ("took", "take"),
    ("tying", "tie"), ("understood", "understand"), ("was", "be"), ("wasted", "waste"),
    ("went", "go"), ("were", "be"), ("written", "write"), ("wrote", "write"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("best", "good"), ("better", "good"), ("farther", "far"), ("farthest", "far"),
    ("further", "far"), ("furthest", "far"), ("worse", "bad"), ("worst", "bad"),
    ("bitter", "bitter"), ("clever", "clever"), ("honest", "honest"),
    ("modest", "modest"), ("proper", "proper"), ("super", "super"),
    ("tender", "tender"),
];

/// Suffix-stripping lemmatizer with irregular-form tables.
#[derive(Debug, Clone)]
pub struct RuleLemmatizer {
    exceptions: [FxHashMap<&'static str, &'static str>; 4],
}

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleLemmatizer {
    /// Creates a lemmatizer with the built-in exception tables.
    pub fn new() -> Self {
        let mut exceptions: [FxHashMap<&'static str, &'static str>; 4] = Default::default();
        let tables = [
            (LemmaPos::Noun, NOUN_EXCEPTIONS),
            (LemmaPos::Verb, VERB_EXCEPTIONS),
            (LemmaPos::Adjective, ADJECTIVE_EXCEPTIONS),
        ];
        for (pos, table) in tables {
            exceptions[pos.index()].extend(table.iter().copied());
        }
        Self { exceptions }
    }

    fn noun<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if word.len() <= 3 || ends_with_any(word, &["ss", "us", "is"]) {
            return Cow::Borrowed(word);
        }
        if ends_with_any(word, &["sses", "ches", "shes", "xes"]) {
            return Cow::Borrowed(&word[..word.len() - 2]);
        }
        if word.len() > 4 && word.ends_with("ies") {
            return Cow::Owned(format!("{}y", &word[..word.len() - 3]));
        }
        if word.len() > 5 && word.ends_with("oes") {
            return Cow::Borrowed(&word[..word.len() - 2]);
        }
        if let Some(stem) = word.strip_suffix('s') {
            return Cow::Borrowed(stem);
        }
        Cow::Borrowed(word)
    }

    fn verb<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if word.len() <= 3 {
            return Cow::Borrowed(word);
        }
        if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
            if stem.len() >= 2 {
                return Cow::Owned(format!("{stem}y"));
            }
        }
        if word.ends_with("eed") {
            return if word.len() <= 5 {
                Cow::Borrowed(word)
            } else {
                Cow::Borrowed(&word[..word.len() - 1])
            };
        }
        for suffix in ["ing", "ed"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() >= 2 && has_vowel(stem) {
                    return repair_stem(stem);
                }
                return Cow::Borrowed(word);
            }
        }
        if ends_with_any(word, &["sses", "ches", "shes", "xes", "oes"]) {
            return Cow::Borrowed(&word[..word.len() - 2]);
        }
        if word.ends_with('s') && !word.ends_with("ss") {
            return Cow::Borrowed(&word[..word.len() - 1]);
        }
        Cow::Borrowed(word)
    }

    fn adjective<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if word.len() <= 4 {
            return Cow::Borrowed(word);
        }
        if let Some(stem) = word.strip_suffix("iest").or_else(|| word.strip_suffix("ier")) {
            return Cow::Owned(format!("{stem}y"));
        }
        for suffix in ["est", "er"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() >= 3 && has_vowel(stem) {
                    return repair_stem(stem);
                }
            }
        }
        Cow::Borrowed(word)
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str, pos: LemmaPos) -> Cow<'a, str> {
        if let Some(&lemma) = self.exceptions[pos.index()].get(token) {
            return Cow::Borrowed(lemma);
        }
        match pos {
            LemmaPos::Noun => self.noun(token),
            LemmaPos::Verb => self.verb(token),
            LemmaPos::Adjective => self.adjective(token),
            LemmaPos::Adverb => Cow::Borrowed(token),
        }
    }
}

#[inline]
fn ends_with_any(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| word.ends_with(s))
}

#[inline]
const fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes().enumerate().any(|(i, b)| is_vowel(b) || (b == b'y' && i > 0))
}

fn syllables(stem: &str) -> usize {
    let mut count = 0;
    let mut in_group = false;
    for (i, b) in stem.bytes().enumerate() {
        let vowel = is_vowel(b) || (b == b'y' && i > 0);
        if vowel && !in_group {
            count += 1;
        }
        in_group = vowel;
    }
    count
}

/// Repairs a stem left behind by detaching `-ed`, `-ing`, `-er` or `-est`.
fn repair_stem(stem: &str) -> Cow<'_, str> {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    let last = bytes[n - 1];
    let prev = bytes[n - 2];

    if n >= 4 && last == prev && !is_vowel(last) && !matches!(last, b'l' | b's' | b'z' | b'f') {
        return Cow::Borrowed(&stem[..n - 1]);
    }
    if needs_silent_e(stem) {
        return Cow::Owned(format!("{stem}e"));
    }
    Cow::Borrowed(stem)
}

fn needs_silent_e(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    let last = bytes[n - 1];
    let prev = bytes[n - 2];

    match last {
        b'v' | b'u' | b'z' | b'c' => return true,
        b'g' if matches!(prev, b'd' | b'r') => return true,
        b's' if is_vowel(prev) => return true,
        _ => {}
    }

    // single-syllable consonant-vowel-consonant: mak, hop, din, writ
    if syllables(stem) != 1 || is_vowel(last) || matches!(last, b'w' | b'x' | b'y') {
        return false;
    }
    if !is_vowel(prev) {
        return false;
    }
    n == 2 || !is_vowel(bytes[n - 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str, pos: LemmaPos) -> String {
        RuleLemmatizer::new().lemmatize(word, pos).into_owned()
    }

    #[test]
    fn regular_plurals() {
        let cases = [
            ("burgers", "burger"),
            ("fries", "fry"),
            ("berries", "berry"),
            ("dishes", "dish"),
            ("sandwiches", "sandwich"),
            ("boxes", "box"),
            ("glasses", "glass"),
            ("prices", "price"),
            ("tomatoes", "tomato"),
            ("shoes", "shoe"),
            ("tacos", "taco"),
        ];
        for (word, expected) in cases {
            assert_eq!(lemma(word, LemmaPos::Noun), expected, "{word}");
        }
    }

    #[test]
    fn nouns_left_alone() {
        for word in ["glass", "menu", "bus", "gas", "octopus", "analysis", "pizza"] {
            assert_eq!(lemma(word, LemmaPos::Noun), word);
        }
    }

    #[test]
    fn irregular_nouns() {
        assert_eq!(lemma("children", LemmaPos::Noun), "child");
        assert_eq!(lemma("knives", LemmaPos::Noun), "knife");
        assert_eq!(lemma("cookies", LemmaPos::Noun), "cookie");
        assert_eq!(lemma("menus", LemmaPos::Noun), "menu");
    }

    #[test]
    fn regular_verbs() {
        let cases = [
            ("loved", "love"),
            ("ordered", "order"),
            ("waited", "wait"),
            ("served", "serve"),
            ("arrived", "arrive"),
            ("used", "use"),
            ("closed", "close"),
            ("stopped", "stop"),
            ("shopping", "shop"),
            ("getting", "get"),
            ("filled", "fill"),
            ("making", "make"),
            ("coming", "come"),
            ("dined", "dine"),
            ("tried", "try"),
            ("enjoyed", "enjoy"),
            ("visited", "visit"),
            ("recommended", "recommend"),
            ("eating", "eat"),
            ("danced", "dance"),
            ("judged", "judge"),
            ("agreed", "agree"),
            ("serves", "serve"),
            ("goes", "go"),
        ];
        for (word, expected) in cases {
            assert_eq!(lemma(word, LemmaPos::Verb), expected, "{word}");
        }
    }

    #[test]
    fn irregular_verbs() {
        assert_eq!(lemma("went", LemmaPos::Verb), "go");
        assert_eq!(lemma("ate", LemmaPos::Verb), "eat");
        assert_eq!(lemma("was", LemmaPos::Verb), "be");
        assert_eq!(lemma("added", LemmaPos::Verb), "add");
        assert_eq!(lemma("tasted", LemmaPos::Verb), "taste");
    }

    #[test]
    fn verb_without_vowel_stem_is_kept() {
        assert_eq!(lemma("spring", LemmaPos::Verb), "spring");
        assert_eq!(lemma("need", LemmaPos::Verb), "need");
        assert_eq!(lemma("feed", LemmaPos::Verb), "feed");
    }

    #[test]
    fn adjectives() {
        assert_eq!(lemma("better", LemmaPos::Adjective), "good");
        assert_eq!(lemma("worst", LemmaPos::Adjective), "bad");
        assert_eq!(lemma("biggest", LemmaPos::Adjective), "big");
        assert_eq!(lemma("nicest", LemmaPos::Adjective), "nice");
        assert_eq!(lemma("larger", LemmaPos::Adjective), "large");
        assert_eq!(lemma("cheaper", LemmaPos::Adjective), "cheap");
        assert_eq!(lemma("freshest", LemmaPos::Adjective), "fresh");
        assert_eq!(lemma("tastiest", LemmaPos::Adjective), "tasty");
        assert_eq!(lemma("tender", LemmaPos::Adjective), "tender");
        assert_eq!(lemma("great", LemmaPos::Adjective), "great");
    }

    #[test]
    fn adverbs_unchanged() {
        assert_eq!(lemma("quickly", LemmaPos::Adverb), "quickly");
        assert_eq!(lemma("best", LemmaPos::Adverb), "best");
    }

    #[test]
    fn pos_changes_result() {
        assert_eq!(lemma("loved", LemmaPos::Noun), "loved");
        assert_eq!(lemma("loved", LemmaPos::Verb), "love");
    }

    #[test]
    fn untouched_lemma_borrows() {
        let l = RuleLemmatizer::new();
        assert!(matches!(l.lemmatize("pizza", LemmaPos::Noun), Cow::Borrowed("pizza")));
    }
}
