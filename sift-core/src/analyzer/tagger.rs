//! Part-of-speech tagging.
//!
//! The lemmatizer only needs a coarse word class, so a tag is reduced to its
//! first character and looked up in the [`TagMap`]. Tags follow the Penn
//! Treebank convention (`JJ`, `NNS`, `VBD`, `RB`, ...), which lets any
//! external tagger producing those tags plug in through [`Tagger`].

use rustc_hash::FxHashMap;

use crate::analyzer::lemmatizer::LemmaPos;

/// Assigns a Penn Treebank style tag to a single normalized token.
pub trait Tagger: Send + Sync {
    /// Tag for `token`.
    fn tag(&self, token: &str) -> &str;
}

/// Tag-prefix → lemmatizer word class. Fixed, four entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMap {
    entries: [(char, LemmaPos); 4],
}

impl Default for TagMap {
    fn default() -> Self {
        Self {
            entries: [
                ('J', LemmaPos::Adjective),
                ('N', LemmaPos::Noun),
                ('V', LemmaPos::Verb),
                ('R', LemmaPos::Adverb),
            ],
        }
    }
}

impl TagMap {
    /// Word class for `tag`, by its first character. Unmapped tags are nouns.
    #[inline]
    pub fn resolve(&self, tag: &str) -> LemmaPos {
        let Some(first) = tag.chars().next() else {
            return LemmaPos::Noun;
        };
        let first = first.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(prefix, _)| *prefix == first)
            .map_or(LemmaPos::Noun, |&(_, pos)| pos)
    }

    /// The four `(prefix, class)` entries.
    pub fn entries(&self) -> &[(char, LemmaPos); 4] {
        &self.entries
    }
}

const ADJECTIVES: &[&str] = &[
    "amazing", "appetizing", "authentic", "average", "awesome", "awful", "bad", "baked",
    "big", "bland", "boring", "busy", "charming", "cheap", "clean", "cold", "cozy",
    "crispy", "crowded", "decent", "delicious", "dirty", "disappointed", "disappointing",
    "dry", "early", "excellent", "excited", "exciting", "expensive", "experienced",
    "fancy", "fantastic", "fast", "favorite", "fine", "fresh", "fried", "friendly",
    "good", "great", "grilled", "happy", "horrible", "honest", "hot", "huge", "impressed",
    "interesting", "juicy", "large", "little", "lovely", "mediocre", "modest", "new", "nice",
    "okay", "old", "outstanding", "overcooked", "overpriced", "perfect", "pleased",
    "polite", "pretty", "quick", "reasonable", "roasted", "rude", "sad", "salty",
    "satisfied", "slow", "small", "smoked", "soggy", "sour", "spicy", "steamed",
    "stunning", "surprised", "sweet", "talented", "tasty", "tender", "terrible",
    "tired", "undercooked", "warm", "welcoming", "wonderful", "yummy",
];

const COMPARATIVES: &[&str] = &[
    "better", "bigger", "cheaper", "cleaner", "colder", "faster", "fresher", "greater",
    "hotter", "larger", "longer", "nicer", "slower", "smaller", "sweeter", "tastier",
    "warmer", "worse",
];

const SUPERLATIVES: &[&str] = &["best", "worst"];

const ADVERBS: &[&str] = &[
    "again", "almost", "already", "also", "always", "back", "definitely", "even",
    "ever", "maybe", "never", "often", "perhaps", "probably", "quite", "rather",
    "really", "sometimes", "soon", "still", "though", "together", "well", "yet",
];

const NOUNS: &[&str] = &[
    "anything", "bed", "breed", "building", "ceiling", "clothing", "contest", "dumpling",
    "evening", "everything", "family", "feed", "forest", "harvest", "hundred", "icing",
    "interest", "jelly", "meeting", "morning", "nothing", "pudding", "request", "seed",
    "something", "speed", "spring", "string", "stuffing", "thing", "topping", "wedding",
    "wing",
];

const VERBS: &[(&str, &str)] = &[
    ("am", "VBP"), ("are", "VBP"), ("ate", "VBD"), ("be", "VB"), ("became", "VBD"),
    ("been", "VBN"), ("bought", "VBD"), ("brought", "VBD"), ("came", "VBD"),
    ("come", "VB"), ("did", "VBD"), ("done", "VBN"), ("eat", "VB"), ("eaten", "VBN"),
    ("felt", "VBD"), ("found", "VBD"), ("gave", "VBD"), ("get", "VB"), ("give", "VB"),
    ("go", "VB"), ("gone", "VBN"), ("got", "VBD"), ("had", "VBD"), ("has", "VBZ"),
    ("have", "VBP"), ("is", "VBZ"), ("kept", "VBD"), ("knew", "VBD"), ("left", "VBD"),
    ("made", "VBD"), ("make", "VB"), ("paid", "VBD"), ("ran", "VBD"), ("said", "VBD"),
    ("sat", "VBD"), ("saw", "VBD"), ("seen", "VBN"), ("sent", "VBD"), ("spent", "VBD"),
    ("take", "VB"), ("taken", "VBN"), ("thought", "VBD"), ("told", "VBD"),
    ("took", "VBD"), ("was", "VBD"), ("went", "VBD"), ("were", "VBD"), ("wrote", "VBD"),
];

/// Lexicon-plus-suffix tagger.
///
/// Known words come from a small review-oriented lexicon; everything else is
/// tagged by its ending (`-ly` adverbs, `-ing`/`-ed` verb forms, common
/// adjective suffixes, `-s` plurals), and the remainder defaults to `NN`.
/// It looks at one token at a time and never at context.
#[derive(Debug, Clone)]
pub struct SuffixTagger {
    lexicon: FxHashMap<&'static str, &'static str>,
}

impl Default for SuffixTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixTagger {
    /// Creates a tagger with the built-in lexicon.
    pub fn new() -> Self {
        let mut lexicon = FxHashMap::default();
        let lists: [(&[&'static str], &'static str); 5] = [
            (NOUNS, "NN"),
            (ADVERBS, "RB"),
            (ADJECTIVES, "JJ"),
            (COMPARATIVES, "JJR"),
            (SUPERLATIVES, "JJS"),
        ];
        for (words, tag) in lists {
            for &word in words {
                lexicon.insert(word, tag);
            }
        }
        for &(word, tag) in VERBS {
            lexicon.insert(word, tag);
        }
        Self { lexicon }
    }

    fn tag_by_suffix(token: &str) -> &'static str {
        let len = token.len();
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return "CD";
        }
        if len > 4 && token.ends_with("ly") {
            return "RB";
        }
        if len > 5 && token.ends_with("ing") {
            return "VBG";
        }
        if len > 4 && token.ends_with("ed") && !token.ends_with("eed") {
            return "VBD";
        }
        if len > 5 && token.ends_with("est") {
            return "JJS";
        }
        const ADJECTIVE_SUFFIXES: [&str; 8] =
            ["ous", "ful", "ive", "able", "ible", "less", "ical", "ish"];
        if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| token.ends_with(s)) {
            return "JJ";
        }
        if len > 3 && token.ends_with('s') && !token.ends_with("ss") {
            return "NNS";
        }
        "NN"
    }
}

impl Tagger for SuffixTagger {
    fn tag(&self, token: &str) -> &str {
        self.lexicon
            .get(token)
            .copied()
            .unwrap_or_else(|| Self::tag_by_suffix(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_map_resolves_first_character() {
        let map = TagMap::default();
        assert_eq!(map.resolve("JJ"), LemmaPos::Adjective);
        assert_eq!(map.resolve("JJS"), LemmaPos::Adjective);
        assert_eq!(map.resolve("NNS"), LemmaPos::Noun);
        assert_eq!(map.resolve("VBD"), LemmaPos::Verb);
        assert_eq!(map.resolve("RB"), LemmaPos::Adverb);
        assert_eq!(map.resolve("rb"), LemmaPos::Adverb);
    }

    #[test]
    fn tag_map_defaults_to_noun() {
        let map = TagMap::default();
        assert_eq!(map.resolve("CD"), LemmaPos::Noun);
        assert_eq!(map.resolve("PRP"), LemmaPos::Noun);
        assert_eq!(map.resolve(""), LemmaPos::Noun);
        assert_eq!(map.entries().len(), 4);
    }

    #[test]
    fn lexicon_words() {
        let t = SuffixTagger::new();
        assert_eq!(t.tag("great"), "JJ");
        assert_eq!(t.tag("better"), "JJR");
        assert_eq!(t.tag("went"), "VBD");
        assert_eq!(t.tag("really"), "RB");
        assert_eq!(t.tag("morning"), "NN");
        assert_eq!(t.tag("amazing"), "JJ");
    }

    #[test]
    fn suffix_rules() {
        let t = SuffixTagger::new();
        assert_eq!(t.tag("quickly"), "RB");
        assert_eq!(t.tag("cooking"), "VBG");
        assert_eq!(t.tag("ordered"), "VBD");
        assert_eq!(t.tag("freshest"), "JJS");
        assert_eq!(t.tag("gorgeous"), "JJ");
        assert_eq!(t.tag("terrible"), "JJ");
        assert_eq!(t.tag("burgers"), "NNS");
        assert_eq!(t.tag("fries"), "NNS");
        assert_eq!(t.tag("service"), "NN");
        assert_eq!(t.tag("2019"), "CD");
    }

    #[test]
    fn short_words_are_not_suffix_tagged() {
        let t = SuffixTagger::new();
        assert_eq!(t.tag("king"), "NN");
        assert_eq!(t.tag("red"), "NN");
        assert_eq!(t.tag("need"), "NN");
        assert_eq!(t.tag("glass"), "NN");
    }
}
