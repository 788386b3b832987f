//! Contraction expansion.
//!
//! The map is loaded once from a JSON object (`{"can't": "can not", ...}`)
//! and is read-only afterwards. Keys are stored lowercased with curly
//! apostrophes folded to `'`, so lookups behave the same for `can't`,
//! `Can't` (after case folding) and `can’t`.
//!
//! Only keys containing an apostrophe are kept. Normalized output never
//! contains one, so a second normalization pass can never expand anything.

use rustc_hash::FxHashMap;

/// Apostrophe look-alikes folded to `'` before lookup.
const APOSTROPHES: [char; 4] = ['\u{2019}', '\u{2018}', '\u{02BC}', '\u{2032}'];

/// Contracted form → expanded form.
#[derive(Debug, Clone, Default)]
pub struct ContractionMap {
    map: FxHashMap<String, String>,
    /// Suffix keys (`'s`, `'ll`, `n't`, ...) ordered longest first.
    suffixes: Vec<(String, String)>,
}

impl ContractionMap {
    /// Creates an empty map; expansion is then the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object of string → string entries.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the input is not such an object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: std::collections::BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(raw))
    }

    /// Builds the map from `(contraction, expansion)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = FxHashMap::default();
        for (key, value) in pairs {
            let key = fold_apostrophes(&key.as_ref().to_lowercase());
            if !key.contains('\'') {
                continue;
            }
            map.insert(key, value.as_ref().trim().to_lowercase());
        }

        let mut suffixes: Vec<(String, String)> = map
            .iter()
            .filter(|(k, _)| k.starts_with('\'') || k.as_str() == "n't")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        suffixes.sort_unstable_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self { map, suffixes }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Expansion for an exact (already folded) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Expands every whitespace-delimited token of lowercased `text`.
    ///
    /// Tokens are re-joined with single spaces.
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        for token in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            match self.expand_token(token) {
                Some(expanded) => out.push_str(&expanded),
                None => out.push_str(token),
            }
        }
        out
    }

    /// Expansion of a single token, if any rule applies.
    ///
    /// Lookup order: the token itself; the token without surrounding
    /// punctuation (which is re-attached); the longest matching suffix key.
    pub fn expand_token(&self, token: &str) -> Option<String> {
        if self.map.is_empty() || !token.chars().any(is_apostrophe) {
            return None;
        }

        let token = fold_apostrophes(token);
        if let Some(v) = self.map.get(&token) {
            return Some(v.clone());
        }

        let (lead, core, trail) = split_punctuation(&token, |c| c == '\'');
        let (lead, core, trail) = if self.map.contains_key(core) {
            (lead, core, trail)
        } else {
            split_punctuation(&token, |_| false)
        };

        let expanded = match self.map.get(core) {
            Some(v) => v.clone(),
            None => self.expand_suffix(core)?,
        };

        let mut out = String::with_capacity(lead.len() + expanded.len() + trail.len());
        out.push_str(lead);
        out.push_str(&expanded);
        out.push_str(trail);
        Some(out)
    }

    fn expand_suffix(&self, core: &str) -> Option<String> {
        self.suffixes
            .iter()
            .find(|(suffix, _)| core.len() > suffix.len() && core.ends_with(suffix.as_str()))
            .map(|(suffix, expansion)| {
                let stem = &core[..core.len() - suffix.len()];
                format!("{} {}", stem, expansion)
            })
    }
}

#[inline]
fn is_apostrophe(c: char) -> bool {
    c == '\'' || APOSTROPHES.contains(&c)
}

fn fold_apostrophes(s: &str) -> String {
    s.chars()
        .map(|c| if APOSTROPHES.contains(&c) { '\'' } else { c })
        .collect()
}

/// Splits `token` into leading punctuation, core and trailing punctuation.
///
/// A character is punctuation here when it is not alphanumeric and `keep`
/// returns false for it.
fn split_punctuation(token: &str, keep: impl Fn(char) -> bool) -> (&str, &str, &str) {
    let is_edge = |c: char| !c.is_alphanumeric() && !keep(c);
    let start = token
        .char_indices()
        .find(|&(_, c)| !is_edge(c))
        .map_or(token.len(), |(i, _)| i);
    let end = token
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_edge(c))
        .map_or(start, |(i, c)| i + c.len_utf8());
    (&token[..start], &token[start..end], &token[end..])
}
