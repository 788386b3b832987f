//! TF-IDF weighting.
//!
//! [`TfidfVectorizer`] turns a list of documents into a [`TermMatrix`]:
//!
//! - terms are runs of two or more word characters, lowercased, minus the
//!   vectorizer's own English stop list
//! - the vocabulary is sorted, so column order is stable across runs
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` (smoothed; `ln(n / df(t)) + 1`
//!   when smoothing is off)
//! - each row holds raw term counts times idf, scaled to unit L2 norm
//!
//! The matrix is stored row-compressed: one [`RowSpan`] per document into
//! flat column and value arrays.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::pipeline::aggregate::RestaurantAggregate;
use crate::pipeline::table::TfidfTable;

/// English stop list applied by the vectorizer (318 words).
pub const VECTORIZER_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Reasons [`TfidfVectorizer::fit_transform`] produces no matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VectorizeError {
    /// The document slice was empty.
    #[error("no documents to vectorize")]
    NoDocuments,
    /// No document kept a single term after filtering.
    #[error("empty vocabulary; the documents contain only stop words or short tokens")]
    EmptyVocabulary,
}

/// Document-term weighting with scikit-learn compatible defaults.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    stop_words: FxHashSet<String>,
    smooth_idf: bool,
    sublinear_tf: bool,
    normalize: bool,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Smoothed idf, raw tf, L2 rows, built-in English stop list.
    pub fn new() -> Self {
        Self {
            stop_words: VECTORIZER_STOP_WORDS.iter().map(|w| (*w).to_owned()).collect(),
            smooth_idf: true,
            sublinear_tf: false,
            normalize: true,
        }
    }

    /// Replaces the stop list. An empty iterator disables stop-word removal.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        self
    }

    /// Adds one to document frequencies, as if an extra document held
    /// every term once.
    pub fn smooth_idf(mut self, on: bool) -> Self {
        self.smooth_idf = on;
        self
    }

    /// Uses `1 + ln(tf)` instead of the raw count.
    pub fn sublinear_tf(mut self, on: bool) -> Self {
        self.sublinear_tf = on;
        self
    }

    /// Scales each row to unit L2 norm.
    pub fn l2_normalize(mut self, on: bool) -> Self {
        self.normalize = on;
        self
    }

    /// Terms of one document, in order.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| t.chars().nth(1).is_some())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_owned)
            .collect()
    }

    /// Learns the vocabulary and idf of `documents` and returns their
    /// weighted document-term matrix, one row per document in input order.
    ///
    /// # Errors
    /// [`VectorizeError::NoDocuments`] for an empty slice,
    /// [`VectorizeError::EmptyVocabulary`] when no document has a term.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<TermMatrix, VectorizeError> {
        if documents.is_empty() {
            return Err(VectorizeError::NoDocuments);
        }

        let per_doc: Vec<FxHashMap<String, u32>> = documents
            .iter()
            .map(|doc| {
                let mut counts = FxHashMap::default();
                for term in self.analyze(doc.as_ref()) {
                    *counts.entry(term).or_insert(0u32) += 1;
                }
                counts
            })
            .collect();

        let mut df: FxHashMap<&str, u32> = FxHashMap::default();
        for counts in &per_doc {
            for term in counts.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let mut vocabulary: Vec<String> = df.keys().map(|t| (*t).to_owned()).collect();
        vocabulary.sort_unstable();

        let n = documents.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = df.get(term.as_str()).copied().unwrap_or(0) as f64;
                if self.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else {
                    (n / df).ln() + 1.0
                }
            })
            .collect();

        let mut spans = Vec::with_capacity(per_doc.len());
        let mut columns = Vec::new();
        let mut values = Vec::new();
        let mut row: Vec<(u32, f64)> = Vec::new();

        for counts in &per_doc {
            row.clear();
            for (term, &tf) in counts {
                if let Ok(col) = vocabulary.binary_search(term) {
                    let tf = if self.sublinear_tf {
                        1.0 + (tf as f64).ln()
                    } else {
                        tf as f64
                    };
                    row.push((col as u32, tf * idf[col]));
                }
            }
            row.sort_unstable_by_key(|&(col, _)| col);

            if self.normalize {
                let norm = row.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in &mut row {
                        *v /= norm;
                    }
                }
            }

            let offset = columns.len() as u32;
            for &(col, v) in &row {
                columns.push(col);
                values.push(v);
            }
            spans.push(RowSpan {
                offset,
                len: row.len() as u32,
            });
        }

        Ok(TermMatrix {
            vocabulary,
            idf,
            spans,
            columns,
            values,
        })
    }
}

/// Slice of one row in the flat column/value arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSpan {
    /// Index of the row's first entry.
    pub offset: u32,
    /// Number of stored entries in the row.
    pub len: u32,
}

/// Row-compressed document-term weights.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    spans: Vec<RowSpan>,
    columns: Vec<u32>,
    values: Vec<f64>,
}

impl TermMatrix {
    /// Sorted vocabulary; column `j` is `vocabulary()[j]`.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Inverse document frequency of each column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.spans.len()
    }

    /// Vocabulary size.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of stored (non-zero) weights.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column of `term`, if it is in the vocabulary.
    pub fn column_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    #[inline(always)]
    fn row_slices(&self, row: usize) -> (&[u32], &[f64]) {
        let span = self.spans[row];
        let start = span.offset as usize;
        let end = start + span.len as usize;
        (&self.columns[start..end], &self.values[start..end])
    }

    /// Non-zero `(column, weight)` pairs of `row`, ascending by column.
    ///
    /// # Panics
    /// If `row >= n_rows()`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (cols, vals) = self.row_slices(row);
        cols.iter().zip(vals).map(|(&c, &v)| (c as usize, v))
    }

    /// Weight at `(row, column)`; zero when not stored or out of range.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        if row >= self.n_rows() {
            return 0.0;
        }
        let (cols, vals) = self.row_slices(row);
        cols.binary_search(&(column as u32))
            .map_or(0.0, |i| vals[i])
    }

    /// All columns of `row`, zeros included.
    pub fn dense_row(&self, row: usize) -> Vec<f64> {
        let mut out = vec![0.0; self.n_columns()];
        for (col, v) in self.row(row) {
            out[col] = v;
        }
        out
    }
}

/// Why a group produced no TF-IDF table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum GroupSkip {
    /// No member review was processed.
    #[error("no tokenized documents")]
    NoDocuments,
    /// Every member review was empty after filtering.
    #[error("empty vocabulary")]
    EmptyVocabulary,
}

impl From<VectorizeError> for GroupSkip {
    fn from(err: VectorizeError) -> Self {
        match err {
            VectorizeError::NoDocuments => GroupSkip::NoDocuments,
            VectorizeError::EmptyVocabulary => GroupSkip::EmptyVocabulary,
        }
    }
}

/// Builds one [`TfidfTable`] per restaurant aggregate.
#[derive(Debug, Clone, Default)]
pub struct TfidfBuilder {
    vectorizer: TfidfVectorizer,
}

impl TfidfBuilder {
    /// Creates a builder around `vectorizer`.
    pub fn new(vectorizer: TfidfVectorizer) -> Self {
        Self { vectorizer }
    }

    /// Vectorizer applied to each group.
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Vectorizes the group's joined documents. Rows are labelled with the
    /// aggregate's contributing ids, in the same order.
    pub fn build(&self, aggregate: &RestaurantAggregate) -> Result<TfidfTable, GroupSkip> {
        if aggregate.is_empty() {
            return Err(GroupSkip::NoDocuments);
        }
        let matrix = self.vectorizer.fit_transform(aggregate.joined_documents.as_slice())?;
        Ok(TfidfTable::new(
            aggregate.group_id,
            aggregate.contributing_ids.clone(),
            matrix,
        ))
    }
}
