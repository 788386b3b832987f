//! Core types for the Sift review preprocessing pipeline.
//!
//! This crate holds the values shared between the pipeline and anything that
//! drives it: identifiers, the ingested [`Document`], the run configuration
//! and the configuration error type. Keeping them separate means:
//!
//! - **Cross-crate compatibility**: the core library and the batch driver
//!   agree on one definition of a document and a configuration
//! - **Clean boundaries**: no dependency on tokenization or TF-IDF code

#![warn(missing_docs)]

use core::fmt;
use core::num::NonZeroUsize;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique review identifier.
///
/// Review ids are non-negative integers in the source corpora. They are
/// totally ordered; the pipeline walks documents in ascending id order.
pub type DocId = u64;

/// Restaurant (group) identifier.
pub type GroupId = u64;

/// One review record: its id, the restaurant it belongs to and its raw text.
///
/// Immutable once ingested; the pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique review id
    pub id: DocId,
    /// Restaurant the review belongs to
    pub group_id: GroupId,
    /// Raw, unprocessed review text
    pub text: String,
}

impl Document {
    /// Creates a new document.
    pub fn new(id: DocId, group_id: GroupId, text: impl Into<String>) -> Self {
        Self {
            id,
            group_id,
            text: text.into(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "doc={} group={} len={}",
            self.id,
            self.group_id,
            self.text.len()
        )
    }
}

/// Size of the token window used for n-gram construction.
///
/// Always at least 1. A value of 1 means unigrams only, in which case no
/// n-gram sequence is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NgramValue", into = "usize")]
pub struct NgramSize(NonZeroUsize);

impl NgramSize {
    /// Unigrams only.
    pub const UNIGRAM: Self = Self(NonZeroUsize::MIN);

    /// Creates an n-gram size.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidNgram`] if `n` is zero.
    pub fn new(n: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or_else(|| ConfigError::InvalidNgram {
                value: n.to_string(),
            })
    }

    /// Returns the window length.
    #[inline(always)]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns true if this size produces an n-gram sequence (n > 1).
    #[inline(always)]
    pub const fn is_multi(self) -> bool {
        self.0.get() > 1
    }
}

impl Default for NgramSize {
    fn default() -> Self {
        Self::UNIGRAM
    }
}

impl From<NgramSize> for usize {
    fn from(n: NgramSize) -> Self {
        n.get()
    }
}

impl fmt::Display for NgramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Raw n-gram value as it appears in a configuration file.
///
/// Floats are accepted by the deserializer only so that they can be rejected
/// with a configuration error instead of a generic type error.
#[derive(Deserialize)]
#[serde(untagged)]
enum NgramValue {
    Int(i64),
    Float(f64),
}

impl TryFrom<NgramValue> for NgramSize {
    type Error = ConfigError;

    fn try_from(value: NgramValue) -> Result<Self, Self::Error> {
        match value {
            NgramValue::Int(n) if n >= 1 => usize::try_from(n)
                .map_err(|_| ConfigError::InvalidNgram {
                    value: n.to_string(),
                })
                .and_then(Self::new),
            NgramValue::Int(n) => Err(ConfigError::InvalidNgram {
                value: n.to_string(),
            }),
            NgramValue::Float(x) => Err(ConfigError::InvalidNgram {
                value: x.to_string(),
            }),
        }
    }
}

/// When to stop processing a corpus early.
///
/// Stopping is a performance/debug knob, not an error: documents already
/// processed keep their results, later ones are simply absent downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyStop {
    /// Stop before the first document whose id is `>=` the threshold.
    ///
    /// Assumes dense ascending ids; see [`EarlyStop::AfterCount`] otherwise.
    AtId(DocId),
    /// Stop once this many documents have been processed.
    AfterCount(usize),
}

impl EarlyStop {
    /// Returns true if the document with `id`, being the `processed`-th
    /// document seen (0-based), must not be processed.
    #[inline]
    pub const fn halts_before(self, id: DocId, processed: usize) -> bool {
        match self {
            EarlyStop::AtId(threshold) => id >= threshold,
            EarlyStop::AfterCount(limit) => processed >= limit,
        }
    }
}

impl fmt::Display for EarlyStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EarlyStop::AtId(id) => write!(f, "id >= {}", id),
            EarlyStop::AfterCount(n) => write!(f, "after {} documents", n),
        }
    }
}

/// Words kept out of the stop-word set even though the base English list
/// contains them. Negations and intensifiers carry sentiment in reviews.
pub const DEFAULT_RETAINED_STOP_WORDS: &[&str] = &["more", "most", "very", "no", "nor", "not"];

/// Pipeline configuration.
///
/// Built once before a run and never mutated while documents are processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// File with extra stop words, one per line.
    pub stop_words_source: PathBuf,
    /// JSON object mapping contractions to their expansions.
    pub contraction_map_source: PathBuf,
    /// N-gram window size (>= 1).
    pub ngram: NgramSize,
    /// Stop before the first document with an id at or above this value.
    pub early_stop_id: Option<DocId>,
    /// Stop after this many documents.
    pub max_documents: Option<usize>,
    /// Emit per-document progress messages.
    pub debug_logging: bool,
    /// Words removed from the base stop-word list.
    pub retained_stop_words: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stop_words_source: PathBuf::from("assets/custom_stop_words.txt"),
            contraction_map_source: PathBuf::from("assets/contractions.json"),
            ngram: NgramSize::UNIGRAM,
            early_stop_id: None,
            max_documents: None,
            debug_logging: false,
            retained_stop_words: DEFAULT_RETAINED_STOP_WORDS
                .iter()
                .map(|w| (*w).to_owned())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Checks option combinations that the type system cannot rule out.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConflictingEarlyStop`] if both early-stop
    /// options are set, [`ConfigError::InvalidValue`] for a zero document
    /// limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.early_stop().map(|_| ())
    }

    /// Resolves the early-stop options into a single policy.
    ///
    /// # Errors
    /// Same conditions as [`PipelineConfig::validate`].
    pub fn early_stop(&self) -> Result<Option<EarlyStop>, ConfigError> {
        match (self.early_stop_id, self.max_documents) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingEarlyStop),
            (Some(id), None) => Ok(Some(EarlyStop::AtId(id))),
            (None, Some(0)) => Err(ConfigError::InvalidValue {
                name: "max_documents",
                reason: "must be at least 1".to_owned(),
            }),
            (None, Some(n)) => Ok(Some(EarlyStop::AfterCount(n))),
            (None, None) => Ok(None),
        }
    }
}

/// Configuration errors. Always fatal, and always raised before any
/// document is processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The n-gram size is not a strictly positive integer.
    #[error("ngram must be a strictly positive integer, got {value}")]
    InvalidNgram {
        /// The rejected value, as written.
        value: String,
    },

    /// Both `early_stop_id` and `max_documents` were given.
    #[error("early_stop_id and max_documents are mutually exclusive")]
    ConflictingEarlyStop,

    /// An option has an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        /// Option name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
