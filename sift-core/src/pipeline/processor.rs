//! Per-document processing.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::analyzer::{extract_ngrams, Analyzer, Ngram, TermCounts, TextNormalizer};
use crate::{DocId, Document, EarlyStop, NgramSize};

/// Progress is logged every this many documents when debug logging is on.
const PROGRESS_INTERVAL: usize = 1000;

/// Cleaned form of one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDocument {
    /// Review the tokens came from.
    pub doc_id: DocId,
    /// Lemmas in document order, stop words removed.
    pub tokens: Vec<String>,
    /// Sliding windows over `tokens`; `None` for unigram runs.
    pub ngrams: Option<Vec<Ngram>>,
    /// Frequency of each lemma in `tokens`.
    pub counts: TermCounts,
}

impl TokenizedDocument {
    /// Tokens joined by single spaces.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Where and why corpus processing stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPoint {
    /// Policy that triggered the stop.
    pub policy: EarlyStop,
    /// First document that was not processed.
    pub halted_at: DocId,
    /// Documents processed before halting.
    pub processed: usize,
}

/// Result of walking a corpus.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    /// Processed documents keyed by id.
    pub tokenized: BTreeMap<DocId, TokenizedDocument>,
    /// Documents handed to the processor, processed or not.
    pub seen: usize,
    /// Set when an early-stop policy halted the walk.
    pub stop: Option<StopPoint>,
}

/// Normalizes, tokenizes and lemmatizes documents.
#[derive(Debug)]
pub struct DocumentProcessor {
    normalizer: TextNormalizer,
    analyzer: Analyzer,
    ngram: NgramSize,
    debug_logging: bool,
}

impl DocumentProcessor {
    /// Creates a processor with debug logging off.
    pub fn new(normalizer: TextNormalizer, analyzer: Analyzer, ngram: NgramSize) -> Self {
        Self {
            normalizer,
            analyzer,
            ngram,
            debug_logging: false,
        }
    }

    /// Enables per-document progress messages.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Normalizer applied before tokenization.
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Tokenizing and lemmatizing stage.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// N-gram window size.
    pub fn ngram(&self) -> NgramSize {
        self.ngram
    }

    /// Cleans and tokenizes a single document. Never fails; text that
    /// normalizes to nothing yields an empty token sequence.
    pub fn process(&self, doc: &Document) -> TokenizedDocument {
        let normalized = self.normalizer.normalize(&doc.text);
        let (tokens, counts) = self.analyzer.tokenize_and_lemmatize(&normalized);
        let ngrams = self
            .ngram
            .is_multi()
            .then(|| extract_ngrams(&tokens, self.ngram));

        TokenizedDocument {
            doc_id: doc.id,
            tokens,
            ngrams,
            counts,
        }
    }

    /// Processes `documents` in ascending id order until `early_stop` halts.
    pub fn process_corpus<'d, I>(
        &self,
        documents: I,
        early_stop: Option<EarlyStop>,
    ) -> ProcessOutcome
    where
        I: IntoIterator<Item = &'d Document>,
    {
        let mut ordered: Vec<&Document> = documents.into_iter().collect();
        ordered.sort_unstable_by_key(|doc| doc.id);

        let mut outcome = ProcessOutcome {
            seen: ordered.len(),
            ..Default::default()
        };

        info!(documents = ordered.len(), ngram = %self.ngram, "starting preprocessing");

        for doc in ordered {
            let processed = outcome.tokenized.len();
            if let Some(policy) = early_stop {
                if policy.halts_before(doc.id, processed) {
                    info!(doc_id = doc.id, processed, %policy, "early stop");
                    outcome.stop = Some(StopPoint {
                        policy,
                        halted_at: doc.id,
                        processed,
                    });
                    break;
                }
            }

            if self.debug_logging && processed % PROGRESS_INTERVAL == 0 {
                debug!(doc_id = doc.id, processed, "cleaning and tokenizing review");
            }

            outcome.tokenized.insert(doc.id, self.process(doc));
        }

        outcome
    }
}
