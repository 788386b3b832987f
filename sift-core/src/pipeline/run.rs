//! One end-to-end run over a corpus.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use crate::analyzer::{Analyzer, TextNormalizer};
use crate::pipeline::aggregate::{aggregate, GroupMembership, RestaurantAggregate};
use crate::pipeline::processor::{DocumentProcessor, StopPoint, TokenizedDocument};
use crate::pipeline::resources::Resources;
use crate::pipeline::table::TfidfTable;
use crate::pipeline::tfidf::{GroupSkip, TfidfBuilder};
use crate::{ConfigError, DocId, Document, EarlyStop, GroupId, PipelineConfig};

/// Rejected corpus input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorpusError {
    /// Two documents share an id.
    #[error("duplicate document id {0}")]
    DuplicateId(DocId),
}

/// A set of documents with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Wraps `documents`, rejecting the first repeated id.
    pub fn new(documents: Vec<Document>) -> Result<Self, CorpusError> {
        let mut ids = FxHashSet::default();
        ids.reserve(documents.len());
        for doc in &documents {
            if !ids.insert(doc.id) {
                return Err(CorpusError::DuplicateId(doc.id));
            }
        }
        Ok(Self { documents })
    }

    /// Documents in input order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` for a corpus without documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Which documents belong to which restaurant.
    pub fn membership(&self) -> GroupMembership {
        GroupMembership::from_documents(&self.documents)
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Processed reviews keyed by id.
    pub tokenized: BTreeMap<DocId, TokenizedDocument>,
    /// One aggregate per restaurant in the corpus.
    pub aggregates: BTreeMap<GroupId, RestaurantAggregate>,
    /// TF-IDF tables of the restaurants that produced one.
    pub tables: BTreeMap<GroupId, TfidfTable>,
    /// Restaurants without a table and the reason.
    pub skipped_groups: BTreeMap<GroupId, GroupSkip>,
    /// Set when an early-stop policy cut the run short.
    pub early_stop: Option<StopPoint>,
    /// Documents in the input corpus.
    pub documents_seen: usize,
}

/// Normalization, aggregation and TF-IDF over a whole corpus.
#[derive(Debug)]
pub struct Pipeline {
    processor: DocumentProcessor,
    builder: TfidfBuilder,
    early_stop: Option<EarlyStop>,
}

impl Pipeline {
    /// Assembles a pipeline. Fails before any document is touched if the
    /// configuration is inconsistent.
    pub fn new(config: &PipelineConfig, resources: Resources) -> Result<Self, ConfigError> {
        let early_stop = config.early_stop()?;
        let processor = DocumentProcessor::new(
            TextNormalizer::new(resources.contractions),
            Analyzer::new(resources.stop_words),
            config.ngram,
        )
        .with_debug_logging(config.debug_logging);

        Ok(Self {
            processor,
            builder: TfidfBuilder::default(),
            early_stop,
        })
    }

    /// Replaces the TF-IDF builder.
    pub fn with_builder(mut self, builder: TfidfBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Per-document stage.
    pub fn processor(&self) -> &DocumentProcessor {
        &self.processor
    }

    /// Early-stop policy derived from the configuration.
    pub fn early_stop(&self) -> Option<EarlyStop> {
        self.early_stop
    }

    /// Checks `documents` for duplicate ids, then runs them.
    pub fn run(&self, documents: Vec<Document>) -> Result<RunOutput, CorpusError> {
        let corpus = Corpus::new(documents)?;
        Ok(self.run_corpus(&corpus))
    }

    /// Processes, aggregates and vectorizes `corpus`. Groups that cannot
    /// produce a table are recorded in `skipped_groups`.
    pub fn run_corpus(&self, corpus: &Corpus) -> RunOutput {
        let outcome = self
            .processor
            .process_corpus(corpus.documents(), self.early_stop);

        let membership = corpus.membership();
        let aggregates = aggregate(&outcome.tokenized, &membership);
        info!(groups = aggregates.len(), "aggregated reviews by restaurant");

        let mut tables = BTreeMap::new();
        let mut skipped_groups = BTreeMap::new();
        for (&group_id, agg) in &aggregates {
            match self.builder.build(agg) {
                Ok(table) => {
                    tables.insert(group_id, table);
                }
                Err(reason) => {
                    warn!(group_id, %reason, "skipping TF-IDF table");
                    skipped_groups.insert(group_id, reason);
                }
            }
        }

        info!(
            tables = tables.len(),
            skipped = skipped_groups.len(),
            "built TF-IDF tables"
        );

        RunOutput {
            tokenized: outcome.tokenized,
            aggregates,
            tables,
            skipped_groups,
            early_stop: outcome.stop,
            documents_seen: outcome.seen,
        }
    }
}
