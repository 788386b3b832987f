//! Corpus-level processing: per-document cleaning, per-restaurant
//! aggregation and TF-IDF tables.
//!
//! Data flows forward only:
//! [`DocumentProcessor`] → [`aggregate()`] → [`TfidfBuilder`].
//! [`Pipeline`] wires the three together for a whole [`Corpus`].
//!
//! Ordering:
//! - documents are processed in ascending id order
//! - groups are visited in ascending id order, members ascending
//! - table columns are the sorted group vocabulary

mod aggregate;
mod processor;
mod resources;
mod run;
mod stats;
mod table;
mod tfidf;

pub use aggregate::{aggregate, GroupMembership, RestaurantAggregate};
pub use processor::{DocumentProcessor, ProcessOutcome, StopPoint, TokenizedDocument};
pub use resources::{load_config, ResourceError, Resources};
pub use run::{Corpus, CorpusError, Pipeline, RunOutput};
pub use stats::RunStats;
pub use table::TfidfTable;
pub use tfidf::{
    GroupSkip, RowSpan, TermMatrix, TfidfBuilder, TfidfVectorizer, VectorizeError,
    VECTORIZER_STOP_WORDS,
};
