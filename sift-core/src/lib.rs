//! Review normalization and per-restaurant TF-IDF.
//!
//! The crate is organised as a forward-only pipeline:
//!
//! - [`analyzer`]: text normalization, tokenization, POS tagging,
//!   lemmatization and stop-word filtering
//! - [`pipeline`]: per-document processing, per-restaurant aggregation and
//!   TF-IDF table construction
//! - [`ingest`] / [`export`]: JSONL input and file sinks used by the `sift`
//!   batch driver
//!
//! ```no_run
//! use sift_core::pipeline::{Pipeline, Resources};
//! use sift_types::{Document, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let resources = Resources::load(&config)?;
//! let pipeline = Pipeline::new(&config, resources)?;
//! let output = pipeline.run(vec![Document::new(1, 10, "Great food!")])?;
//! println!("{}", output.stats());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyzer;
pub mod export;
pub mod ingest;
pub mod pipeline;

pub use sift_types::{ConfigError, DocId, Document, EarlyStop, GroupId, NgramSize, PipelineConfig};
