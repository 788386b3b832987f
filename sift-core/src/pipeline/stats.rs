//! Run statistics.

use crate::pipeline::processor::StopPoint;
use crate::pipeline::run::RunOutput;

/// A snapshot of what a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Documents in the input corpus.
    pub documents_seen: usize,
    /// Documents normalized and tokenized.
    pub documents_processed: usize,
    /// Restaurants in the corpus.
    pub groups: usize,
    /// Restaurants with a TF-IDF table.
    pub tables: usize,
    /// Restaurants without one.
    pub skipped_groups: usize,
    /// Sum of the per-table vocabulary sizes.
    pub vocabulary_total: usize,
    /// Non-zero weights across all tables.
    pub nonzero_weights: usize,
    /// Where the run stopped early, if it did.
    pub early_stop: Option<StopPoint>,
}

impl RunOutput {
    /// Returns run statistics.
    pub fn stats(&self) -> RunStats {
        RunStats {
            documents_seen: self.documents_seen,
            documents_processed: self.tokenized.len(),
            groups: self.aggregates.len(),
            tables: self.tables.len(),
            skipped_groups: self.skipped_groups.len(),
            vocabulary_total: self.tables.values().map(|t| t.n_columns()).sum(),
            nonzero_weights: self.tables.values().map(|t| t.nnz()).sum(),
            early_stop: self.early_stop,
        }
    }
}

impl RunStats {
    /// Mean vocabulary size of the built tables.
    pub fn mean_vocabulary(&self) -> f64 {
        if self.tables == 0 {
            0.0
        } else {
            self.vocabulary_total as f64 / self.tables as f64
        }
    }
}

impl core::fmt::Display for RunStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{} docs, {} groups, {} tables ({} skipped), {} terms, {} weights",
            self.documents_processed,
            self.documents_seen,
            self.groups,
            self.tables,
            self.skipped_groups,
            self.vocabulary_total,
            self.nonzero_weights
        )?;

        if let Some(stop) = self.early_stop {
            write!(f, ", stopped at doc {} ({})", stop.halted_at, stop.policy)?;
        }

        Ok(())
    }
}
