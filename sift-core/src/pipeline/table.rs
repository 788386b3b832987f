//! Per-restaurant TF-IDF table.

use std::collections::BTreeMap;

use crate::pipeline::tfidf::TermMatrix;
use crate::{DocId, GroupId};

/// TF-IDF weights of one restaurant's reviews.
///
/// Row `i` belongs to review `rows()[i]`; column `j` is term `columns()[j]`.
/// Columns are the restaurant's own sorted vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfTable {
    group_id: GroupId,
    rows: Vec<DocId>,
    matrix: TermMatrix,
}

impl TfidfTable {
    pub(crate) fn new(group_id: GroupId, rows: Vec<DocId>, matrix: TermMatrix) -> Self {
        debug_assert_eq!(rows.len(), matrix.n_rows());
        Self {
            group_id,
            rows,
            matrix,
        }
    }

    /// Restaurant the table describes.
    #[inline]
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Row labels: contributing review ids, ascending.
    #[inline]
    pub fn rows(&self) -> &[DocId] {
        &self.rows
    }

    /// Column labels: the sorted vocabulary.
    #[inline]
    pub fn columns(&self) -> &[String] {
        self.matrix.vocabulary()
    }

    /// Underlying sparse weights.
    pub fn matrix(&self) -> &TermMatrix {
        &self.matrix
    }

    /// Number of reviews.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of terms.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.matrix.n_columns()
    }

    /// Number of non-zero weights.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Weight of `term` in review `doc_id`.
    ///
    /// `None` if the review is not a row of this table or the term is not in
    /// its vocabulary; `Some(0.0)` if both exist but the review lacks the term.
    pub fn get(&self, doc_id: DocId, term: &str) -> Option<f64> {
        let row = self.rows.binary_search(&doc_id).ok()?;
        let col = self.matrix.column_index(term)?;
        Some(self.matrix.get(row, col))
    }

    /// Non-zero `(term, weight)` pairs of row `index`, in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = (&str, f64)> + '_ {
        let vocabulary = self.matrix.vocabulary();
        self.matrix
            .row(index)
            .map(move |(col, w)| (vocabulary[col].as_str(), w))
    }

    /// Row `index` with a value for every column.
    pub fn dense_row(&self, index: usize) -> Vec<f64> {
        self.matrix.dense_row(index)
    }

    /// Every row as `(review id, dense weights)`.
    pub fn dense_rows(&self) -> impl Iterator<Item = (DocId, Vec<f64>)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, self.matrix.dense_row(i)))
    }

    /// Word-cloud input: for every term, the mean of its non-zero weights
    /// across the restaurant's reviews.
    pub fn word_cloud_weights(&self) -> BTreeMap<String, f64> {
        let mut sums = vec![0.0f64; self.n_columns()];
        let mut hits = vec![0u32; self.n_columns()];
        for i in 0..self.matrix.n_rows() {
            for (col, w) in self.matrix.row(i) {
                if w != 0.0 {
                    sums[col] += w;
                    hits[col] += 1;
                }
            }
        }

        self.columns()
            .iter()
            .zip(sums.iter().zip(&hits))
            .filter(|(_, (_, &n))| n > 0)
            .map(|(term, (&sum, &n))| (term.clone(), sum / f64::from(n)))
            .collect()
    }
}
