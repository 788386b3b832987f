//! File sinks for run artifacts.
//!
//! | artifact             | file                          | format |
//! |----------------------|-------------------------------|--------|
//! | tokenized corpus     | `tokenized_<input>`           | JSON   |
//! | n-gram corpus        | `ngrams_<input>`              | JSON   |
//! | TF-IDF table         | `tfidf_<group>.csv`           | CSV    |
//! | word-cloud input     | `wordcloud_<group>.json`      | JSON   |
//! | merged term counts   | `counts_<group>.json`         | JSON   |
//!
//! Every map is ordered, so two runs over the same input write identical
//! bytes.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::RunOutput;
use crate::{DocId, GroupId};

/// Errors raised while writing run artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Creating, writing or flushing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selected restaurant has no entry in the run output.
    #[error("group {0} has no output")]
    UnknownGroup(GroupId),
}

/// Which restaurants to export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupSelection {
    /// Every restaurant in the run output.
    #[default]
    All,
    /// Only these restaurants; duplicates are ignored.
    Only(Vec<GroupId>),
}

impl GroupSelection {
    /// Picks the selected entries of `map`, in ascending group order.
    fn pick<'m, V>(
        &self,
        map: &'m BTreeMap<GroupId, V>,
    ) -> Result<Vec<(GroupId, &'m V)>, ExportError> {
        match self {
            GroupSelection::All => Ok(map.iter().map(|(&g, v)| (g, v)).collect()),
            GroupSelection::Only(ids) => {
                let mut ids = ids.clone();
                ids.sort_unstable();
                ids.dedup();
                ids.into_iter()
                    .map(|g| map.get(&g).map(|v| (g, v)).ok_or(ExportError::UnknownGroup(g)))
                    .collect()
            }
        }
    }
}

#[derive(Serialize)]
struct WordCloudInput<'a> {
    group_id: GroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    mask: Option<&'a Path>,
    weights: BTreeMap<String, f64>,
}

/// Writes run artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    mask: Option<PathBuf>,
}

impl Exporter {
    /// Creates `dir` (and parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, mask: None })
    }

    /// Records a mask image for word-cloud rendering. An unreadable mask is
    /// dropped with a warning.
    pub fn with_mask(mut self, mask: impl AsRef<Path>) -> Self {
        let mask = mask.as_ref();
        match File::open(mask) {
            Ok(_) => self.mask = Some(mask.to_path_buf()),
            Err(err) => {
                warn!(
                    path = %mask.display(),
                    error = %err,
                    "mask image unreadable, continuing without it"
                );
                self.mask = None;
            }
        }
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Mask image recorded in word-cloud inputs, if it was readable.
    pub fn mask(&self) -> Option<&Path> {
        self.mask.as_deref()
    }

    fn create(&self, name: &str) -> Result<(PathBuf, BufWriter<File>), ExportError> {
        let path = self.dir.join(name);
        let file = File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, BufWriter::new(file)))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, ExportError> {
        let (path, mut out) = self.create(name)?;
        serde_json::to_writer_pretty(&mut out, value)?;
        out.flush().map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Tokens of every processed review, keyed by review id.
    pub fn write_tokenized(
        &self,
        output: &RunOutput,
        input_name: &str,
    ) -> Result<PathBuf, ExportError> {
        let tokens: BTreeMap<DocId, &[String]> = output
            .tokenized
            .iter()
            .map(|(&id, doc)| (id, doc.tokens.as_slice()))
            .collect();
        let path = self.write_json(&format!("tokenized_{input_name}"), &tokens)?;
        info!(path = %path.display(), documents = tokens.len(), "wrote tokenized corpus");
        Ok(path)
    }

    /// N-gram sequences keyed by review id. Nothing is written for unigram
    /// runs.
    pub fn write_ngrams(
        &self,
        output: &RunOutput,
        input_name: &str,
    ) -> Result<Option<PathBuf>, ExportError> {
        let grams: BTreeMap<DocId, Vec<&[String]>> = output
            .tokenized
            .iter()
            .filter_map(|(&id, doc)| {
                let seq = doc.ngrams.as_ref()?;
                Some((id, seq.iter().map(|g| g.as_slice()).collect()))
            })
            .collect();
        if grams.is_empty() {
            return Ok(None);
        }
        let path = self.write_json(&format!("ngrams_{input_name}"), &grams)?;
        info!(path = %path.display(), "wrote n-gram corpus");
        Ok(Some(path))
    }

    /// One dense CSV per selected table: `review_id` then one column per
    /// term.
    pub fn write_tables(
        &self,
        output: &RunOutput,
        selection: &GroupSelection,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        for (group_id, table) in selection.pick(&output.tables)? {
            let path = self.dir.join(format!("tfidf_{group_id}.csv"));
            let mut wtr = csv::Writer::from_path(&path)?;

            let mut header = Vec::with_capacity(table.n_columns() + 1);
            header.push("review_id");
            header.extend(table.columns().iter().map(String::as_str));
            wtr.write_record(&header)?;

            for (doc_id, weights) in table.dense_rows() {
                let mut record = Vec::with_capacity(weights.len() + 1);
                record.push(doc_id.to_string());
                record.extend(weights.iter().map(f64::to_string));
                wtr.write_record(&record)?;
            }
            wtr.flush().map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        info!(tables = written.len(), "wrote TF-IDF tables");
        Ok(written)
    }

    /// Word-cloud weight maps for the selected tables.
    pub fn write_word_clouds(
        &self,
        output: &RunOutput,
        selection: &GroupSelection,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        for (group_id, table) in selection.pick(&output.tables)? {
            let input = WordCloudInput {
                group_id,
                mask: self.mask(),
                weights: table.word_cloud_weights(),
            };
            written.push(self.write_json(&format!("wordcloud_{group_id}.json"), &input)?);
        }
        info!(groups = written.len(), "wrote word-cloud inputs");
        Ok(written)
    }

    /// Merged term counts of the selected restaurants.
    pub fn write_counts(
        &self,
        output: &RunOutput,
        selection: &GroupSelection,
    ) -> Result<Vec<PathBuf>, ExportError> {
        selection
            .pick(&output.aggregates)?
            .into_iter()
            .map(|(group_id, agg)| {
                self.write_json(&format!("counts_{group_id}.json"), &agg.counts)
            })
            .collect()
    }
}
