//! External resources: stop-word extensions, the contraction map and the
//! configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::{ContractionMap, StopWords};
use crate::{ConfigError, PipelineConfig};

/// Errors raised while loading configuration and lookup resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A resource file could not be read.
    #[error("failed to read {kind} from {}: {source}", path.display())]
    Read {
        /// What the file was expected to hold.
        kind: &'static str,
        /// File that failed.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The contraction map is not a JSON object of strings.
    #[error("malformed contraction map {}: {source}", path.display())]
    MalformedContractions {
        /// Contraction map file.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file does not parse.
    #[error("malformed configuration {}: {source}", path.display())]
    MalformedConfig {
        /// Configuration file.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration parses but its values conflict.
    #[error("invalid configuration {}: {source}", path.display())]
    InvalidConfig {
        /// Configuration file.
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

fn read(kind: &'static str, path: &Path) -> Result<String, ResourceError> {
    fs::read_to_string(path).map_err(|source| ResourceError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates a JSON configuration file. Missing fields take their
/// defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ResourceError> {
    let path = path.as_ref();
    let text = read("configuration", path)?;
    let config: PipelineConfig =
        serde_json::from_str(&text).map_err(|source| ResourceError::MalformedConfig {
            path: path.to_path_buf(),
            source,
        })?;
    config
        .validate()
        .map_err(|source| ResourceError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}

/// Lookup tables shared by every document of a run.
#[derive(Debug, Clone)]
pub struct Resources {
    /// Built-in English stop words plus the configured extension list.
    pub stop_words: StopWords,
    /// Contraction expansions applied during normalization.
    pub contractions: ContractionMap,
}

impl Resources {
    /// Bundles already-built lookup tables.
    pub fn new(stop_words: StopWords, contractions: ContractionMap) -> Self {
        Self {
            stop_words,
            contractions,
        }
    }

    /// Reads the stop-word extension list and the contraction map named by
    /// `config`. Both are required.
    pub fn load(config: &PipelineConfig) -> Result<Self, ResourceError> {
        let extra = read("stop words", &config.stop_words_source)?;
        let stop_words = StopWords::english(&config.retained_stop_words).with_lines(&extra);

        let path = &config.contraction_map_source;
        let contractions = ContractionMap::from_json_str(&read("contraction map", path)?)
            .map_err(|source| ResourceError::MalformedContractions {
                path: path.clone(),
                source,
            })?;

        info!(
            stop_words = stop_words.len(),
            contractions = contractions.len(),
            "loaded resources"
        );
        Ok(Self::new(stop_words, contractions))
    }
}
