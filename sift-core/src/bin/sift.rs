//! Batch driver: JSONL reviews in, tokenized corpus and per-restaurant
//! TF-IDF artifacts out.
//!
//! ```bash
//! # defaults: assets/ resources, unigrams, output in ./out
//! sift reviews.jsonl
//!
//! # bigrams, first 5000 reviews, two restaurants only
//! sift reviews.jsonl --ngram 2 --max-documents 5000 --groups 12,40 --out target/run
//!
//! # settings from a file, with a flag override
//! sift reviews.jsonl --config sift.json --debug
//! ```
//!
//! `RUST_LOG` takes precedence over `--debug` for log filtering.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sift_core::export::{Exporter, GroupSelection};
use sift_core::ingest::{read_jsonl, RecordFields};
use sift_core::pipeline::{load_config, Pipeline, Resources, RunStats};
use sift_core::{DocId, GroupId, NgramSize, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "sift", author, version, about = "Review normalization and per-restaurant TF-IDF")]
struct Args {
    /// Line-delimited JSON review file
    input: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Extra stop words, one per line
    #[arg(long)]
    stop_words: Option<PathBuf>,

    /// JSON contraction map
    #[arg(long)]
    contractions: Option<PathBuf>,

    /// N-gram window size
    #[arg(long)]
    ngram: Option<usize>,

    /// Stop before the first review with an id at or above this value
    #[arg(long, conflicts_with = "max_documents")]
    early_stop_id: Option<DocId>,

    /// Stop after this many reviews
    #[arg(long)]
    max_documents: Option<usize>,

    /// Per-document progress messages
    #[arg(long)]
    debug: bool,

    /// Output directory
    #[arg(long, default_value = "out", env = "SIFT_OUT")]
    out: PathBuf,

    /// Restaurants to export, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    groups: Vec<GroupId>,

    /// Mask image recorded in the word-cloud inputs
    #[arg(long)]
    mask: Option<PathBuf>,

    #[arg(long, default_value = "review_id")]
    id_field: String,

    #[arg(long, default_value = "restaurant_id")]
    group_field: String,

    #[arg(long, default_value = "comment")]
    text_field: String,
}

impl Args {
    /// Settings from `--config` (or the defaults), overridden by flags.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => PipelineConfig::default(),
        };
        self.apply_overrides(base)
    }

    /// Applies the flags given on the command line on top of `config`.
    ///
    /// An early-stop flag replaces whichever early-stop option `config`
    /// carried, since the two are mutually exclusive.
    fn apply_overrides(&self, mut config: PipelineConfig) -> Result<PipelineConfig> {
        if let Some(path) = &self.stop_words {
            config.stop_words_source = path.clone();
        }
        if let Some(path) = &self.contractions {
            config.contraction_map_source = path.clone();
        }
        if let Some(n) = self.ngram {
            config.ngram = NgramSize::new(n)?;
        }
        if let Some(id) = self.early_stop_id {
            config.early_stop_id = Some(id);
            config.max_documents = None;
        }
        if let Some(n) = self.max_documents {
            config.max_documents = Some(n);
            config.early_stop_id = None;
        }
        config.debug_logging |= self.debug;

        config.validate()?;
        Ok(config)
    }

    fn selection(&self) -> GroupSelection {
        if self.groups.is_empty() {
            GroupSelection::All
        } else {
            GroupSelection::Only(self.groups.clone())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.pipeline_config()?;
    init_tracing(if config.debug_logging { "debug" } else { "info" });

    let start = Instant::now();

    let resources = Resources::load(&config).context("loading resources")?;
    let pipeline = Pipeline::new(&config, resources)?;

    let fields = RecordFields {
        id: args.id_field.clone(),
        group: args.group_field.clone(),
        text: args.text_field.clone(),
    };
    let documents = read_jsonl(&args.input, &fields)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let output = pipeline.run(documents)?;

    let input_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus.jsonl".to_owned());

    let mut exporter = Exporter::new(&args.out)?;
    if let Some(mask) = &args.mask {
        exporter = exporter.with_mask(mask);
    }
    let selection = args.selection();

    exporter.write_tokenized(&output, &input_name)?;
    exporter.write_ngrams(&output, &input_name)?;
    exporter.write_tables(&output, &selection)?;
    exporter.write_word_clouds(&output, &selection)?;
    exporter.write_counts(&output, &selection)?;

    let stats = output.stats();
    info!(%stats, "run complete");
    print_summary(&stats, start.elapsed(), &args.out);

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_summary(stats: &RunStats, elapsed: Duration, out: &std::path::Path) {
    println!("--------------------------------");
    println!(
        "Reviews     : {} / {}",
        fmt_count(stats.documents_processed),
        fmt_count(stats.documents_seen)
    );
    println!("Restaurants : {}", fmt_count(stats.groups));
    println!("Tables      : {} ({} skipped)", fmt_count(stats.tables), stats.skipped_groups);
    println!("Vocabulary  : {:.1} terms/table", stats.mean_vocabulary());
    if let Some(stop) = stats.early_stop {
        println!("Early stop  : doc {} ({})", stop.halted_at, stop.policy);
    }
    println!("Elapsed     : {:.3} s", elapsed.as_secs_f64());
    println!("Output      : {}", out.display());
    println!("--------------------------------");
}

fn fmt_count(n: usize) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
