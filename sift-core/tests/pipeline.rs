use std::fs;
use std::path::{Path, PathBuf};

use sift_core::export::{Exporter, GroupSelection};
use sift_core::ingest::{read_jsonl, RecordFields};
use sift_core::pipeline::{load_config, GroupSkip, Pipeline, Resources};
use sift_core::{EarlyStop, PipelineConfig};

fn assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets")
}

fn config() -> PipelineConfig {
    PipelineConfig {
        stop_words_source: assets().join("custom_stop_words.txt"),
        contraction_map_source: assets().join("contractions.json"),
        ..Default::default()
    }
}

const REVIEWS: &str = r#"{"review_id": 1, "restaurant_id": 100, "comment": "I can't believe it's not butter!"}
{"review_id": 2, "restaurant_id": 100, "comment": "Great food, terrible service."}
{"review_id": 3, "restaurant_id": 200, "comment": "The crème brûlée was délicieux — truly."}
{"review_id": 4, "restaurant_id": 200, "comment": "We’ll be back for the dumplings…"}
{"review_id": 5, "restaurant_id": 300, "comment": "The!"}
{"review_id": 6, "restaurant_id": 100, "comment": "Not great, not terrible. Very slow service."}
"#;

fn write_reviews(dir: &Path) -> PathBuf {
    let path = dir.join("reviews.jsonl");
    fs::write(&path, REVIEWS).unwrap();
    path
}

#[test]
fn end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_reviews(dir.path());

    let config = config();
    let pipeline = Pipeline::new(&config, Resources::load(&config).unwrap()).unwrap();
    let docs = read_jsonl(&input, &RecordFields::default()).unwrap();
    let output = pipeline.run(docs).unwrap();

    let first = &output.tokenized[&1];
    assert!(first.tokens.contains(&"not".to_owned()));
    assert!(!first.tokens.contains(&"i".to_owned()));
    assert_eq!(first.tokens, ["not", "believe", "not", "butter"]);

    assert_eq!(output.aggregates[&100].contributing_ids, [1, 2, 6]);
    assert_eq!(output.tables[&100].rows(), [1, 2, 6]);
    assert_eq!(output.skipped_groups.get(&300), Some(&GroupSkip::EmptyVocabulary));

    let dumplings = &output.tokenized[&4].tokens;
    assert!(dumplings.contains(&"dumpling".to_owned()));
    assert!(dumplings.iter().all(|t| t.is_ascii()));

    let out_dir = dir.path().join("out");
    let exporter = Exporter::new(&out_dir).unwrap();
    exporter.write_tokenized(&output, "reviews.jsonl").unwrap();
    exporter.write_tables(&output, &GroupSelection::All).unwrap();
    exporter.write_word_clouds(&output, &GroupSelection::All).unwrap();
    exporter.write_counts(&output, &GroupSelection::All).unwrap();

    assert!(out_dir.join("tokenized_reviews.jsonl").is_file());
    assert!(out_dir.join("tfidf_100.csv").is_file());
    assert!(out_dir.join("wordcloud_200.json").is_file());
    assert!(out_dir.join("counts_300.json").is_file());
    assert!(!out_dir.join("tfidf_300.csv").exists());

    let stats = output.stats();
    assert_eq!(stats.documents_processed, 6);
    assert_eq!(stats.groups, 3);
    assert_eq!(stats.tables, 2);
    assert_eq!(stats.skipped_groups, 1);
}

#[test]
fn early_stop_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_reviews(dir.path());

    let mut base = config();
    base.early_stop_id = Some(3);
    let cfg_path = dir.path().join("sift.json");
    fs::write(&cfg_path, serde_json::to_string(&base).unwrap()).unwrap();

    let config = load_config(&cfg_path).unwrap();
    assert_eq!(config.early_stop().unwrap(), Some(EarlyStop::AtId(3)));

    let pipeline = Pipeline::new(&config, Resources::load(&config).unwrap()).unwrap();
    let output = pipeline
        .run(read_jsonl(&input, &RecordFields::default()).unwrap())
        .unwrap();

    let ids: Vec<u64> = output.tokenized.keys().copied().collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(output.aggregates[&100].contributing_ids, [1, 2]);
    assert_eq!(output.skipped_groups.get(&200), Some(&GroupSkip::NoDocuments));
    assert!(output.stats().to_string().contains("stopped at doc 3"));
}

#[test]
fn exports_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_reviews(dir.path());
    let config = config();

    let mut outputs = Vec::new();
    for name in ["a", "b"] {
        let pipeline = Pipeline::new(&config, Resources::load(&config).unwrap()).unwrap();
        let output = pipeline
            .run(read_jsonl(&input, &RecordFields::default()).unwrap())
            .unwrap();
        let exporter = Exporter::new(dir.path().join(name)).unwrap();
        exporter.write_tables(&output, &GroupSelection::All).unwrap();
        exporter.write_word_clouds(&output, &GroupSelection::All).unwrap();
        outputs.push(dir.path().join(name));
    }

    for file in ["tfidf_100.csv", "tfidf_200.csv", "wordcloud_100.json"] {
        let a = fs::read(outputs[0].join(file)).unwrap();
        let b = fs::read(outputs[1].join(file)).unwrap();
        assert_eq!(a, b, "{file} differs");
    }
}
