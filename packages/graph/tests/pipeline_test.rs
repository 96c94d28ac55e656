//! End-to-end tests for the graph pipeline using a fixture input table.

use std::fs;
use std::path::{Path, PathBuf};

use aiact_graph::config::GraphConfig;
use aiact_graph::error::GraphError;
use aiact_graph::graph::ReferenceGraph;
use aiact_graph::pipeline::{GraphOrigin, OfflineSource, Pipeline};
use aiact_harvester::types::CanonicalId;
use aiact_harvester::{Corpus, CorpusSource, Item, ItemType};
use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Path of a fixture file.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Temporary data directory seeded with the fixture input table.
fn seeded_data_dir() -> (TempDir, GraphConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig::new(dir.path().join("data"));
    fs::create_dir_all(config.data_dir()).unwrap();
    fs::copy(
        fixture_path("articles_and_recitals.csv"),
        config.input_table_path(),
    )
    .unwrap();
    (dir, config)
}

fn id(raw: &str) -> CanonicalId {
    raw.parse().unwrap()
}

fn ids(raw: &[&str]) -> Vec<CanonicalId> {
    raw.iter().map(|r| id(r)).collect()
}

fn build(config: &GraphConfig) -> ReferenceGraph {
    Pipeline::new(config.clone(), &OfflineSource)
        .load_or_build(false)
        .unwrap()
        .graph
}

#[test]
fn test_fixture_graph_structure() {
    let (_dir, config) = seeded_data_dir();
    let graph = build(&config);

    assert_eq!(graph.node_count(), 9);
    assert_eq!(graph.edge_count(), 10);

    assert_eq!(graph.neighbours(&id("A1")).unwrap(), ids(&["A5", "R1", "R2", "R8"]));
    assert_eq!(
        graph.neighbours(&id("A5")).unwrap(),
        ids(&["A6", "A7", "R28", "R29"])
    );
    assert_eq!(graph.predecessors(&id("A5")).unwrap(), ids(&["A1", "R28"]));

    // Heading plus raw-text mention of the same article
    assert_eq!(graph.edge_occurrences(&id("R1"), &id("A1")), Some(2));
    assert_eq!(graph.edge_occurrences(&id("R28"), &id("A5")), Some(2));
}

#[test]
fn test_fixture_placeholders() {
    let (_dir, config) = seeded_data_dir();
    let graph = build(&config);

    let fetched: Vec<_> = graph
        .nodes_sorted()
        .iter()
        .filter(|node| node.fetched)
        .map(|node| node.id.to_string())
        .collect();
    assert_eq!(fetched, ["A1", "A5", "R1", "R28"]);

    let node = graph.node(&id("R29")).unwrap();
    assert_eq!(node.node_type, ItemType::Recital);
    assert_eq!(node.title, None);

    // Article 120 is out of range and never becomes a node
    assert!(!graph.contains(&id("A120")));
}

#[test]
fn test_processed_table_written() {
    let (_dir, config) = seeded_data_dir();
    build(&config);

    let table = fs::read_to_string(config.processed_table_path()).unwrap();
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(
        lines,
        [
            "ID,Type,Title,1,2,3,4,5",
            "A1,Article,Article 1: Subject Matter,R1,R2,R8,A5,",
            "A5,Article,Article 5: Prohibited AI Practices,R28,R29,,A6,A7",
            "R1,Recital,Recital 1,A1,,,A1,",
            "R28,Recital,Recital 28,A5,,,A5,",
        ]
    );
}

#[test]
fn test_second_run_uses_saved_graph() {
    let (_dir, config) = seeded_data_dir();
    let pipeline = Pipeline::new(config.clone(), &OfflineSource);

    let first = pipeline.load_or_build(false).unwrap();
    assert_eq!(first.origin, GraphOrigin::Built { fetched_corpus: false });
    assert_eq!(first.rows.len(), 4);

    // The input table is no longer needed once the graph is saved
    fs::remove_file(config.input_table_path()).unwrap();

    let second = pipeline.load_or_build(false).unwrap();
    assert_eq!(second.origin, GraphOrigin::Cache);
    assert_eq!(second.graph, first.graph);
}

#[test]
fn test_force_rebuilds() {
    let (_dir, config) = seeded_data_dir();
    let pipeline = Pipeline::new(config.clone(), &OfflineSource);

    let first = pipeline.load_or_build(false).unwrap();
    let forced = pipeline.load_or_build(true).unwrap();

    assert_eq!(forced.origin, GraphOrigin::Built { fetched_corpus: false });
    assert_eq!(forced.graph, first.graph);
}

#[test]
fn test_corrupt_artifact_is_error() {
    let (_dir, config) = seeded_data_dir();
    fs::write(config.graph_path(), "not json").unwrap();

    let err = Pipeline::new(config.clone(), &OfflineSource)
        .load_or_build(false)
        .unwrap_err();
    assert!(matches!(err, GraphError::CorruptArtifact { .. }), "got {err}");

    // Forcing a rebuild replaces the broken artifact
    Pipeline::new(config.clone(), &OfflineSource)
        .load_or_build(true)
        .unwrap();
    assert_eq!(build(&config).node_count(), 9);
}

#[test]
fn test_invalid_row_names_row_number() {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig::new(dir.path());
    fs::write(
        config.input_table_path(),
        "Type,ID,Title,Content\nArticle,1,Article 1,text\nAnnex,3,Annex III,text\n",
    )
    .unwrap();

    let err = Pipeline::new(config, &OfflineSource)
        .load_or_build(false)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Invalid row 3"), "got {message}");
    assert!(message.contains("Unknown item type 'Annex'"), "got {message}");
}

#[test]
fn test_duplicate_row_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig::new(dir.path());
    fs::write(
        config.input_table_path(),
        "Type,ID,Title,Content\nArticle,1,First,See Article 2.\nArticle,1,Second,See Article 3.\n",
    )
    .unwrap();

    let err = Pipeline::new(config.clone(), &OfflineSource)
        .load_or_build(false)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Invalid row 3"), "got {message}");
    assert!(message.contains("Duplicate item A1"), "got {message}");
    assert!(!config.graph_path().exists());
}

struct FixedSource(Vec<Item>);

impl CorpusSource for FixedSource {
    fn fetch_corpus(&self) -> aiact_harvester::Result<Corpus> {
        Ok(Corpus {
            items: self.0.clone(),
            warnings: Vec::new(),
        })
    }
}

#[test]
fn test_missing_table_fetched_from_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig::new(dir.path().join("fresh"));
    let source = FixedSource(vec![
        Item::new(ItemType::Article, 2, "Article 2", "Copy URL\nScope.\nFeedback").unwrap(),
        Item::new(
            ItemType::Recital,
            3,
            "Recital 3",
            "official translations.\nText.\nArticle 2: Scope",
        ).unwrap(),
    ]);

    let outcome = Pipeline::new(config.clone(), &source)
        .load_or_build(false)
        .unwrap();

    assert_eq!(outcome.origin, GraphOrigin::Built { fetched_corpus: true });
    assert_eq!(outcome.graph.predecessors(&id("A2")).unwrap(), ids(&["R3"]));
    assert!(config.input_table_path().exists());
    assert!(config.graph_path().exists());
}

#[test]
fn test_cli_build_and_query() {
    let (_dir, config) = seeded_data_dir();
    let data_dir = config.data_dir().to_path_buf();

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["build", "--offline", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: 9"))
        .stdout(predicate::str::contains("Edges: 10"));
    assert!(config.graph_path().exists());

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["neighbours", "A1", "--offline", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Article 5 - [go to article](https://artificialintelligenceact.eu/article/5/)",
        ))
        .stdout(predicate::str::contains(
            "Recital 8 - [go to recital](https://artificialintelligenceact.eu/recital/8/)",
        ));

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["nodes", "--offline", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Article 1: Subject Matter"));
}

#[test]
fn test_cli_unknown_node_fails() {
    let (_dir, config) = seeded_data_dir();

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["neighbours", "A99", "--offline", "--data-dir"])
        .arg(config.data_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node A99 is not in the graph"));
}

#[test]
fn test_cli_missing_table_offline_fails() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["build", "--offline", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is missing and fetching the corpus failed"));
}

#[test]
fn test_cli_data_dir_from_env() {
    let (_dir, config) = seeded_data_dir();

    Command::cargo_bin("aiact-graph")
        .unwrap()
        .args(["build", "--offline"])
        .env("AIACT_DATA_DIR", config.data_dir())
        .assert()
        .success();
    assert!(config.processed_table_path().exists());
}
