use repo_rag_indexer::{JsonlSink, LocalSource, MemorySink, RepoIndexer};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn indexes_a_repository_end_to_end() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(
        temp.path().join("src/model.py"),
        "import os\nimport sys\nclass Model:\n    def predict(self, x):\n        return x\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("README.md"),
        "# Project\n\nSome words.\n\n## Usage\n\nRun it.\n",
    )
    .unwrap();
    fs::write(temp.path().join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff]).unwrap();

    let source = LocalSource::new(temp.path()).unwrap();
    let indexer = RepoIndexer::new(source);
    let mut sink = MemorySink::new();

    let stats = indexer.index_into(&mut sink, "demo").await.unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.processed_files, 2);
    assert_eq!(stats.skipped_files, 1);
    assert!(stats.problematic.is_empty(), "got: {:?}", stats.problematic);

    let chunks = sink.chunks("demo");
    assert_eq!(chunks.len(), stats.chunks_created);
    assert!(
        chunks.iter().any(|c| c.class_name.as_deref() == Some("Model")),
        "got: {chunks:#?}"
    );
    assert!(chunks
        .iter()
        .any(|c| c.file_path.as_deref() == Some("src/model.py")));
    assert!(chunks
        .iter()
        .any(|c| c.file_path.as_deref() == Some("README.md")));
    assert!(chunks.iter().all(|c| c.file_name.is_some()));
}

#[tokio::test]
async fn writes_chunk_records_to_jsonl() {
    let repo = tempdir().unwrap();
    fs::write(repo.path().join("app.py"), "def run():\n    return 0\n").unwrap();

    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("chunks.jsonl");

    let source = LocalSource::new(repo.path()).unwrap();
    let indexer = RepoIndexer::new(source);
    let mut sink = JsonlSink::create(&out).await.unwrap();

    let stats = indexer.index_into(&mut sink, "demo").await.unwrap();
    drop(sink);

    let text = fs::read_to_string(&out).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), stats.chunks_created);
    assert_eq!(records[0]["namespace"], "demo");
    assert_eq!(records[0]["function_name"], "run");
    assert_eq!(records[0]["file_path"], "app.py");
    assert_eq!(records[0]["start_line"], 1);
}
