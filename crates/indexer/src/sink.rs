use crate::error::Result;
use async_trait::async_trait;
use repo_rag_code_chunker::Chunk;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Destination for produced chunks
///
/// Embedding, storage, and retrieval live behind this boundary; the indexer
/// only delivers chunks grouped under a namespace.
#[async_trait]
pub trait ChunkSink {
    async fn upsert(&mut self, chunks: &[Chunk], namespace: &str) -> Result<()>;
}

/// In-memory sink, one bucket per namespace
#[derive(Debug, Default)]
pub struct MemorySink {
    buckets: HashMap<String, Vec<Chunk>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self, namespace: &str) -> &[Chunk] {
        self.buckets
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChunkSink for MemorySink {
    async fn upsert(&mut self, chunks: &[Chunk], namespace: &str) -> Result<()> {
        self.buckets
            .entry(namespace.to_string())
            .or_default()
            .extend_from_slice(chunks);
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonlRecord<'a> {
    namespace: &'a str,
    #[serde(flatten)]
    chunk: &'a Chunk,
}

/// Appends one JSON record per chunk to a file
pub struct JsonlSink {
    path: PathBuf,
    file: tokio::fs::File,
}

impl JsonlSink {
    /// Create (or truncate) the output file
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::create(&path).await?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChunkSink for JsonlSink {
    async fn upsert(&mut self, chunks: &[Chunk], namespace: &str) -> Result<()> {
        let mut buf = String::new();
        for chunk in chunks {
            let record = JsonlRecord { namespace, chunk };
            buf.push_str(&serde_json::to_string(&record)?);
            buf.push('\n');
        }
        self.file.write_all(buf.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_chunk(text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            start_line: 1,
            end_line: 1,
            token_count: 3,
            class_name: None,
            function_name: Some("other".to_string()),
            file_name: Some("a.py".to_string()),
            file_path: Some("src/a.py".to_string()),
        }
    }

    #[tokio::test]
    async fn memory_sink_groups_by_namespace() {
        let mut sink = MemorySink::new();
        sink.upsert(&[sample_chunk("x = 1")], "repo-a").await.unwrap();
        sink.upsert(&[sample_chunk("y = 2")], "repo-b").await.unwrap();
        sink.upsert(&[sample_chunk("z = 3")], "repo-a").await.unwrap();

        assert_eq!(sink.chunks("repo-a").len(), 2);
        assert_eq!(sink.chunks("repo-b").len(), 1);
        assert_eq!(sink.chunks("repo-c").len(), 0);
        assert_eq!(sink.len(), 3);
    }

    #[tokio::test]
    async fn jsonl_sink_writes_one_record_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.jsonl");

        let mut sink = JsonlSink::create(&path).await.unwrap();
        sink.upsert(&[sample_chunk("x = 1"), sample_chunk("y = 2")], "repo-a")
            .await
            .unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["namespace"], "repo-a");
        assert_eq!(record["chunk"], "x = 1");
        assert_eq!(record["file_path"], "src/a.py");
    }
}
