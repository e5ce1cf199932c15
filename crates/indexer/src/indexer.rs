use crate::error::Result;
use crate::sink::ChunkSink;
use crate::source::SourceProvider;
use crate::stats::{IndexProgress, IndexStats};
use repo_rag_code_chunker::{Chunk, CodeChunker};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Callback invoked with running counters during a batch run
pub type ProgressFn = Arc<dyn Fn(&IndexProgress) + Send + Sync>;

/// Knobs for a batch indexing run
#[derive(Clone)]
pub struct IndexerConfig {
    /// Per-file chunking budget; a file over this is recorded as problematic
    pub file_timeout: Duration,

    /// Files larger than this are skipped without chunking
    pub max_file_size_bytes: usize,

    /// Forwarded to the chunker as a sizing hint
    pub token_limit: Option<usize>,

    /// Invoked every few files and once at completion
    pub progress: Option<ProgressFn>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            file_timeout: Duration::from_secs(30),
            max_file_size_bytes: 10_000_000,
            token_limit: None,
            progress: None,
        }
    }
}

impl std::fmt::Debug for IndexerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerConfig")
            .field("file_timeout", &self.file_timeout)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("token_limit", &self.token_limit)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Extensions fed to the chunker during batch runs; anything else is skipped.
/// Direct chunker callers can still pass any extension they like.
const BATCH_EXTENSIONS: &[&str] = &[
    "py", "java", "cpp", "h", "hpp", "js", "jsx", "ts", "tsx", "go", "html", "htm", "md",
];

const PROGRESS_EVERY: usize = 5;

/// Sequential batch indexer over a source provider
pub struct RepoIndexer<P> {
    provider: P,
    config: IndexerConfig,
}

impl<P: SourceProvider> RepoIndexer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, IndexerConfig::default())
    }

    pub fn with_config(provider: P, config: IndexerConfig) -> Self {
        Self { provider, config }
    }

    /// Chunk every supported file and deliver the chunks to the sink
    ///
    /// Per-file failures (read errors, chunker panics, timeouts) are recorded
    /// in the returned stats and never abort the run. Sink failures do abort:
    /// without a working sink the run has nowhere to put its output.
    pub async fn index_into<S: ChunkSink>(
        &self,
        sink: &mut S,
        namespace: &str,
    ) -> Result<IndexStats> {
        let start = Instant::now();
        let mut stats = IndexStats::new();

        // 1. Discover candidate files
        let files = self.provider.list_files()?;
        stats.total_files = files.len();
        log::info!("Indexing {} files into namespace {namespace}", files.len());

        // 2. Chunk them one at a time
        for (idx, relative) in files.iter().enumerate() {
            if idx % PROGRESS_EVERY == 0 || idx + 1 == files.len() {
                self.emit_progress(&stats);
            }

            if !has_supported_extension(relative) {
                log::debug!("Skipping unsupported file {}", relative.display());
                stats.record_skipped();
                continue;
            }

            let text = match self.provider.read_text(relative) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    stats.record_skipped();
                    continue;
                }
                Err(err) => {
                    log::warn!("Failed to read {}: {err}", relative.display());
                    stats.record_problem(relative.display().to_string(), err.to_string());
                    continue;
                }
            };

            if text.len() > self.config.max_file_size_bytes {
                log::debug!(
                    "Skipping large file {} ({} bytes)",
                    relative.display(),
                    text.len()
                );
                stats.record_skipped();
                continue;
            }

            if text.trim().is_empty() {
                log::debug!("Skipping empty file {}", relative.display());
                stats.record_skipped();
                continue;
            }

            match self.chunk_with_timeout(relative, text).await {
                FileOutcome::Done(mut chunks) => {
                    stamp_origin(&mut chunks, relative);
                    if !chunks.is_empty() {
                        sink.upsert(&chunks, namespace).await?;
                    }
                    log::debug!("Processed {} ({} chunks)", relative.display(), chunks.len());
                    stats.record_processed(chunks.len());
                }
                FileOutcome::TimedOut => {
                    log::warn!("Chunking timed out for {}", relative.display());
                    stats.record_problem(relative.display().to_string(), "timeout");
                }
                FileOutcome::Failed(reason) => {
                    log::warn!("Chunking failed for {}: {reason}", relative.display());
                    stats.record_problem(relative.display().to_string(), reason);
                }
            }
        }

        // 3. Final accounting
        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = start.elapsed().as_millis() as u64;
            if stats.time_ms == 0 {
                stats.time_ms = 1;
            }
        }
        self.emit_progress(&stats);
        log::info!("Indexing completed: {stats}");

        Ok(stats)
    }

    /// Chunking is CPU bound, so it runs on the blocking pool while the
    /// async side enforces the per-file budget
    async fn chunk_with_timeout(&self, relative: &Path, text: String) -> FileOutcome<Vec<Chunk>> {
        let ext = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        let file_name = relative
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
        let token_limit = self.config.token_limit;

        let task = tokio::task::spawn_blocking(move || {
            let mut chunker = CodeChunker::for_extension(&ext);
            chunker.chunk(&text, token_limit, file_name.as_deref())
        });
        await_with_timeout(task, self.config.file_timeout).await
    }

    fn emit_progress(&self, stats: &IndexStats) {
        if let Some(progress) = &self.config.progress {
            progress(&stats.progress());
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum FileOutcome<T> {
    Done(T),
    TimedOut,
    Failed(String),
}

/// Race a worker against a deadline
///
/// On timeout the handle is dropped, which detaches the worker: blocking
/// tasks cannot be interrupted once running, so the task finishes on its own
/// and its result is discarded.
pub(crate) async fn await_with_timeout<T: Send + 'static>(
    task: JoinHandle<T>,
    limit: Duration,
) -> FileOutcome<T> {
    match tokio::time::timeout(limit, task).await {
        Ok(Ok(value)) => FileOutcome::Done(value),
        Ok(Err(join_err)) => FileOutcome::Failed(format!("worker failed: {join_err}")),
        Err(_) => FileOutcome::TimedOut,
    }
}

fn has_supported_extension(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        let ext = ext.to_lowercase();
        return BATCH_EXTENSIONS
            .iter()
            .any(|candidate| candidate == &ext);
    }
    false
}

fn stamp_origin(chunks: &mut [Chunk], relative: &Path) {
    let file_path = relative.to_string_lossy();
    for chunk in chunks {
        chunk.file_path = Some(file_path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct FakeSource {
        files: Vec<(PathBuf, Vec<u8>)>,
        listed_but_missing: Vec<PathBuf>,
    }

    impl FakeSource {
        fn new(files: Vec<(&str, &[u8])>) -> Self {
            Self {
                files: files
                    .into_iter()
                    .map(|(path, bytes)| (PathBuf::from(path), bytes.to_vec()))
                    .collect(),
                listed_but_missing: Vec::new(),
            }
        }
    }

    impl SourceProvider for FakeSource {
        fn list_files(&self) -> Result<Vec<PathBuf>> {
            let mut all: Vec<PathBuf> = self
                .files
                .iter()
                .map(|(path, _)| path.clone())
                .chain(self.listed_but_missing.iter().cloned())
                .collect();
            all.sort();
            Ok(all)
        }

        fn read_text(&self, relative: &Path) -> Result<Option<String>> {
            let bytes = self
                .files
                .iter()
                .find(|(path, _)| path == relative)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
                })?;
            Ok(String::from_utf8(bytes).ok())
        }
    }

    #[tokio::test]
    async fn timeout_detaches_a_slow_worker() {
        let task = tokio::task::spawn_blocking(|| {
            std::thread::sleep(Duration::from_millis(200));
            42
        });
        let outcome = await_with_timeout(task, Duration::from_millis(10)).await;
        assert_eq!(outcome, FileOutcome::TimedOut);
    }

    #[tokio::test]
    async fn fast_worker_completes() {
        let task = tokio::task::spawn_blocking(|| 42);
        let outcome = await_with_timeout(task, Duration::from_secs(1)).await;
        assert_eq!(outcome, FileOutcome::Done(42));
    }

    #[tokio::test]
    async fn panicking_worker_is_reported() {
        let task = tokio::task::spawn_blocking(|| -> i32 { panic!("boom") });
        let outcome = await_with_timeout(task, Duration::from_secs(1)).await;
        assert!(matches!(outcome, FileOutcome::Failed(_)));
    }

    #[test]
    fn batch_extension_filter() {
        assert!(has_supported_extension(Path::new("a.py")));
        assert!(has_supported_extension(Path::new("A.PY")));
        assert!(has_supported_extension(Path::new("doc/readme.md")));
        assert!(!has_supported_extension(Path::new("lib.c")));
        assert!(!has_supported_extension(Path::new("data.csv")));
        assert!(!has_supported_extension(Path::new("Makefile")));
    }

    #[tokio::test]
    async fn batch_run_accounts_for_every_file() {
        let source = FakeSource::new(vec![
            (
                "src/app.py",
                b"import os\nimport sys\nclass Foo:\n    def bar(self):\n        return 1\n".as_slice(),
            ),
            ("notes.py", &[0xff, 0xfe, 0x00]),
            ("empty.py", b"   \n"),
            ("data.csv", b"a,b\n1,2\n"),
            ("tool.go", b"package main\n"),
        ]);
        let indexer = RepoIndexer::new(source);
        let mut sink = MemorySink::new();

        let stats = indexer.index_into(&mut sink, "test-ns").await.unwrap();

        assert_eq!(stats.total_files, 5);
        assert_eq!(stats.processed_files, 2); // app.py and tool.go
        assert_eq!(stats.skipped_files, 3);
        assert_eq!(stats.processed_files + stats.skipped_files, stats.total_files);
        assert!(stats.problematic.is_empty());
        assert!(stats.time_ms >= 1);

        // tool.go is a single line, so only app.py contributed chunks
        assert_eq!(stats.chunks_created, 2);
        let chunks = sink.chunks("test-ns");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].class_name.as_deref(), Some("Foo"));
        assert_eq!(chunks[1].function_name.as_deref(), Some("other"));
        for chunk in chunks {
            assert_eq!(chunk.file_path.as_deref(), Some("src/app.py"));
            assert_eq!(chunk.file_name.as_deref(), Some("app.py"));
        }
    }

    #[tokio::test]
    async fn oversized_files_are_skipped() {
        let big = "# filler\n".repeat(200);
        let source = FakeSource::new(vec![
            ("big.py", big.as_bytes()),
            ("small.py", b"def f():\n    return 1\n"),
        ]);
        let config = IndexerConfig {
            max_file_size_bytes: 1000,
            ..IndexerConfig::default()
        };
        let indexer = RepoIndexer::with_config(source, config);
        let mut sink = MemorySink::new();

        let stats = indexer.index_into(&mut sink, "ns").await.unwrap();

        assert_eq!(stats.processed_files, 1);
        assert_eq!(stats.skipped_files, 1);
        assert_eq!(sink.chunks("ns").len(), 1);
    }

    #[tokio::test]
    async fn unreadable_files_are_problematic_but_do_not_abort() {
        let mut source = FakeSource::new(vec![("ok.py", b"def f():\n    return 1\n".as_slice())]);
        source.listed_but_missing.push(PathBuf::from("ghost.py"));
        let indexer = RepoIndexer::new(source);
        let mut sink = MemorySink::new();

        let stats = indexer.index_into(&mut sink, "ns").await.unwrap();

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.processed_files, 1);
        assert_eq!(stats.problematic.len(), 1);
        assert_eq!(stats.problematic[0].path, "ghost.py");
    }

    #[tokio::test]
    async fn progress_fires_on_cadence_and_completion() {
        let seen: Arc<Mutex<Vec<IndexProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);

        let source = FakeSource::new(vec![
            ("a.py", b"def a():\n    return 1\n".as_slice()),
            ("b.py", b"def b():\n    return 2\n"),
            ("c.py", b"def c():\n    return 3\n"),
        ]);
        let config = IndexerConfig {
            progress: Some(Arc::new(move |snapshot: &IndexProgress| {
                captured.lock().unwrap().push(*snapshot);
            })),
            ..IndexerConfig::default()
        };
        let indexer = RepoIndexer::with_config(source, config);
        let mut sink = MemorySink::new();

        indexer.index_into(&mut sink, "ns").await.unwrap();

        let snapshots = seen.lock().unwrap();
        // idx 0, the last file, and once at completion
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].processed_files, 0);
        assert_eq!(snapshots[2].processed_files, 3);
        assert_eq!(snapshots[2].chunks_created, 3);
    }
}
