//! # Repo RAG Indexer
//!
//! Batch indexing for repository retrieval: walk a repository, chunk every
//! supported file, and deliver the chunks to a sink.
//!
//! ## Pipeline
//!
//! ```text
//! Repository root
//!     │
//!     ├──> Source Provider (.gitignore aware)
//!     │      └─> Candidate files
//!     │
//!     ├──> Code Chunker (per file, with timeout)
//!     │      └─> Structural chunks
//!     │
//!     └──> Chunk Sink (namespace scoped)
//!            └─> JSONL file / in-memory store
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use repo_rag_indexer::{LocalSource, MemorySink, RepoIndexer};
//!
//! #[tokio::main]
//! async fn main() -> repo_rag_indexer::Result<()> {
//!     let source = LocalSource::new("/path/to/repo")?;
//!     let indexer = RepoIndexer::new(source);
//!
//!     let mut sink = MemorySink::new();
//!     let stats = indexer.index_into(&mut sink, "my-repo").await?;
//!
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```

mod error;
mod indexer;
mod sink;
mod source;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{IndexerConfig, ProgressFn, RepoIndexer};
pub use sink::{ChunkSink, JsonlSink, MemorySink};
pub use source::{LocalSource, SourceProvider};
pub use stats::{IndexProgress, IndexStats, ProblemFile};
