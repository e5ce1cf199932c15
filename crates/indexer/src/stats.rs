use serde::{Deserialize, Serialize};
use std::fmt;

/// File that could not be chunked during a batch run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemFile {
    pub path: String,
    pub reason: String,
}

/// Counter snapshot handed to progress callbacks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexProgress {
    pub total_files: usize,
    pub processed_files: usize,
    pub skipped_files: usize,
    pub chunks_created: usize,
}

/// Statistics about one batch indexing run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexStats {
    /// Number of candidate files discovered
    pub total_files: usize,

    /// Number of files that produced chunks
    pub processed_files: usize,

    /// Number of files passed over (unsupported, binary, empty, failed)
    pub skipped_files: usize,

    /// Number of chunks delivered to the sink
    pub chunks_created: usize,

    /// Files that failed, with reasons
    pub problematic: Vec<ProblemFile>,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self, chunk_count: usize) {
        self.processed_files += 1;
        self.chunks_created += chunk_count;
    }

    pub fn record_skipped(&mut self) {
        self.skipped_files += 1;
    }

    /// Problem files count as skipped as well, so processed + skipped
    /// always covers every candidate file
    pub fn record_problem(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.problematic.push(ProblemFile {
            path: path.into(),
            reason: reason.into(),
        });
        self.skipped_files += 1;
    }

    pub fn progress(&self) -> IndexProgress {
        IndexProgress {
            total_files: self.total_files,
            processed_files: self.processed_files,
            skipped_files: self.skipped_files,
            chunks_created: self.chunks_created,
        }
    }
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} files processed, {} skipped, {} chunks in {}ms",
            self.processed_files,
            self.total_files,
            self.skipped_files,
            self.chunks_created,
            self.time_ms
        )?;
        if !self.problematic.is_empty() {
            write!(f, "\n{} problematic file(s):", self.problematic.len())?;
            for problem in &self.problematic {
                write!(f, "\n  {} ({})", problem.path, problem.reason)?;
            }
        }
        Ok(())
    }
}
