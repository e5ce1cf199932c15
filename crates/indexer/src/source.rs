use crate::error::{IndexerError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Where repository files come from
///
/// Paths are relative to the provider's root so they can be stamped onto
/// chunks as-is. `read_text` returns `Ok(None)` for content that is not
/// valid UTF-8; callers treat that as a binary file and skip it.
pub trait SourceProvider {
    /// Relative paths of all candidate files, sorted for deterministic runs
    fn list_files(&self) -> Result<Vec<PathBuf>>;

    /// Full text of one file, or `None` when the file is binary
    fn read_text(&self, relative: &Path) -> Result<Option<String>>;
}

/// Filesystem-backed provider (.gitignore aware)
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexerError::InvalidRoot(root.display().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for LocalSource {
    fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // do not index hidden files
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let path = entry.path();
                    files.push(path.strip_prefix(&self.root).unwrap_or(path).to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn read_text(&self, relative: &Path) -> Result<Option<String>> {
        let bytes = std::fs::read(self.root.join(relative))?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(_) => {
                log::debug!("Skipping binary file {}", relative.display());
                Ok(None)
            }
        }
    }
}
