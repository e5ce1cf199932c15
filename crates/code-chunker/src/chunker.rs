use crate::assembler::{assemble, fallback_chunks};
use crate::error::Result;
use crate::language::Language;
use crate::parser::SyntaxParser;
use crate::sections::SectionIdentifier;
use crate::types::{Chunk, DEFAULT_CHUNK_TOKEN_LIMIT};
use std::path::Path;

/// Structural chunker for one language
///
/// Owns the syntax parser adapter and the section identifier for the
/// language it was dispatched to. Unknown extensions get an inert parser
/// and empty region tables, so any text file still chunks through the
/// remainder pass.
pub struct CodeChunker {
    language: Language,
    parser: SyntaxParser,
    identifier: SectionIdentifier,
}

impl CodeChunker {
    /// Create a chunker for a known language
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            parser: SyntaxParser::new(language),
            identifier: SectionIdentifier::new(language),
        }
    }

    /// Dispatch on a file extension without the dot, case-insensitive
    #[must_use]
    pub fn for_extension(ext: &str) -> Self {
        Self::new(Language::from_extension(ext))
    }

    /// Dispatch on a file path
    #[must_use]
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        Self::new(Language::from_path(path))
    }

    /// Language this chunker dispatches to
    pub fn language(&self) -> Language {
        self.language
    }

    /// Chunk source text into structural chunks
    ///
    /// Output order is class chunks, function chunks, then at most one
    /// remainder chunk. `token_limit` is a sizing hint only: class and
    /// function chunks keep their full structural extent even when they
    /// exceed it, which is a known limitation of the region-based design.
    /// Callers that need a hard ceiling must split downstream.
    ///
    /// This entry point never fails: parse problems degrade to
    /// remainder-only output and internal assembly errors degrade to a
    /// single whole-file chunk.
    pub fn chunk(
        &mut self,
        text: &str,
        token_limit: Option<usize>,
        file_name: Option<&str>,
    ) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = text.split('\n').collect();

        let tree = self.parser.parse(text);
        if tree.is_none() && self.language.supports_ast() {
            log::debug!(
                "No syntax tree for {} input, chunking remainder only",
                self.language.as_str()
            );
        }

        let (class_regions, function_regions) =
            self.identifier.identify(tree.as_ref(), text, &lines);

        let chunks = match assemble(&lines, &class_regions, &function_regions, file_name) {
            Ok(chunks) => chunks,
            Err(err) => {
                log::warn!(
                    "Region assembly failed for {}: {err}, emitting whole-file chunk",
                    file_name.unwrap_or("<text>")
                );
                return fallback_chunks(&lines, file_name);
            }
        };

        let limit = token_limit.unwrap_or(DEFAULT_CHUNK_TOKEN_LIMIT);
        for chunk in &chunks {
            if chunk.token_count > limit {
                log::debug!(
                    "Chunk at lines {}-{} exceeds token limit ({} > {limit})",
                    chunk.start_line,
                    chunk.end_line,
                    chunk.token_count
                );
            }
        }

        chunks
    }

    /// Chunk a file from disk
    ///
    /// Derives `file_name` from the path's base name. The language stays
    /// whatever this chunker was dispatched to; use [`CodeChunker::for_path`]
    /// to match it to the file.
    pub fn chunk_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file_name = path.file_name().and_then(|name| name.to_str());
        Ok(self.chunk(&text, None, file_name))
    }
}
