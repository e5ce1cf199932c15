//! # Repo RAG Code Chunker
//!
//! Structural code chunking for repository-scale retrieval.
//!
//! ## Philosophy
//!
//! The chunker splits source files along the boundaries readers already
//! think in:
//! - Top-level classes and top-level functions become one chunk each
//! - Markdown splits on headers and fenced code blocks
//! - Everything left over is gathered into a single remainder chunk
//! - Files that cannot be parsed still produce usable output
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Language Dispatch (file extension)
//!     │
//!     ├──> Tree-sitter Parsing → syntax tree
//!     │
//!     ├──> Region Identification
//!     │    ├─> Top-level class regions (with names)
//!     │    ├─> Top-level function regions (with names)
//!     │    └─> Markdown sections and fenced blocks
//!     │
//!     └──> Chunk Assembly
//!          ├─> One chunk per named region
//!          ├─> Remainder chunk for unclaimed lines
//!          └─> Whole-file fallback on assembly errors
//! ```
//!
//! ## Example
//!
//! ```rust
//! use repo_rag_code_chunker::CodeChunker;
//!
//! let code = "def greet(name):\n    return f\"Hello, {name}\"\n";
//!
//! let mut chunker = CodeChunker::for_extension("py");
//! let chunks = chunker.chunk(code, None, Some("greet.py"));
//! for chunk in chunks {
//!     println!(
//!         "lines {}-{}: {}",
//!         chunk.start_line,
//!         chunk.end_line,
//!         chunk.function_name.unwrap_or_default()
//!     );
//! }
//! ```

mod assembler;
mod builder;
mod chunker;
mod error;
mod language;
mod parser;
mod sections;
mod tokens;
mod types;

pub use chunker::CodeChunker;
pub use error::{ChunkerError, Result};
pub use language::Language;
pub use parser::SyntaxParser;
pub use sections::SectionIdentifier;
pub use types::{Chunk, Region, RegionKind, DEFAULT_CHUNK_TOKEN_LIMIT};
