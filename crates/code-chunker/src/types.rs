use serde::{Deserialize, Serialize};

/// Default token budget hint for a single chunk
pub const DEFAULT_CHUNK_TOKEN_LIMIT: usize = 500;

/// A structural chunk in its wire form
///
/// `start_line` and `end_line` are 1-indexed and inclusive. The text field
/// serializes under the key `chunk`. Nullable fields always appear in the
/// JSON output as `null` rather than being omitted, so downstream consumers
/// see a stable record shape. `file_path` is never set by the engine; the
/// batch orchestrator stamps it with the path relative to the scan root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk text, lines joined with '\n'
    #[serde(rename = "chunk")]
    pub text: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Token count of the joined text
    pub token_count: usize,

    /// Enclosing class name, when the chunk is a class region
    pub class_name: Option<String>,

    /// Function name, or the sentinels "other" / "entire_file"
    pub function_name: Option<String>,

    /// Base name of the source file, when known
    pub file_name: Option<String>,

    /// Path relative to the scan root, filled by the orchestrator
    pub file_path: Option<String>,
}

impl Chunk {
    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk covers a specific 1-indexed line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// A contiguous span of source lines identified as chunk-worthy
///
/// Both bounds are 0-indexed and inclusive. Regions never survive
/// identification without a name; the option exists because extraction can
/// fail mid-flight before the region is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// First line of the region (0-indexed)
    pub start_line: usize,

    /// Last line of the region (0-indexed, inclusive)
    pub end_line: usize,

    /// Extracted symbol or section name
    pub name: Option<String>,

    /// What kind of construct the region spans
    pub kind: RegionKind,
}

impl Region {
    /// Create a new region
    #[must_use]
    pub const fn new(
        start_line: usize,
        end_line: usize,
        name: Option<String>,
        kind: RegionKind,
    ) -> Self {
        Self {
            start_line,
            end_line,
            name,
            kind,
        }
    }

    /// Get the number of lines the region spans
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Kind of construct a region spans
///
/// `Section` and `Block` are the Markdown header-section and fenced-code
/// kinds; they flow through the same class and function passes as their AST
/// counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Class, struct, or similar type-introducing construct
    Class,
    /// Free function or method
    Function,
    /// Markdown header section
    Section,
    /// Markdown fenced code block
    Block,
}

impl RegionKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Section => "section",
            Self::Block => "block",
        }
    }

    /// Check if regions of this kind fill the class slot of the record
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk() -> Chunk {
        Chunk {
            text: "line one\nline two".to_string(),
            start_line: 10,
            end_line: 11,
            token_count: 5,
            class_name: None,
            function_name: Some("other".to_string()),
            file_name: Some("sample.py".to_string()),
            file_path: None,
        }
    }

    #[test]
    fn test_chunk_line_count() {
        let chunk = sample_chunk();
        assert_eq!(chunk.line_count(), 2);
    }

    #[test]
    fn test_chunk_contains_line() {
        let chunk = sample_chunk();
        assert!(chunk.contains_line(10));
        assert!(chunk.contains_line(11));
        assert!(!chunk.contains_line(9));
        assert!(!chunk.contains_line(12));
    }

    #[test]
    fn test_chunk_wire_shape() {
        let value = serde_json::to_value(sample_chunk()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("chunk"));
        assert!(!obj.contains_key("text"));
        assert_eq!(obj["chunk"], "line one\nline two");
        assert_eq!(obj["start_line"], 10);
        assert_eq!(obj["end_line"], 11);
        assert!(obj["class_name"].is_null());
        assert_eq!(obj["function_name"], "other");
        assert!(obj["file_path"].is_null());
    }

    #[test]
    fn test_chunk_deserialize() {
        let json = r#"{
            "chunk": "x = 1",
            "start_line": 1,
            "end_line": 1,
            "token_count": 4,
            "class_name": null,
            "function_name": null,
            "file_name": null,
            "file_path": "src/x.py"
        }"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.text, "x = 1");
        assert_eq!(chunk.file_path.as_deref(), Some("src/x.py"));
    }

    #[test]
    fn test_region_line_count() {
        let region = Region::new(3, 7, Some("Foo".to_string()), RegionKind::Class);
        assert_eq!(region.line_count(), 5);
        let single = Region::new(4, 4, Some("bar".to_string()), RegionKind::Function);
        assert_eq!(single.line_count(), 1);
    }

    #[test]
    fn test_region_kind() {
        assert_eq!(RegionKind::Class.as_str(), "class");
        assert_eq!(RegionKind::Block.as_str(), "block");
        assert!(RegionKind::Section.is_class_like());
        assert!(!RegionKind::Function.is_class_like());
    }
}
