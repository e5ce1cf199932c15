use crate::error::{ChunkerError, Result};
use std::path::Path;

/// Language family a file dispatches to, keyed by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Cpp,
    Java,
    JavaScript,
    TypeScript,
    Html,
    Markdown,
    Go,
    Unknown,
}

impl Language {
    /// Detect language from file extension (without the dot)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" => Language::Python,
            "c" | "h" | "cpp" | "hpp" => Language::Cpp,
            "java" => Language::Java,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "html" | "htm" => Language::Html,
            "md" => Language::Markdown,
            "go" => Language::Go,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Html => "html",
            Language::Markdown => "markdown",
            Language::Go => "go",
            Language::Unknown => "unknown",
        }
    }

    /// Check if this language is supported for AST parsing
    ///
    /// HTML parses with the JavaScript grammar; the degenerate tree is
    /// tolerated and usually yields remainder-only chunks. Markdown is
    /// handled by pattern matching, not a grammar.
    pub fn supports_ast(self) -> bool {
        matches!(
            self,
            Language::Python
                | Language::Cpp
                | Language::Java
                | Language::JavaScript
                | Language::TypeScript
                | Language::Html
        )
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::Cpp => Ok(tree_sitter_cpp::LANGUAGE.into()),
            Language::Java => Ok(tree_sitter_java::LANGUAGE.into()),
            Language::JavaScript | Language::Html => {
                Ok(tree_sitter_javascript::LANGUAGE.into())
            }
            Language::TypeScript => {
                Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            }
            _ => Err(ChunkerError::unsupported_language(self.as_str())),
        }
    }

    /// Node kinds that introduce a class-like region
    pub fn class_node_types(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["class_definition"],
            Language::Cpp => &["class_specifier", "struct_specifier"],
            Language::Java => &["class_declaration"],
            Language::JavaScript | Language::TypeScript | Language::Html => {
                &["class_declaration", "class"]
            }
            _ => &[],
        }
    }

    /// Node kinds that introduce a function-like region
    pub fn function_node_types(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["function_definition"],
            Language::Cpp => &["function_definition"],
            Language::Java => &["method_declaration"],
            Language::JavaScript | Language::TypeScript | Language::Html => {
                &["function_declaration", "function_expression"]
            }
            _ => &[],
        }
    }

    /// Node kinds carrying comments
    pub fn comment_node_types(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["comment"],
            Language::Cpp => &["comment"],
            Language::Java => &["line_comment", "block_comment"],
            Language::JavaScript | Language::TypeScript | Language::Html => &["comment"],
            _ => &[],
        }
    }

    /// Node kinds whose start rows make natural split points
    pub fn breakpoint_node_types(self) -> &'static [&'static str] {
        match self {
            Language::Python => &[
                "import_statement",
                "function_definition",
                "class_definition",
            ],
            Language::Cpp => &[
                "function_definition",
                "class_specifier",
                "struct_specifier",
                "enum_specifier",
                "namespace_definition",
                "preproc_include",
                "preproc_define",
            ],
            Language::Java => &[
                "class_declaration",
                "method_declaration",
                "interface_declaration",
                "enum_declaration",
                "import_declaration",
                "package_declaration",
            ],
            Language::JavaScript | Language::TypeScript | Language::Html => &[
                "class_declaration",
                "function_declaration",
                "arrow_function",
                "method_definition",
                "import_statement",
                "export_statement",
            ],
            _ => &[],
        }
    }
}
