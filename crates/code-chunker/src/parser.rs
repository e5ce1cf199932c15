use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::sections;
use tree_sitter::{Node, Parser, Tree};

/// Tree-sitter adapter for one language
///
/// Languages without a grammar (Markdown, unknown extensions) get an inert
/// adapter: `parse` returns `None` and assembly proceeds without AST
/// regions. Grammar setup failure degrades the same way instead of erroring.
pub struct SyntaxParser {
    language: Language,
    parser: Option<Parser>,
}

impl SyntaxParser {
    /// Create an adapter for a language
    pub fn new(language: Language) -> Self {
        let parser = if language.supports_ast() {
            match Self::grammar_parser(language) {
                Ok(parser) => Some(parser),
                Err(err) => {
                    log::warn!(
                        "Syntax parser unavailable for {}: {err}",
                        language.as_str()
                    );
                    None
                }
            }
        } else {
            None
        };

        Self { language, parser }
    }

    fn grammar_parser(language: Language) -> Result<Parser> {
        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(parser)
    }

    /// Language this adapter was built for
    pub fn language(&self) -> Language {
        self.language
    }

    /// Parse source text into a syntax tree
    ///
    /// `None` means no grammar is available or parsing failed; callers fall
    /// back to remainder-only assembly.
    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.as_mut()?.parse(text, None)
    }

    /// 0-indexed start rows of structural breakpoints, sorted and deduplicated
    ///
    /// For Markdown these are the header lines; for unknown languages the
    /// list is empty.
    pub fn breakpoint_lines(&mut self, text: &str) -> Vec<usize> {
        if self.language == Language::Markdown {
            return sections::markdown_header_lines(text);
        }
        let Some(tree) = self.parse(text) else {
            return Vec::new();
        };

        let language = self.language;
        let mut rows = Vec::new();
        collect_rows(
            tree.root_node(),
            |node| is_breakpoint(node, language),
            &mut rows,
        );
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// 0-indexed start rows of comment nodes, sorted and deduplicated
    pub fn comment_lines(&mut self, text: &str) -> Vec<usize> {
        let Some(tree) = self.parse(text) else {
            return Vec::new();
        };

        let comment_kinds = self.language.comment_node_types();
        let mut rows = Vec::new();
        collect_rows(
            tree.root_node(),
            |node| comment_kinds.contains(&node.kind()),
            &mut rows,
        );
        rows.sort_unstable();
        rows.dedup();
        rows
    }
}

fn is_breakpoint(node: Node<'_>, language: Language) -> bool {
    let kind = node.kind();
    if !language.breakpoint_node_types().contains(&kind) {
        return false;
    }
    // Python import lines count only at module scope
    if language == Language::Python && kind == "import_statement" {
        return node.parent().is_some_and(|parent| parent.kind() == "module");
    }
    true
}

fn collect_rows<'t, F>(node: Node<'t>, keep: F, rows: &mut Vec<usize>)
where
    F: Fn(Node<'t>) -> bool + Copy,
{
    if keep(node) {
        rows.push(node.start_position().row);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_rows(child, keep, rows);
    }
}
