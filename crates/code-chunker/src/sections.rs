use crate::language::Language;
use crate::types::{Region, RegionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Tree};

/// ATX header: 1-6 hashes, whitespace, a non-empty title
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("header pattern is valid"));

/// Splits a parsed file into class-like and function-like regions
///
/// AST languages walk the tree once, depth-first. Markdown never sees a
/// tree; header sections land in the class slot and fenced code blocks in
/// the function slot, so both flow through the same assembly passes.
pub struct SectionIdentifier {
    language: Language,
}

impl SectionIdentifier {
    /// Create an identifier for a language
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Identify chunk-worthy regions
    ///
    /// Returns `(class_regions, function_regions)` in discovery order. A
    /// missing tree yields empty lists for AST languages, which sends every
    /// line to the remainder pass.
    pub fn identify(
        &self,
        tree: Option<&Tree>,
        text: &str,
        lines: &[&str],
    ) -> (Vec<Region>, Vec<Region>) {
        if self.language == Language::Markdown {
            return markdown_regions(lines);
        }

        let Some(tree) = tree else {
            return (Vec::new(), Vec::new());
        };

        let mut classes = Vec::new();
        let mut functions = Vec::new();
        self.walk(
            tree.root_node(),
            false,
            text,
            lines,
            &mut classes,
            &mut functions,
        );
        (classes, functions)
    }

    /// Depth-first region discovery
    ///
    /// The inside_class flag is set on entering a class node and stays set
    /// for every descendant, so neither nested classes nor methods become
    /// regions of their own. Matched function nodes claim their whole span;
    /// nothing inside them is mined further.
    fn walk(
        &self,
        node: Node<'_>,
        inside_class: bool,
        text: &str,
        lines: &[&str],
        classes: &mut Vec<Region>,
        functions: &mut Vec<Region>,
    ) {
        let kind = node.kind();

        if !inside_class && self.language.class_node_types().contains(&kind) {
            if let Some(name) = region_name(node, text, lines, RegionKind::Class) {
                classes.push(Region::new(
                    node.start_position().row,
                    node.end_position().row,
                    Some(name),
                    RegionKind::Class,
                ));
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                self.walk(child, true, text, lines, classes, functions);
            }
            return;
        }

        if !inside_class && self.language.function_node_types().contains(&kind) {
            if let Some(name) = region_name(node, text, lines, RegionKind::Function) {
                functions.push(Region::new(
                    node.start_position().row,
                    node.end_position().row,
                    Some(name),
                    RegionKind::Function,
                ));
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, inside_class, text, lines, classes, functions);
        }
    }
}

/// Extract a region name, or signal that the region should be dropped
fn region_name(
    node: Node<'_>,
    text: &str,
    lines: &[&str],
    kind: RegionKind,
) -> Option<String> {
    if let Some(name) = identifier_child_name(node, text) {
        return Some(name);
    }
    fallback_name(lines.get(node.start_position().row)?, kind)
}

/// Name from the first identifier-typed child, or an identifier nested in a
/// declarator child (C-family function definitions)
fn identifier_child_name(node: Node<'_>, text: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" | "type_identifier" => {
                return text.get(child.byte_range()).map(str::to_string);
            }
            "function_declarator" => {
                let mut inner = child.walk();
                for part in child.children(&mut inner) {
                    if part.kind() == "identifier" {
                        return text.get(part.byte_range()).map(str::to_string);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Last-resort name from the declaration line itself
///
/// Splits after the introducing keyword and stops at the first of '{', '(',
/// ':', "extends", "implements". An empty result means no name.
fn fallback_name(line: &str, kind: RegionKind) -> Option<String> {
    const STOPS: [&str; 5] = ["{", "(", ":", "extends", "implements"];

    let keywords: &[&str] = match kind {
        RegionKind::Class => &["class ", "struct ", "interface "],
        RegionKind::Function => &["def ", "function "],
        _ => &[],
    };

    for keyword in keywords {
        if let Some(idx) = line.find(keyword) {
            let rest = &line[idx + keyword.len()..];
            let end = STOPS
                .iter()
                .filter_map(|stop| rest.find(stop))
                .min()
                .unwrap_or(rest.len());
            let name = rest[..end].trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Markdown header lines (0-indexed), fence-aware
pub(crate) fn markdown_header_lines(text: &str) -> Vec<usize> {
    let mut rows = Vec::new();
    let mut in_block = false;
    for (i, line) in text.split('\n').enumerate() {
        if line.trim().starts_with("```") {
            in_block = !in_block;
            continue;
        }
        if !in_block && HEADER_RE.is_match(line) {
            rows.push(i);
        }
    }
    rows
}

/// Markdown region discovery: header sections and fenced code blocks
///
/// A section runs from its header to the line before the next header of
/// equal or shallower depth, else to the end of the file; single-line
/// sections are not recorded. A fenced block needs at least one interior
/// line, and an unclosed fence records nothing. The forward scan for a
/// section terminator intentionally looks at raw header lines, fenced or
/// not.
fn markdown_regions(lines: &[&str]) -> (Vec<Region>, Vec<Region>) {
    let mut sections = Vec::new();
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut block_start = 0usize;
    let mut block_lang = String::new();

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if in_block {
                if i > block_start + 1 {
                    let name = if block_lang.is_empty() {
                        "code_block".to_string()
                    } else {
                        format!("code_block_{block_lang}")
                    };
                    blocks.push(Region::new(block_start, i, Some(name), RegionKind::Block));
                }
                in_block = false;
            } else {
                in_block = true;
                block_start = i;
                block_lang = trimmed[3..].trim().to_string();
            }
            continue;
        }

        if in_block {
            continue;
        }

        if let Some(caps) = HEADER_RE.captures(line) {
            let level = caps[1].len();
            let title = caps[2].trim();

            let mut end = i;
            for j in (i + 1)..lines.len() {
                if let Some(next) = HEADER_RE.captures(lines[j]) {
                    if next[1].len() <= level {
                        end = j - 1;
                        break;
                    }
                }
                end = j;
            }

            if end > i {
                sections.push(Region::new(
                    i,
                    end,
                    Some(title.to_string()),
                    RegionKind::Section,
                ));
            }
        }
    }

    (sections, blocks)
}
