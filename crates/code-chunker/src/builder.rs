use crate::tokens;
use crate::types::Chunk;

/// Build one chunk from a slice of source lines
///
/// `start_idx` is the 0-indexed position of the first line in the original
/// file; output line numbers are 1-indexed and the end line is derived from
/// the slice length. Returns `None` for an empty slice or text that is
/// blank after joining. Pure: no logging, no side effects.
pub fn build_chunk(
    lines: &[&str],
    start_idx: usize,
    class_name: Option<&str>,
    function_name: Option<&str>,
    file_name: Option<&str>,
) -> Option<Chunk> {
    if lines.is_empty() {
        return None;
    }

    let text = lines.join("\n");
    if text.trim().is_empty() {
        return None;
    }

    let token_count = tokens::count_tokens(&text);
    Some(Chunk {
        text,
        start_line: start_idx + 1,
        end_line: start_idx + lines.len(),
        token_count,
        class_name: class_name.map(str::to_string),
        function_name: function_name.map(str::to_string),
        file_name: file_name.map(str::to_string),
        file_path: None,
    })
}
