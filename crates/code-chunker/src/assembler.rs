use crate::builder::build_chunk;
use crate::error::{ChunkerError, Result};
use crate::types::{Chunk, Region};
use std::collections::HashSet;

/// Assemble chunks from identified regions
///
/// Output order is fixed: class chunks, then function chunks, then at most
/// one remainder chunk. Lines claimed by an emitted region chunk never
/// reappear in the remainder. A region spanning a single line is skipped
/// without claiming its line; a region pointing outside the line table is
/// an internal error and sends the caller to the whole-file fallback.
pub fn assemble(
    lines: &[&str],
    class_regions: &[Region],
    function_regions: &[Region],
    file_name: Option<&str>,
) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    let mut accounted: HashSet<usize> = HashSet::new();

    for region in class_regions.iter().chain(function_regions) {
        push_region_chunk(lines, region, file_name, &mut chunks, &mut accounted)?;
    }

    let mut remainder: Vec<&str> = Vec::new();
    let mut first_idx = None;
    for (i, line) in lines.iter().enumerate() {
        if accounted.contains(&i) || line.trim().is_empty() {
            continue;
        }
        if first_idx.is_none() {
            first_idx = Some(i);
        }
        remainder.push(line);
    }

    // A lone stray line is not worth a chunk of its own
    if remainder.len() > 1 {
        if let Some(start) = first_idx {
            if let Some(chunk) = build_chunk(&remainder, start, None, Some("other"), file_name) {
                chunks.push(chunk);
            }
        }
    }

    Ok(chunks)
}

fn push_region_chunk(
    lines: &[&str],
    region: &Region,
    file_name: Option<&str>,
    chunks: &mut Vec<Chunk>,
    accounted: &mut HashSet<usize>,
) -> Result<()> {
    // Unnamed regions fall through to the remainder pass
    let Some(name) = region.name.as_deref() else {
        return Ok(());
    };

    if region.start_line > region.end_line || region.end_line >= lines.len() {
        return Err(ChunkerError::RegionOutOfBounds {
            start: region.start_line,
            end: region.end_line,
            lines: lines.len(),
        });
    }

    // Declaration-only spans are skipped without claiming the line
    if region.line_count() <= 1 {
        return Ok(());
    }

    let slice = &lines[region.start_line..=region.end_line];
    let (class_name, function_name) = if region.kind.is_class_like() {
        (Some(name), None)
    } else {
        (None, Some(name))
    };

    if let Some(chunk) = build_chunk(
        slice,
        region.start_line,
        class_name,
        function_name,
        file_name,
    ) {
        chunks.push(chunk);
        accounted.extend(region.start_line..=region.end_line);
    }

    Ok(())
}

/// Whole-file fallback for when region assembly fails internally
///
/// Multi-line input becomes exactly one chunk tagged "entire_file";
/// anything shorter produces no chunks. Never fails.
pub fn fallback_chunks(lines: &[&str], file_name: Option<&str>) -> Vec<Chunk> {
    if lines.len() > 1 {
        build_chunk(lines, 0, None, Some("entire_file"), file_name)
            .into_iter()
            .collect()
    } else {
        Vec::new()
    }
}
