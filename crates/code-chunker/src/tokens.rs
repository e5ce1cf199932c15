use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Shared cl100k_base encoder, loaded on first use
///
/// Encoding is a read-only operation on `CoreBPE`, so concurrent counting
/// from multiple worker threads needs no further synchronization.
static ENCODER: Lazy<Option<CoreBPE>> = Lazy::new(|| match cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(err) => {
        log::warn!("Failed to load cl100k_base encoder, using character estimate: {err}");
        None
    }
});

/// Count tokens in a piece of text
///
/// Uses the cl100k_base vocabulary; if the encoder is unavailable the count
/// degrades to a character-based estimate.
pub fn count_tokens(text: &str) -> usize {
    match ENCODER.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens(text),
    }
}

/// Rough estimate: ~4 characters per token for code
fn estimate_tokens(text: &str) -> usize {
    (text.len() / 4).max(1)
}
