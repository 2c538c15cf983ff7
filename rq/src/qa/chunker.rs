//! Text chunker - overlapping character windows with boundary snapping
//!
//! Windows are measured in characters, not bytes, so multi-byte text
//! never splits mid-codepoint. Each window greedily packs up to
//! `chunk_size` characters, then pulls the cut back to the nearest
//! soft boundary within a bounded lookback: paragraph break, then line
//! break, then sentence-ending punctuation, then word boundary, then a
//! hard cut. The next window starts exactly `chunk_overlap` characters
//! before the previous cut.

use tracing::debug;

use super::QaError;

/// Split `text` into ordered, overlapping chunks
///
/// Adjacent chunks overlap by exactly `chunk_overlap` characters. The
/// lookback used for boundary snapping is capped so every non-final
/// chunk is strictly longer than the overlap, which guarantees forward
/// progress. Empty input produces no chunks.
///
/// # Errors
///
/// `QaError::InvalidArgument` if `chunk_size` is zero or
/// `chunk_overlap >= chunk_size`.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>, QaError> {
    if chunk_size == 0 {
        return Err(QaError::InvalidArgument("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(QaError::InvalidArgument(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunk_overlap, chunk_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    // Cap the lookback so chunk length stays above the overlap
    let lookback = (chunk_size / 5).min(chunk_size - chunk_overlap - 1);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let hard_end = (start + chunk_size).min(chars.len());
        let cut = if hard_end == chars.len() {
            hard_end
        } else {
            find_cut(&chars, hard_end, lookback)
        };

        chunks.push(chars[start..cut].iter().collect());

        if cut == chars.len() {
            break;
        }
        start = cut - chunk_overlap;
    }

    debug!(
        chunk_count = chunks.len(),
        chunk_size, chunk_overlap, "split_text: produced chunks"
    );
    Ok(chunks)
}

/// Find the cut position for a window ending at `hard_end`
///
/// Scans backwards within `lookback` characters for the highest-priority
/// boundary class; within a class the nearest preceding boundary wins.
/// A cut at position `p` means the chunk ends just before `chars[p]`.
fn find_cut(chars: &[char], hard_end: usize, lookback: usize) -> usize {
    let floor = hard_end - lookback;

    // Paragraph break: cut right after "\n\n"
    for p in (floor..=hard_end).rev() {
        if p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n' {
            return p;
        }
    }

    // Line break
    for p in (floor..=hard_end).rev() {
        if p >= 1 && chars[p - 1] == '\n' {
            return p;
        }
    }

    // Sentence end: punctuation followed by whitespace
    for p in (floor..=hard_end).rev() {
        if p >= 2 && chars[p - 1].is_whitespace() && matches!(chars[p - 2], '.' | '!' | '?') {
            return p;
        }
    }

    // Word boundary
    for p in (floor..=hard_end).rev() {
        if p >= 1 && chars[p - 1].is_whitespace() {
            return p;
        }
    }

    hard_end
}
