//! Bounded-size text chunking with overlap.
//!
//! Walks the text in windows of `max_size`, breaking at the last sentence
//! end inside the window, then the last space, else hard-cutting at the
//! boundary. Adjacent chunks overlap by up to `overlap` characters so a
//! sentence split across two chunks stays reachable from both sides.

/// Split `text` into overlapping chunks of at most `max_size` bytes.
///
/// The final window emits the remainder as-is. Position advances by at
/// least one character per iteration, so this terminates on any finite
/// input, including `overlap >= max_size`. Empty input yields an empty
/// vector; input within `max_size` yields the trimmed input alone.
pub fn chunk_text(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let len = text.len();
    let mut pos = 0usize;

    while pos < len {
        let mut end = (pos + max_size).min(len);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= pos {
            // max_size smaller than the next character; take that character
            end = next_boundary(text, pos);
        }

        if end == len {
            let tail = text[pos..].trim();
            if !tail.is_empty() {
                chunks.push(tail.to_string());
            }
            break;
        }

        let window = &text[pos..end];
        let chunk_end = match window.rfind('.') {
            Some(p) if p > 0 => pos + p + 1,
            _ => match window.rfind(' ') {
                Some(p) if p > 0 => pos + p,
                _ => end,
            },
        };

        let chunk = text[pos..chunk_end].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        // Step back by the overlap, but always past the previous position.
        let mut candidate = chunk_end.saturating_sub(overlap);
        while !text.is_char_boundary(candidate) {
            candidate -= 1;
        }
        pos = candidate.max(next_boundary(text, pos));
    }

    chunks
}

/// Byte offset of the character following the one at `pos`.
fn next_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(chunk_text("", 100, 10).is_empty());
    }

    #[test]
    fn short_input_is_single_trimmed_chunk() {
        let chunks = chunk_text("  A short sentence.  ", 100, 10);
        assert_eq!(chunks, vec!["A short sentence."]);
    }

    #[test]
    fn breaks_at_sentence_end() {
        let text = "First sentence here. Second sentence follows and runs longer.";
        let chunks = chunk_text(text, 30, 0);
        assert_eq!(chunks[0], "First sentence here.");
    }

    #[test]
    fn falls_back_to_whitespace_break() {
        let text = "no periods just words repeated over and over and over again";
        let chunks = chunk_text(text, 20, 0);
        for chunk in &chunks {
            assert!(chunk.len() <= 20, "chunk too long: {chunk:?}");
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn hard_cuts_unbreakable_runs() {
        let text = "a".repeat(95);
        let chunks = chunk_text(&text, 30, 0);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].len(), 30);
        assert_eq!(chunks[3].len(), 5);
    }

    #[test]
    fn no_content_lost_without_overlap() {
        let text = "The Renard R.31 was a Belgian reconnaissance aircraft. It first flew in 1934. \
                    It served during the German invasion of 1940 and proved obsolete.";
        let chunks = chunk_text(text, 40, 0);
        assert_eq!(strip_ws(&chunks.join("")), strip_ws(text));
    }

    #[test]
    fn overlap_duplicates_boundary_context() {
        let text = "word ".repeat(50);
        let chunks = chunk_text(&text, 40, 10);
        // Overlap re-reads the tail of the previous chunk
        assert!(strip_ws(&chunks.join("")).len() >= strip_ws(&text).len());
    }

    #[test]
    fn terminates_when_overlap_exceeds_max_size() {
        let text = "many words in a row with no stopping point at all here";
        let chunks = chunk_text(text, 10, 100);
        assert!(!chunks.is_empty());
        // Forward progress of at least one char per step bounds the output
        assert!(chunks.len() <= text.len());
    }

    #[test]
    fn multibyte_text_never_splits_a_char() {
        let text = "naïve café décor — ünïcödé everywhere, engagé résumé. ".repeat(10);
        for chunk in chunk_text(&text, 25, 5) {
            // would have panicked on a bad boundary; also sanity-check size
            assert!(chunk.len() <= 29);
        }
    }

    #[test]
    fn last_chunk_keeps_remainder_without_overlap_trim() {
        let text = "One full sentence here. tail";
        let chunks = chunk_text(text, 25, 5);
        assert_eq!(chunks[0], "One full sentence here.");
        // The final window starts `overlap` before the previous break and
        // runs to the end of the text.
        assert_eq!(chunks.last().map(String::as_str), Some("ere. tail"));
    }
}
