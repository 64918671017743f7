//! Prose vs fragment classification.
//!
//! Distinguishes narrative paragraphs (long, unmarked, flowing) from
//! infobox-style label lists and bulleted fragments that get collapsed into
//! compact `key: value; key: value` passages instead.

use std::sync::LazyLock;

use regex::Regex;

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.)+\-*•◦‣⁃●○⚫]+\s").expect("valid regex"));

static ALPHA_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][.)]\s").expect("valid regex"));

static LABEL_VALUE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\n:]+:\s").expect("valid regex"));

static BOLD_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").expect("valid regex"));

static BOLD_DELIM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__").expect("valid regex"));

/// Leading-token pattern of a line; each line counts in at most one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    ListMarker,
    AlphaList,
    LabelValue,
    Plain,
}

fn line_kind(line: &str) -> LineKind {
    if LIST_MARKER_RE.is_match(line) {
        LineKind::ListMarker
    } else if ALPHA_LIST_RE.is_match(line) {
        LineKind::AlphaList
    } else if LABEL_VALUE_LINE_RE.is_match(line) {
        LineKind::LabelValue
    } else {
        LineKind::Plain
    }
}

/// Decide whether a raw block is prose fit for direct inclusion.
///
/// Classification inspects raw markup, so callers must not normalize the
/// block first. All conditions must hold:
/// - trimmed length >= `min_length`
/// - at most one line per list-like leading pattern (one is tolerated as a
///   false-positive guard)
/// - bold fraction of the delimiter-stripped length below
///   `max_bold_percentage`, and that stripped length non-zero
///
/// Total and deterministic on any string input.
pub fn is_paragraph(text: &str, min_length: usize, max_bold_percentage: f64) -> bool {
    if text.trim().len() < min_length {
        return false;
    }

    let mut markers = 0usize;
    let mut alphas = 0usize;
    let mut labels = 0usize;

    for line in text.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line_kind(line) {
            LineKind::ListMarker => markers += 1,
            LineKind::AlphaList => alphas += 1,
            LineKind::LabelValue => labels += 1,
            LineKind::Plain => {}
        }
    }

    // Repeated list-like lines signal a fragment list, not prose.
    if markers > 1 || alphas > 1 || labels > 1 {
        return false;
    }

    let bold_len: usize = BOLD_SPAN_RE
        .captures_iter(text)
        .map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().len())
                .unwrap_or(0)
        })
        .sum();

    let clean_len = BOLD_DELIM_RE.replace_all(text, "").trim().len();
    if clean_len == 0 {
        return false;
    }

    let bold_percentage = (bold_len as f64 / clean_len as f64) * 100.0;
    bold_percentage < max_bold_percentage
}
