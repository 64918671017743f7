//! Text-cleaning transforms for machine-converted markdown.
//!
//! Each transform is a pure `&str -> String` pass, applied independently by
//! the processor. Every pass is idempotent: re-applying it to its own
//! output is a no-op.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Page breaks
// ---------------------------------------------------------------------------

static PAGE_BREAK_JOIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Page marker plus any dangling single-word continuation around it,
    // e.g. "...the air\n-----\ncraft flew" left behind by the converter.
    Regex::new(r"\n*-----\n*((?:\w\s)+\n*)?(\w)").expect("valid regex")
});

static PAGE_BREAK_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-----").expect("valid regex"));

static EXCESS_NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Collapse page-separator markers into a single space and cap blank runs
/// at one empty line.
pub fn strip_page_breaks(s: &str) -> String {
    let s = PAGE_BREAK_JOIN_RE.replace_all(s, " $2");
    let s = PAGE_BREAK_BARE_RE.replace_all(&s, "");
    EXCESS_NEWLINES_RE.replace_all(&s, "\n\n").to_string()
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(http.*?\)").expect("valid regex"));

/// Rewrite `[text](http…)` to `text`, dropping the URL.
pub fn remove_links(s: &str) -> String {
    LINK_RE.replace_all(s, "$1").to_string()
}

// ---------------------------------------------------------------------------
// Reference markers
// ---------------------------------------------------------------------------

static REF_COMPOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\[\d{0,3}\])+\]").expect("valid regex"));

static REF_CITED_RE: LazyLock<Regex> = LazyLock::new(|| {
    // e.g. [[9]: 375 [10]]
    Regex::new(r"\[(\[\d{0,3}\]:\s*\d+\s*)+\[\d{0,3}\]\]").expect("valid regex")
});

static REF_RANGED_RE: LazyLock<Regex> = LazyLock::new(|| {
    // e.g. [[9]: 482–484], any dash variant
    Regex::new(r"\[\[\d{0,3}\]:\s*\d+[-‐‑‒–—―]\d+\s*\]").expect("valid regex")
});

static REF_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d{1,3}\]").expect("valid regex"));

static REF_FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[A-Za-z]\]").expect("valid regex"));

/// Strip bracketed citation markers and single-letter footnote markers.
pub fn remove_reference_markers(s: &str) -> String {
    let s = REF_CITED_RE.replace_all(s, "");
    let s = REF_RANGED_RE.replace_all(&s, "");
    let s = REF_COMPOUND_RE.replace_all(&s, " ");
    let s = REF_NUMERIC_RE.replace_all(&s, "");
    REF_FOOTNOTE_RE.replace_all(&s, "").to_string()
}

// ---------------------------------------------------------------------------
// Decoration
// ---------------------------------------------------------------------------

static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]*)_").expect("valid regex"));

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("```").expect("valid regex"));

/// Remove bold/italic delimiters and code fences, keeping the enclosed
/// text, and trim the result.
pub fn strip_decoration(s: &str) -> String {
    let s = ITALIC_RE.replace_all(s, "$1");
    let s = BOLD_RE.replace_all(&s, "$1");
    CODE_FENCE_RE.replace_all(&s, "").trim().to_string()
}

// ---------------------------------------------------------------------------
// Paragraph whitespace
// ---------------------------------------------------------------------------

static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Fold internal newlines into single spaces and collapse space runs.
///
/// Only for content already classified as prose; fragments keep their
/// internal line breaks until joined with `"; "`.
pub fn collapse_paragraph_whitespace(s: &str) -> String {
    let s = NEWLINE_RUN_RE.replace_all(s, " ");
    SPACE_RUN_RE.replace_all(&s, " ").to_string()
}

// ---------------------------------------------------------------------------
// Label-value capture
// ---------------------------------------------------------------------------

static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Bolded field label followed by its value at the end of the block,
    // e.g. "**Speed:** 120 mph" or "**Role** Reconnaissance".
    Regex::new(r"\s*\*\*(.*?):?\*\* ([^*\n]+)$").expect("valid regex")
});

/// Rewrite a trailing `**Label** value` pair to `Label: value`.
pub fn capture_label_value(s: &str) -> String {
    LABEL_VALUE_RE.replace(s, "$1: $2").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_page_break_markers() {
        let input = "engine was\n\n-----\n\nmounted on the wing";
        let result = strip_page_breaks(input);
        assert_eq!(result, "engine was mounted on the wing");
    }

    #[test]
    fn collapses_excess_newlines() {
        let input = "para one\n\n\n\npara two";
        assert_eq!(strip_page_breaks(input), "para one\n\npara two");
    }

    #[test]
    fn removes_link_keeps_label() {
        assert_eq!(remove_links("[Wikipedia](http://x.com)"), "Wikipedia");
    }

    #[test]
    fn non_http_links_untouched() {
        let input = "[Section](#anchor)";
        assert_eq!(remove_links(input), input);
    }

    #[test]
    fn removes_numeric_reference_markers() {
        assert_eq!(
            remove_reference_markers("flew first[3] in 1935[[4]]"),
            "flew first in 1935 "
        );
    }

    #[test]
    fn removes_compound_cited_marker() {
        assert_eq!(remove_reference_markers("text[[9]: 375 [10]] more"), "text more");
    }

    #[test]
    fn removes_ranged_cited_marker() {
        assert_eq!(remove_reference_markers("text[[9]: 482–484] more"), "text more");
    }

    #[test]
    fn removes_letter_footnote() {
        assert_eq!(remove_reference_markers("the fleet[a] sailed"), "the fleet sailed");
    }

    #[test]
    fn strips_bold_and_italic() {
        assert_eq!(strip_decoration("**bold** and _italic_ text"), "bold and italic text");
    }

    #[test]
    fn strips_code_fences_and_trims() {
        assert_eq!(strip_decoration("  ```\ncode\n```  "), "code");
    }

    #[test]
    fn collapses_paragraph_whitespace() {
        assert_eq!(
            collapse_paragraph_whitespace("one\ntwo\n\nthree  four"),
            "one two three four"
        );
    }

    #[test]
    fn captures_bold_label_value() {
        assert_eq!(capture_label_value("**Speed:** 120 mph"), "Speed: 120 mph");
        assert_eq!(capture_label_value("**Role** Reconnaissance"), "Role: Reconnaissance");
    }

    #[test]
    fn label_value_leaves_prose_alone() {
        let input = "The aircraft was fast.";
        assert_eq!(capture_label_value(input), input);
    }

    // Every transform must be a no-op on its own output.
    #[test]
    fn transforms_are_idempotent() {
        let inputs = [
            "engine was\n\n-----\n\nmounted\n\n\n\nhigh[3] up[[4]] and[a]",
            "[Wikipedia](http://x.com) **bold** _italic_\nsecond  line",
            "**Speed:** 120 mph",
        ];

        for input in inputs {
            let once = strip_page_breaks(input);
            assert_eq!(strip_page_breaks(&once), once);

            let once = remove_links(input);
            assert_eq!(remove_links(&once), once);

            let once = remove_reference_markers(input);
            assert_eq!(remove_reference_markers(&once), once);

            let once = strip_decoration(input);
            assert_eq!(strip_decoration(&once), once);

            let once = collapse_paragraph_whitespace(input);
            assert_eq!(collapse_paragraph_whitespace(&once), once);

            let once = capture_label_value(input);
            assert_eq!(capture_label_value(&once), once);
        }
    }
}
