//! Markdown section splitting.
//!
//! Scans a document line by line and groups content under its markdown
//! headers, preserving first-seen header order. The scan is an explicit
//! state machine so the two phases (before the first header, inside a
//! section) stay testable in isolation.

use std::sync::LazyLock;

use regex::Regex;

use passageforge_shared::PREAMBLE_KEY;

/// A header-delimited region of the document body, body trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Header text with `#` decoration stripped.
    pub header: String,
    /// Raw body text between this header and the next.
    pub body: String,
}

/// The result of splitting a document into sections.
#[derive(Debug, Clone, Default)]
pub struct SplitDocument {
    /// Title from the first header of any level; empty if none.
    pub title: String,
    /// Sections in first-seen order. Content before any header lives under
    /// the reserved `preamble` key.
    pub sections: Vec<RawSection>,
}

impl SplitDocument {
    /// Look up a section body by header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.header == header)
            .map(|s| s.body.as_str())
    }
}

/// Scanner state: either no header has been seen yet, or lines accumulate
/// under the most recent header.
enum ScanState {
    BeforeFirstHeader,
    InSection { header: String },
}

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*$").expect("valid regex"));

/// Split raw markdown into a title and an ordered header -> body mapping.
///
/// The first header encountered, regardless of level, sets the document
/// title. A headerless document yields an empty title and a single
/// `preamble` section. Duplicate headers append to the first-seen section
/// so the mapping stays keyed by header text. Total on any input.
pub fn split_sections(markdown: &str) -> SplitDocument {
    let mut doc = SplitDocument::default();
    let mut state = ScanState::BeforeFirstHeader;
    let mut content: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if let Some(caps) = HEADER_RE.captures(line) {
            let header = caps[1].to_string();

            match state {
                ScanState::BeforeFirstHeader => {
                    doc.title = header.clone();
                    if !content.is_empty() {
                        push_section(&mut doc, PREAMBLE_KEY, &content);
                    }
                }
                ScanState::InSection { header: prev } => {
                    push_section(&mut doc, &prev, &content);
                }
            }

            content.clear();
            state = ScanState::InSection { header };
        } else {
            content.push(line);
        }
    }

    // Close the trailing section
    match state {
        ScanState::BeforeFirstHeader => {
            if !content.is_empty() {
                push_section(&mut doc, PREAMBLE_KEY, &content);
            }
        }
        ScanState::InSection { header } => {
            push_section(&mut doc, &header, &content);
        }
    }

    doc
}

/// Append a closed section, merging into an existing entry on duplicate
/// header text.
fn push_section(doc: &mut SplitDocument, header: &str, lines: &[&str]) {
    let body = lines.join("\n").trim().to_string();

    if let Some(existing) = doc.sections.iter_mut().find(|s| s.header == header) {
        if !body.is_empty() {
            if existing.body.is_empty() {
                existing.body = body;
            } else {
                existing.body.push_str("\n\n");
                existing.body.push_str(&body);
            }
        }
        return;
    }

    doc.sections.push(RawSection {
        header: header.to_string(),
        body,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_by_headers_in_order() {
        let md = "# Renard R.31\n\nIntro text.\n\n## Design\n\nGull wing.\n\n## Operators\n\nBelgium.\n";
        let doc = split_sections(md);

        assert_eq!(doc.title, "Renard R.31");
        let headers: Vec<&str> = doc.sections.iter().map(|s| s.header.as_str()).collect();
        assert_eq!(headers, vec!["Renard R.31", "Design", "Operators"]);
        assert_eq!(doc.get("Design"), Some("Gull wing."));
    }

    #[test]
    fn first_header_of_any_level_sets_title() {
        let md = "### Appendix\n\nContent.\n\n# Main\n\nBody.\n";
        let doc = split_sections(md);
        assert_eq!(doc.title, "Appendix");
        assert_eq!(doc.get("Main"), Some("Body."));
    }

    #[test]
    fn preamble_collects_content_before_first_header() {
        let md = "Converted by tool v2.\n\n# Title\n\nBody.\n";
        let doc = split_sections(md);
        assert_eq!(doc.sections[0].header, "preamble");
        assert_eq!(doc.get("preamble"), Some("Converted by tool v2."));
    }

    #[test]
    fn headerless_document_is_all_preamble() {
        let md = "Just some text.\nNo headers anywhere.";
        let doc = split_sections(md);
        assert_eq!(doc.title, "");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.get("preamble"), Some("Just some text.\nNo headers anywhere."));
    }

    #[test]
    fn empty_input_yields_nothing() {
        let doc = split_sections("");
        assert_eq!(doc.title, "");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn duplicate_headers_merge_into_first_seen() {
        let md = "# Title\n\nFirst.\n\n## Notes\n\nAlpha.\n\n## Other\n\nMid.\n\n## Notes\n\nBeta.\n";
        let doc = split_sections(md);

        let headers: Vec<&str> = doc.sections.iter().map(|s| s.header.as_str()).collect();
        assert_eq!(headers, vec!["Title", "Notes", "Other"]);
        assert_eq!(doc.get("Notes"), Some("Alpha.\n\nBeta."));
    }

    #[test]
    fn section_bodies_are_trimmed() {
        let md = "# A\n\n\n  body  \n\n\n# B\n";
        let doc = split_sections(md);
        assert_eq!(doc.get("A"), Some("body"));
        assert_eq!(doc.get("B"), Some(""));
    }

    #[test]
    fn hash_without_space_is_not_a_header() {
        let md = "#tag line\n\n# Real Header\n\nBody.\n";
        let doc = split_sections(md);
        assert_eq!(doc.title, "Real Header");
        assert_eq!(doc.get("preamble"), Some("#tag line"));
    }
}
