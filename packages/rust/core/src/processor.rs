//! Document processor: markdown → ordered passages.
//!
//! Walks the section map in document order, classifies each
//! blank-line-delimited block as prose or fragment, collects consecutive
//! fragments into joined label-lists, and bounds every emitted passage by
//! the configured chunk size.

use tracing::{debug, instrument};

use passageforge_segment::{chunk_text, is_paragraph, normalize, split_sections};
use passageforge_shared::{Passage, ProcessedDocument, ProcessingConfig, SectionPassages};

/// Section headers that end processing when reference cutoff is enabled.
/// Matched against the case-folded, trimmed header text.
const REFERENCE_ALIASES: [&str; 6] = [
    "reference",
    "references",
    "works cited",
    "bibliography",
    "works referenced",
    "citations",
];

/// Policy for one processing run. Always passed explicitly so documents
/// with different policies can be processed side by side.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Maximum passage size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks of oversized text.
    pub chunk_overlap: usize,
    /// Minimum trimmed block length to qualify as prose.
    pub min_paragraph_len: usize,
    /// Bold percentage at or above which a block is a label block.
    pub max_bold_percentage: f64,
    /// Halt at the first references/bibliography section.
    pub break_on_references: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            chunk_size: 3000,
            chunk_overlap: 30,
            min_paragraph_len: 100,
            max_bold_percentage: 50.0,
            break_on_references: true,
        }
    }
}

impl From<&ProcessingConfig> for ProcessorOptions {
    fn from(config: &ProcessingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            min_paragraph_len: config.min_paragraph_len,
            max_bold_percentage: config.max_bold_percentage,
            break_on_references: config.break_on_references,
        }
    }
}

/// Output of one processing run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Intermediate snapshot: the input with page-break artifacts removed.
    pub cleaned_markdown: String,
    /// The ordered passage list, grouped by section.
    pub document: ProcessedDocument,
}

/// Whether a header names a references/bibliography section.
pub fn is_reference_header(header: &str) -> bool {
    let folded = header.trim().to_lowercase();
    REFERENCE_ALIASES.contains(&folded.as_str())
}

/// Process raw converted markdown into an ordered passage list.
///
/// Pure and re-entrant; all policy comes from `opts`.
#[instrument(skip_all, fields(len = raw.len()))]
pub fn process_markdown(raw: &str, opts: &ProcessorOptions) -> ProcessOutput {
    let cleaned_markdown = normalize::strip_page_breaks(raw);
    let split = split_sections(&cleaned_markdown);

    let mut sections = Vec::new();
    for section in &split.sections {
        if opts.break_on_references && is_reference_header(&section.header) {
            debug!(header = %section.header, "reference cutoff reached, dropping remaining sections");
            break;
        }

        let texts = process_section(&section.body, opts);
        debug!(header = %section.header, passages = texts.len(), "section processed");

        let passages = texts
            .into_iter()
            .map(|text| Passage {
                text,
                document: split.title.clone(),
                header: section.header.clone(),
            })
            .collect();

        sections.push(SectionPassages {
            header: section.header.clone(),
            passages,
        });
    }

    ProcessOutput {
        cleaned_markdown,
        document: ProcessedDocument {
            title: split.title,
            sections,
        },
    }
}

/// Process one section body into finished passage texts.
fn process_section(body: &str, opts: &ProcessorOptions) -> Vec<String> {
    let mut passages = Vec::new();
    let mut collector = PhraseCollector::default();

    for block in body.split("\n\n") {
        // Markers and links go first; classification looks at the raw
        // block because it depends on the markup.
        let normalized = normalize::remove_links(&normalize::remove_reference_markers(block));

        if is_paragraph(block, opts.min_paragraph_len, opts.max_bold_percentage) {
            collector.flush_into(&mut passages, opts);

            let cleaned = normalize::collapse_paragraph_whitespace(&normalize::strip_decoration(
                &normalized,
            ));
            if cleaned.len() > opts.chunk_size {
                passages.extend(chunk_text(&cleaned, opts.chunk_size, opts.chunk_overlap));
            } else if !cleaned.is_empty() {
                passages.push(cleaned);
            }
        } else {
            let fragment =
                normalize::strip_decoration(&normalize::capture_label_value(&normalized));
            if !fragment.is_empty() {
                collector.push(&fragment);
            }
        }
    }

    collector.flush_into(&mut passages, opts);
    passages
}

/// Accumulator for consecutive fragment blocks within one section.
///
/// Created empty at section start, appended to per fragment, flushed to
/// zero-or-one passage whenever prose is encountered or the section ends.
#[derive(Debug, Default)]
struct PhraseCollector {
    phrases: Vec<String>,
}

impl PhraseCollector {
    /// Append a cleaned fragment, rewriting its internal line breaks.
    fn push(&mut self, fragment: &str) {
        self.phrases.push(fragment.replace('\n', "; "));
    }

    /// Join and emit the collected fragments, then reset. Oversized output
    /// is chunked under the same bound as prose.
    fn flush_into(&mut self, passages: &mut Vec<String>, opts: &ProcessorOptions) {
        if self.phrases.is_empty() {
            return;
        }

        let joined = self.phrases.join("; ");
        if joined.len() > opts.chunk_size {
            passages.extend(chunk_text(&joined, opts.chunk_size, opts.chunk_overlap));
        } else {
            passages.push(joined);
        }
        self.phrases.clear();
    }
}
