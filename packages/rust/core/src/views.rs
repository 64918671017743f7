//! Output views over a processed document.
//!
//! One processing pass produces one passage list; the labeled, coarse, and
//! readable forms are all derived from it here rather than built by
//! separate pipelines.

use passageforge_segment::chunk_text;
use passageforge_shared::{ProcessedDocument, ProcessingConfig};

/// Granularity of the coarse retrieval layers.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Chunk size for the lowercased keyword stream.
    pub keyword_chunk_size: usize,
    /// Overlap for the keyword stream.
    pub keyword_chunk_overlap: usize,
    /// Chunk size for per-section snippets.
    pub snippet_chunk_size: usize,
    /// Overlap for per-section snippets.
    pub snippet_chunk_overlap: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            keyword_chunk_size: 300,
            keyword_chunk_overlap: 30,
            snippet_chunk_size: 200,
            snippet_chunk_overlap: 20,
        }
    }
}

impl From<&ProcessingConfig> for ViewOptions {
    fn from(config: &ProcessingConfig) -> Self {
        Self {
            keyword_chunk_size: config.keyword_chunk_size,
            keyword_chunk_overlap: config.keyword_chunk_overlap,
            snippet_chunk_size: config.snippet_chunk_size,
            snippet_chunk_overlap: config.snippet_chunk_overlap,
        }
    }
}

/// Provenance label for a passage: document title plus header, with the
/// header omitted when it repeats the title (and for untitled documents).
fn provenance(doc: &ProcessedDocument, header: &str) -> String {
    if doc.title.is_empty() {
        header.to_string()
    } else if header == doc.title {
        doc.title.clone()
    } else {
        format!("{} {}", doc.title, header)
    }
}

/// Flattened per-passage view: `"{text} - {title} {header}"`.
pub fn labeled_passages(doc: &ProcessedDocument) -> Vec<String> {
    let mut labeled = Vec::new();
    for section in &doc.sections {
        let label = provenance(doc, &section.header);
        for passage in &section.passages {
            labeled.push(format!("{} - {}", passage.text, label));
        }
    }
    labeled
}

/// Coarse retrieval layers: a lowercased keyword stream over headers and
/// passages, plus smaller per-section snippets.
pub fn coarse_chunks(doc: &ProcessedDocument, opts: &ViewOptions) -> Vec<String> {
    let mut stream = Vec::new();
    for section in &doc.sections {
        stream.push(provenance(doc, &section.header));
        for passage in &section.passages {
            stream.push(passage.text.clone());
        }
    }

    let mut chunks = chunk_text(
        &stream.join(" ").to_lowercase(),
        opts.keyword_chunk_size,
        opts.keyword_chunk_overlap,
    );

    for section in &doc.sections {
        let joined = section
            .passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        chunks.extend(chunk_text(
            &joined,
            opts.snippet_chunk_size,
            opts.snippet_chunk_overlap,
        ));
    }

    chunks
}

/// The full ordered unit-of-retrieval list handed to the embedding layer,
/// keyed externally by `{key}_{index}`.
pub fn retrieval_units(doc: &ProcessedDocument, opts: &ViewOptions) -> Vec<String> {
    let mut units = labeled_passages(doc);
    units.extend(coarse_chunks(doc, opts));
    units
}

/// Human-readable concatenation of the final passages, section by section.
pub fn readable(doc: &ProcessedDocument) -> String {
    let mut out = String::new();
    for section in &doc.sections {
        out.push_str(&provenance(doc, &section.header));
        out.push_str("\n\n");
        for passage in &section.passages {
            out.push_str(&passage.text);
            out.push_str("\n\n");
        }
        out.push('\n');
    }
    out
}
