//! Core domain types for processed documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved section key for content appearing before the first header.
pub const PREAMBLE_KEY: &str = "preamble";

// ---------------------------------------------------------------------------
// Passage
// ---------------------------------------------------------------------------

/// A finished, bounded-size unit of cleaned text, immutable once created.
///
/// Passages are the atomic unit handed to the embedding/storage layer.
/// `document` and `header` record where the text was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Cleaned passage text.
    pub text: String,
    /// Title of the source document.
    pub document: String,
    /// Header of the section the passage was drawn from.
    pub header: String,
}

// ---------------------------------------------------------------------------
// ProcessedDocument
// ---------------------------------------------------------------------------

/// All passages produced from one section, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPassages {
    /// Section header text (decoration stripped).
    pub header: String,
    /// Ordered passages emitted for this section.
    pub passages: Vec<Passage>,
}

/// The output of one document processing pass.
///
/// Section order matches the source document; nothing is shared between
/// processing runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Document title, taken from the first header (any level). Empty for
    /// headerless documents.
    pub title: String,
    /// Processed sections in original order.
    pub sections: Vec<SectionPassages>,
}

impl ProcessedDocument {
    /// Total number of passages across all sections.
    pub fn passage_count(&self) -> usize {
        self.sections.iter().map(|s| s.passages.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// RunManifest
// ---------------------------------------------------------------------------

/// Metadata written alongside the artifacts of one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Artifact file stem (caller-supplied document key).
    pub stem: String,
    /// Extracted document title.
    pub title: String,
    /// Number of sections that survived processing.
    pub section_count: usize,
    /// Number of passages emitted.
    pub passage_count: usize,
    /// Number of retrieval units (passages + coarse chunks).
    pub unit_count: usize,
    /// SHA-256 hash of the cleaned markdown snapshot.
    pub content_hash: String,
    /// Tool version that produced the run.
    pub tool_version: String,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}
