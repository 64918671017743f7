//! Markdown-structure-aware text segmentation primitives.
//!
//! The leaves of the document pipeline: section splitting, text
//! normalization, prose/fragment classification, and bounded chunking.
//! Everything here is a pure function over in-memory strings — total,
//! deterministic, and free of I/O.

pub mod chunk;
pub mod classify;
pub mod normalize;
pub mod sections;

pub use chunk::chunk_text;
pub use classify::is_paragraph;
pub use sections::{RawSection, SplitDocument, split_sections};
