//! Document processing pipeline: raw converted markdown → passages,
//! derived retrieval views, and persisted run artifacts.

pub mod artifacts;
pub mod processor;
pub mod views;

pub use artifacts::{RunArtifacts, read_units, write_run};
pub use processor::{ProcessOutput, ProcessorOptions, is_reference_header, process_markdown};
pub use views::{ViewOptions, coarse_chunks, labeled_passages, readable, retrieval_units};
