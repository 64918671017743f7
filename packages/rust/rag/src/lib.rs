//! Boundary collaborators for retrieval-augmented question answering.
//!
//! The core pipeline is pure; everything that blocks lives behind the
//! traits here — PDF conversion, embedding, vector storage, and text
//! generation — with Gemini and Pinecone client implementations and the
//! ingest/answer orchestration on top.

pub mod answer;
pub mod convert;
pub mod gemini;
pub mod ingest;
#[cfg(test)]
pub(crate) mod mocks;
pub mod pinecone;

use std::path::Path;

use passageforge_shared::Result;

pub use answer::{Answer, AnswerOptions, answer_question};
pub use convert::CommandConverter;
pub use gemini::GeminiClient;
pub use ingest::{IngestReport, ingest_document};
pub use pinecone::PineconeClient;

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// What an embedding is for; some services index documents and queries
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    /// Text being stored for later retrieval.
    Document,
    /// A question being matched against stored documents.
    Query,
}

/// External PDF-to-markdown converter. Failure is fatal to that document's
/// processing; no partial markdown is usable.
pub trait MarkdownConverter {
    /// Convert the file at `path` to markdown text.
    fn convert(&self, path: &Path) -> Result<String>;
}

/// External embedding service mapping text to a fixed-dimension vector.
pub trait Embedder {
    /// Embed one text.
    fn embed(
        &self,
        text: &str,
        task: EmbeddingTask,
    ) -> impl Future<Output = Result<Vec<f32>>> + Send;
}

/// One vector with its round-tripping metadata, ready for upsert.
#[derive(Debug, Clone)]
pub struct UpsertItem {
    /// Externally assigned identity, `{key}_{index}`.
    pub id: String,
    /// Embedding vector.
    pub values: Vec<f32>,
    /// Original passage text; must round-trip through the store.
    pub text: String,
}

/// A ranked query match with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    /// The stored passage text.
    pub text: String,
}

/// External vector index.
pub trait VectorStore {
    /// Upsert a batch of vectors.
    fn upsert(&self, items: Vec<UpsertItem>) -> impl Future<Output = Result<()>> + Send;

    /// Top-k nearest neighbors of `vector`.
    fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<ScoredMatch>>> + Send;
}

/// External generative language model.
pub trait Generator {
    /// Complete `prompt` to text.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
