//! In-memory collaborator doubles shared by the orchestration tests.

use std::sync::Mutex;

use passageforge_shared::{PassageForgeError, Result};

use crate::{Embedder, EmbeddingTask, Generator, ScoredMatch, UpsertItem, VectorStore};

/// Embedder returning a deterministic vector, optionally failing on one call.
pub(crate) struct MockEmbedder {
    pub fail_on_call: Option<usize>,
    pub calls: Mutex<usize>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            fail_on_call: None,
            calls: Mutex::new(0),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str, _task: EmbeddingTask) -> Result<Vec<f32>> {
        let mut calls = self.calls.lock().unwrap();
        let call = *calls;
        *calls += 1;

        if self.fail_on_call == Some(call) {
            return Err(PassageForgeError::Embedding("mock embed failure".into()));
        }
        Ok(vec![text.len() as f32, 1.0])
    }
}

/// Store recording upserts and answering queries from a canned match list.
pub(crate) struct MockStore {
    pub upserted: Mutex<Vec<UpsertItem>>,
    pub matches: Vec<ScoredMatch>,
    pub fail_upserts: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            upserted: Mutex::new(Vec::new()),
            matches: Vec::new(),
            fail_upserts: false,
        }
    }

    pub fn with_matches(matches: Vec<ScoredMatch>) -> Self {
        Self {
            matches,
            ..Self::new()
        }
    }
}

impl VectorStore for MockStore {
    async fn upsert(&self, items: Vec<UpsertItem>) -> Result<()> {
        if self.fail_upserts {
            return Err(PassageForgeError::VectorStore("mock upsert failure".into()));
        }
        self.upserted.lock().unwrap().extend(items);
        Ok(())
    }

    async fn query(&self, _vector: Vec<f32>, top_k: usize) -> Result<Vec<ScoredMatch>> {
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

/// Generator returning a canned response and recording received prompts.
pub(crate) struct MockGenerator {
    pub response: Result<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn answering(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(PassageForgeError::Generation(message.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(PassageForgeError::Generation(e.to_string())),
        }
    }
}
