//! Question answering over the vector index.

use tracing::{debug, info, instrument};

use passageforge_shared::{PassageForgeError, Result};

use crate::{Embedder, EmbeddingTask, Generator, VectorStore};

/// Separator between retrieved passages in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n###\n\n";

/// Sentinel the model is instructed to emit when the context is not enough.
const NO_ANSWER: &str = "I'm sorry I cannot answer the question";

/// Tunables for one question.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOptions {
    /// How many passages to retrieve as context.
    pub top_k: usize,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Outcome of asking a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model answered from the retrieved context.
    Answered {
        text: String,
        /// The passages the answer was grounded on, in rank order.
        context_passages: Vec<String>,
    },
    /// Nothing retrieved, or the model declined to answer.
    NoAnswer,
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a chatbot for a Historical society and strictly answer the question \
         based on the context below, and if the question can't be answered based on \
         the context, say \"{NO_ANSWER}\"\n\n\
         Context: {context}\n\n\
         ---\n\n\
         Question: {question}\n\
         Answer:"
    )
}

/// Answer `question` from the passages nearest to it in the index.
///
/// The question is embedded, the `top_k` nearest passages are joined into
/// a context block, and the generator completes a fixed prompt over it.
/// An empty index result or a declined completion is `Answer::NoAnswer`,
/// not an error; errors are reserved for failed boundary calls.
#[instrument(skip_all, fields(top_k = options.top_k))]
pub async fn answer_question(
    embedder: &impl Embedder,
    store: &impl VectorStore,
    generator: &impl Generator,
    question: &str,
    options: &AnswerOptions,
) -> Result<Answer> {
    let question = question.trim();
    if question.is_empty() {
        return Err(PassageForgeError::validation("question is empty"));
    }

    let vector = embedder.embed(question, EmbeddingTask::Query).await?;
    let matches = store.query(vector, options.top_k).await?;
    if matches.is_empty() {
        info!("no passages retrieved for question");
        return Ok(Answer::NoAnswer);
    }
    debug!(matches = matches.len(), "retrieved context passages");

    let context_passages: Vec<String> = matches.into_iter().map(|m| m.text).collect();
    let context = context_passages.join(CONTEXT_SEPARATOR);
    let prompt = build_prompt(&context, question);

    let text = generator.generate(&prompt).await?;
    let text = text.trim().to_string();
    if text.is_empty() || text == NO_ANSWER {
        return Ok(Answer::NoAnswer);
    }

    Ok(Answer::Answered {
        text,
        context_passages,
    })
}
