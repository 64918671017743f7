//! Gemini REST client: embeddings and text generation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use passageforge_shared::{GeminiConfig, PassageForgeError, Result, validate_api_key};

use crate::{Embedder, EmbeddingTask, Generator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generative language API.
///
/// Implements both [`Embedder`] (embedContent) and [`Generator`]
/// (generateContent).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    embed_model: String,
    generation_model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build a client from config, reading the API key from the configured
    /// env var.
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        validate_api_key(&config.api_key_env, "Gemini")?;
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| PassageForgeError::config("Gemini API key unreadable"))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("PassageForge/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PassageForgeError::Embedding(format!("client build: {e}")))?;

        Ok(Self {
            http,
            api_key,
            embed_model: config.embed_model.clone(),
            generation_model: config.generation_model.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (for test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    model: String,
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl Embedder for GeminiClient {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vec<f32>> {
        let url = format!(
            "{}/models/{}:embedContent",
            self.base_url, self.embed_model
        );

        let request = EmbedRequest {
            model: format!("models/{}", self.embed_model),
            content: Content {
                parts: vec![ContentPart {
                    text: text.to_string(),
                }],
            },
            task_type: match task {
                EmbeddingTask::Document => Some("RETRIEVAL_DOCUMENT"),
                EmbeddingTask::Query => None,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PassageForgeError::Embedding(format!("embedContent: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PassageForgeError::Embedding(format!(
                "embedContent: HTTP {status}"
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| PassageForgeError::Embedding(format!("embedContent response: {e}")))?;

        debug!(dims = body.embedding.values.len(), "embedding received");
        Ok(body.embedding.values)
    }
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.generation_model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![ContentPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PassageForgeError::Generation(format!("generateContent: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PassageForgeError::Generation(format!(
                "generateContent: HTTP {status}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PassageForgeError::Generation(format!("generateContent response: {e}")))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PassageForgeError::Generation(
                "generateContent returned no candidates".into(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_request_shape() {
        let request = EmbedRequest {
            model: "models/text-embedding-004".into(),
            content: Content {
                parts: vec![ContentPart {
                    text: "What is the R.31?".into(),
                }],
            },
            task_type: Some("RETRIEVAL_DOCUMENT"),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""model":"models/text-embedding-004""#));
        assert!(json.contains(r#""taskType":"RETRIEVAL_DOCUMENT""#));
        assert!(json.contains(r#""text":"What is the R.31?""#));
    }

    #[test]
    fn query_embed_request_omits_task_type() {
        let request = EmbedRequest {
            model: "models/text-embedding-004".into(),
            content: Content { parts: vec![] },
            task_type: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("taskType"));
    }

    #[test]
    fn embed_response_parses() {
        let json = r#"{"embedding":{"values":[0.1,0.2,0.3]}}"#;
        let parsed: EmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.embedding.values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn generate_response_parses() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"SABCA and Renard."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "SABCA and Renard.");
    }

    #[test]
    fn empty_generate_response_parses_to_no_candidates() {
        let json = r#"{}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
