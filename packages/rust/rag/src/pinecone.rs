//! Pinecone REST client for vector upserts and similarity queries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use passageforge_shared::{PassageForgeError, PineconeConfig, Result, validate_api_key};

use crate::{ScoredMatch, UpsertItem, VectorStore};

/// Client for one Pinecone index, addressed by its host URL.
#[derive(Debug, Clone)]
pub struct PineconeClient {
    http: reqwest::Client,
    api_key: String,
    host: String,
}

impl PineconeClient {
    /// Build a client from config, reading the API key from the configured
    /// env var. The index host must be set.
    pub fn from_config(config: &PineconeConfig) -> Result<Self> {
        validate_api_key(&config.api_key_env, "Pinecone")?;
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| PassageForgeError::config("Pinecone API key unreadable"))?;

        if config.index_host.is_empty() {
            return Err(PassageForgeError::config(
                "pinecone.index_host is not set; point it at your index host URL",
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("PassageForge/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PassageForgeError::VectorStore(format!("client build: {e}")))?;

        Ok(Self {
            http,
            api_key,
            host: config.index_host.trim_end_matches('/').to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct Vector {
    id: String,
    values: Vec<f32>,
    metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    text: String,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<Vector>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<Metadata>,
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

impl VectorStore for PineconeClient {
    async fn upsert(&self, items: Vec<UpsertItem>) -> Result<()> {
        let request = UpsertRequest {
            vectors: items
                .into_iter()
                .map(|item| Vector {
                    id: item.id,
                    values: item.values,
                    metadata: Metadata { text: item.text },
                })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/vectors/upsert", self.host))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PassageForgeError::VectorStore(format!("upsert: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PassageForgeError::VectorStore(format!(
                "upsert: HTTP {status}"
            )));
        }

        debug!(count = request.vectors.len(), "vectors upserted");
        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<ScoredMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        let response = self
            .http
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PassageForgeError::VectorStore(format!("query: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PassageForgeError::VectorStore(format!(
                "query: HTTP {status}"
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| PassageForgeError::VectorStore(format!("query response: {e}")))?;

        Ok(body
            .matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                text: m.metadata.map(|md| md.text).unwrap_or_default(),
            })
            .collect())
    }
}
