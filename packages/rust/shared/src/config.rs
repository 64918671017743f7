//! Application configuration for PassageForge.
//!
//! User config lives at `~/.passageforge/passageforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PassageForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "passageforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".passageforge";

// ---------------------------------------------------------------------------
// Config structs (matching passageforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Passage segmentation policy.
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// External PDF-to-markdown converter.
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Gemini embedding/generation settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Pinecone vector index settings.
    #[serde(default)]
    pub pinecone: PineconeConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default artifact output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "var/out".into()
}

/// `[processing]` section — one explicit policy set, passed into each run
/// so documents with different policies never interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Maximum passage size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between adjacent chunks of an oversized passage.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Minimum trimmed length for a block to count as prose.
    #[serde(default = "default_min_paragraph_len")]
    pub min_paragraph_len: usize,

    /// Bold fraction (percent) at or above which a block is a label block.
    #[serde(default = "default_max_bold_percentage")]
    pub max_bold_percentage: f64,

    /// Stop processing when a references/bibliography section is reached.
    #[serde(default = "default_true")]
    pub break_on_references: bool,

    /// Chunk size for the lowercased keyword stream.
    #[serde(default = "default_keyword_chunk_size")]
    pub keyword_chunk_size: usize,

    /// Overlap for the keyword stream.
    #[serde(default = "default_keyword_chunk_overlap")]
    pub keyword_chunk_overlap: usize,

    /// Chunk size for per-section snippets.
    #[serde(default = "default_snippet_chunk_size")]
    pub snippet_chunk_size: usize,

    /// Overlap for per-section snippets.
    #[serde(default = "default_snippet_chunk_overlap")]
    pub snippet_chunk_overlap: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_paragraph_len: default_min_paragraph_len(),
            max_bold_percentage: default_max_bold_percentage(),
            break_on_references: true,
            keyword_chunk_size: default_keyword_chunk_size(),
            keyword_chunk_overlap: default_keyword_chunk_overlap(),
            snippet_chunk_size: default_snippet_chunk_size(),
            snippet_chunk_overlap: default_snippet_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    3000
}
fn default_chunk_overlap() -> usize {
    30
}
fn default_min_paragraph_len() -> usize {
    100
}
fn default_max_bold_percentage() -> f64 {
    50.0
}
fn default_keyword_chunk_size() -> usize {
    300
}
fn default_keyword_chunk_overlap() -> usize {
    30
}
fn default_snippet_chunk_size() -> usize {
    200
}
fn default_snippet_chunk_overlap() -> usize {
    20
}
fn default_true() -> bool {
    true
}

/// `[converter]` section — the external PDF-to-markdown command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Command to spawn (e.g., "python3").
    #[serde(default = "default_converter_cmd")]
    pub command: String,

    /// Extra arguments before the PDF path (e.g., a bridge script).
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: default_converter_cmd(),
            args: Vec::new(),
        }
    }
}

fn default_converter_cmd() -> String {
    "pdf-to-markdown".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,

    /// Embedding model name.
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Generative model name.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_gemini_key_env(),
            embed_model: default_embed_model(),
            generation_model: default_generation_model(),
        }
    }
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_embed_model() -> String {
    "text-embedding-004".into()
}
fn default_generation_model() -> String {
    "gemini-1.5-flash-8b".into()
}

/// `[pinecone]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_pinecone_key_env")]
    pub api_key_env: String,

    /// Index host URL (e.g., "https://my-index-abc123.svc.us-east-1.pinecone.io").
    #[serde(default)]
    pub index_host: String,

    /// Number of matches to retrieve per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_pinecone_key_env(),
            index_host: String::new(),
            top_k: default_top_k(),
        }
    }
}

fn default_pinecone_key_env() -> String {
    "PINECONE_API_KEY".into()
}
fn default_top_k() -> usize {
    5
}

// ---------------------------------------------------------------------------
// Loading / initialization
// ---------------------------------------------------------------------------

/// Path to the config directory (`~/.passageforge`).
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or_else(|| PassageForgeError::config("cannot determine home directory"))
}

/// Path to the config file (`~/.passageforge/passageforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config, falling back to defaults if no file exists.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PassageForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PassageForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PassageForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PassageForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PassageForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that an API key env var is set and non-empty.
pub fn validate_api_key(var_name: &str, service: &str) -> Result<()> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(PassageForgeError::config(format!(
            "{service} API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.processing.chunk_size, 3000);
        assert_eq!(parsed.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(parsed.pinecone.top_k, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[processing]
chunk_size = 1000
break_on_references = false

[pinecone]
index_host = "https://idx.example.pinecone.io"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.processing.chunk_size, 1000);
        assert!(!config.processing.break_on_references);
        assert_eq!(config.processing.chunk_overlap, 30);
        assert_eq!(config.pinecone.index_host, "https://idx.example.pinecone.io");
        assert_eq!(config.converter.command, "pdf-to-markdown");
    }

    #[test]
    fn api_key_validation() {
        // Use a unique env var name to avoid interfering with other tests
        let result = validate_api_key("PF_TEST_NONEXISTENT_KEY_12345", "Gemini");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
