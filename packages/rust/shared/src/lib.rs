//! Shared types, errors, and configuration for PassageForge.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, ConverterConfig, DefaultsConfig, GeminiConfig, PineconeConfig, ProcessingConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{PassageForgeError, Result};
pub use types::{PREAMBLE_KEY, Passage, ProcessedDocument, RunManifest, SectionPassages};
