//! Run artifact writer.
//!
//! Persists the inspection artifacts of one processing run: the cleaned
//! markdown snapshot, the human-readable passage listing, the retrieval
//! units as JSON, and a run manifest. None of these are required for
//! correctness; they exist for debugging and re-ingestion.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use passageforge_shared::{PassageForgeError, ProcessedDocument, Result, RunManifest};

use crate::views;

/// Paths of the files written for one run.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// `{stem}.cleaned.md` — intermediate cleaned-markdown snapshot.
    pub cleaned_md: PathBuf,
    /// `{stem}.passages.txt` — readable passage listing.
    pub passages_txt: PathBuf,
    /// `{stem}.json` — retrieval units as a JSON string array.
    pub units_json: PathBuf,
    /// `{stem}.manifest.json` — run metadata.
    pub manifest_json: PathBuf,
    /// The manifest that was written.
    pub manifest: RunManifest,
}

/// Write all artifacts for one processing run into `out_dir`.
#[instrument(skip_all, fields(stem, units = units.len()))]
pub fn write_run(
    out_dir: &Path,
    stem: &str,
    cleaned_markdown: &str,
    document: &ProcessedDocument,
    units: &[String],
    tool_version: &str,
) -> Result<RunArtifacts> {
    std::fs::create_dir_all(out_dir).map_err(|e| PassageForgeError::io(out_dir, e))?;

    let cleaned_md = out_dir.join(format!("{stem}.cleaned.md"));
    write_text(&cleaned_md, cleaned_markdown)?;

    let passages_txt = out_dir.join(format!("{stem}.passages.txt"));
    write_text(&passages_txt, &views::readable(document))?;

    let units_json = out_dir.join(format!("{stem}.json"));
    let json = serde_json::to_string(units)
        .map_err(|e| PassageForgeError::validation(format!("units serialization: {e}")))?;
    write_text(&units_json, &json)?;

    let manifest = RunManifest {
        stem: stem.to_string(),
        title: document.title.clone(),
        section_count: document.sections.len(),
        passage_count: document.passage_count(),
        unit_count: units.len(),
        content_hash: content_hash(cleaned_markdown),
        tool_version: tool_version.to_string(),
        processed_at: Utc::now(),
    };

    let manifest_json = out_dir.join(format!("{stem}.manifest.json"));
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| PassageForgeError::validation(format!("manifest serialization: {e}")))?;
    write_text(&manifest_json, &json)?;

    info!(
        stem,
        passages = manifest.passage_count,
        units = manifest.unit_count,
        path = %out_dir.display(),
        "run artifacts written"
    );

    Ok(RunArtifacts {
        cleaned_md,
        passages_txt,
        units_json,
        manifest_json,
        manifest,
    })
}

/// Load a previously written retrieval-unit artifact.
pub fn read_units(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| PassageForgeError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        PassageForgeError::validation(format!("{} is not a unit artifact: {e}", path.display()))
    })
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| PassageForgeError::io(path, e))
}

/// SHA-256 hex digest of the cleaned markdown.
fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
