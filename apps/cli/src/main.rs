//! PassageForge CLI — document-to-passage processing and retrieval.
//!
//! Converts PDFs and markdown into cleaned retrieval passages, ingests
//! them into a vector index, and answers questions over the result.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
