//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use passageforge_core::{ProcessorOptions, ViewOptions, process_markdown, read_units, retrieval_units, write_run};
use passageforge_rag::{
    Answer, AnswerOptions, CommandConverter, GeminiClient, MarkdownConverter, PineconeClient,
    answer_question, ingest_document,
};
use passageforge_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PassageForge — turn documents into question-answerable passages.
#[derive(Parser)]
#[command(
    name = "passageforge",
    version,
    about = "Turn PDFs and markdown into cleaned passages, a vector index, and answers.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Process a PDF or markdown file into passages and run artifacts.
    Process {
        /// Input file (.pdf is converted first; anything else is read as markdown).
        input: PathBuf,

        /// Output directory for run artifacts (defaults to config `output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Artifact stem and ingest key (defaults to the input file stem).
        #[arg(short, long)]
        name: Option<String>,

        /// Keep reference and bibliography sections instead of cutting there.
        #[arg(long)]
        keep_references: bool,
    },

    /// Embed a processed document's retrieval units into the vector index.
    Ingest {
        /// Path to a `{stem}.json` retrieval-units artifact.
        units: PathBuf,

        /// Document key; vector ids become `{key}_{index}`.
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Answer a question from the indexed passages.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "passageforge=info",
        1 => "passageforge=debug",
        _ => "passageforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Process {
            input,
            out,
            name,
            keep_references,
        } => cmd_process(&input, out.as_deref(), name.as_deref(), keep_references).await,
        Command::Ingest { units, key } => cmd_ingest(&units, key.as_deref()).await,
        Command::Ask { question } => cmd_ask(&question).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Derive the artifact stem from the input path when no name is given.
fn resolve_stem(input: &Path, name: Option<&str>) -> Result<String> {
    if let Some(name) = name {
        return Ok(name.to_string());
    }
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| eyre!("cannot derive a name from '{}'", input.display()))
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

async fn cmd_process(
    input: &Path,
    out: Option<&Path>,
    name: Option<&str>,
    keep_references: bool,
) -> Result<()> {
    let config = load_config()?;
    let stem = resolve_stem(input, name)?;

    if !input.exists() {
        return Err(eyre!("input file '{}' does not exist", input.display()));
    }

    let is_pdf = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    info!(input = %input.display(), stem, is_pdf, "processing document");
    let progress = spinner("Reading input");

    let raw = if is_pdf {
        progress.set_message("Converting PDF to markdown");
        let converter = CommandConverter::from_config(&config.converter);
        converter.convert(input)?
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| eyre!("cannot read '{}': {e}", input.display()))?
    };

    progress.set_message("Splitting and cleaning passages");
    let mut opts = ProcessorOptions::from(&config.processing);
    if keep_references {
        opts.break_on_references = false;
    }
    let output = process_markdown(&raw, &opts);

    progress.set_message("Deriving retrieval units");
    let view_opts = ViewOptions::from(&config.processing);
    let units = retrieval_units(&output.document, &view_opts);

    progress.set_message("Writing artifacts");
    let out_dir = match out {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.defaults.output_dir),
    };
    let artifacts = write_run(
        &out_dir,
        &stem,
        &output.cleaned_markdown,
        &output.document,
        &units,
        env!("CARGO_PKG_VERSION"),
    )?;
    progress.finish_and_clear();

    println!();
    println!("  Document processed!");
    println!("  Title:    {}", artifacts.manifest.title);
    println!("  Sections: {}", artifacts.manifest.section_count);
    println!("  Passages: {}", artifacts.manifest.passage_count);
    println!("  Units:    {}", artifacts.manifest.unit_count);
    println!("  Units at: {}", artifacts.units_json.display());
    println!("  Readable: {}", artifacts.passages_txt.display());
    println!();
    println!("  Next: passageforge ingest {}", artifacts.units_json.display());
    println!();

    Ok(())
}

async fn cmd_ingest(units_path: &Path, key: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let key = match key {
        Some(key) => key.to_string(),
        None => {
            // `{stem}.json` → `{stem}` without pulling the manifest back in.
            units_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .ok_or_else(|| eyre!("cannot derive a key from '{}'", units_path.display()))?
        }
    };

    let units = read_units(units_path)?;
    if units.is_empty() {
        return Err(eyre!("'{}' holds no retrieval units", units_path.display()));
    }

    let gemini = GeminiClient::from_config(&config.gemini)?;
    let pinecone = PineconeClient::from_config(&config.pinecone)?;

    info!(key, units = units.len(), "ingesting retrieval units");
    let progress = spinner(&format!("Embedding and upserting {} units", units.len()));
    let report = ingest_document(&gemini, &pinecone, &key, &units).await?;
    progress.finish_and_clear();

    println!();
    println!("  Ingest complete!");
    println!("  Key:      {key}");
    println!("  Upserted: {}", report.upserted);
    println!("  Failed:   {}", report.failed);
    println!();

    if report.upserted == 0 {
        return Err(eyre!("no units were upserted; check the logs above"));
    }
    Ok(())
}

async fn cmd_ask(question: &str) -> Result<()> {
    let config = load_config()?;

    let gemini = GeminiClient::from_config(&config.gemini)?;
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    let options = AnswerOptions {
        top_k: config.pinecone.top_k,
    };

    let progress = spinner("Retrieving context and generating");
    let answer = answer_question(&gemini, &pinecone, &gemini, question, &options).await?;
    progress.finish_and_clear();

    match answer {
        Answer::Answered {
            text,
            context_passages,
        } => {
            println!();
            println!("{text}");
            println!();
            info!(
                passages = context_passages.len(),
                "answered from retrieved context"
            );
        }
        Answer::NoAnswer => {
            println!();
            println!("No answer could be grounded in the indexed passages.");
            println!();
        }
    }

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
