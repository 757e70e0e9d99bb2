//! element-chunker CLI
//!
//! ```bash
//! # Chunk one file of partitioned elements
//! element-chunker elements.json --max-characters 1000 --pretty
//!
//! # Chunk every *.json under a directory, options from a config file
//! element-chunker partitions/ --config chunking.json --output chunks.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use element_chunker::{chunk_by_title, Chunk, ChunkingOptions, ChunkingOptionsBuilder, Element};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "element-chunker")]
#[command(about = "Chunk partitioned document elements at section boundaries")]
#[command(version)]
struct Cli {
    /// Elements JSON file, or a directory searched for *.json files
    input: PathBuf,

    /// Write chunks here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with chunking options; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hard maximum on chunk text length
    #[arg(long, allow_negative_numbers = true)]
    max_characters: Option<i64>,

    /// Close a chunk once its text reaches this length
    #[arg(long, allow_negative_numbers = true)]
    new_after_n_chars: Option<i64>,

    /// Combine sections shorter than this with the ones that follow
    #[arg(long, allow_negative_numbers = true)]
    combine_text_under_n_chars: Option<i64>,

    /// Let sections continue across page breaks
    #[arg(long, action = ArgAction::Set)]
    multipage_sections: Option<bool>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn option_overrides(&self) -> ChunkingOptionsBuilder {
        let mut builder = ChunkingOptionsBuilder::new();
        if let Some(n) = self.max_characters {
            builder = builder.max_characters(n);
        }
        if let Some(n) = self.new_after_n_chars {
            builder = builder.new_after_n_chars(n);
        }
        if let Some(n) = self.combine_text_under_n_chars {
            builder = builder.combine_text_under_n_chars(n);
        }
        if let Some(multipage) = self.multipage_sections {
            builder = builder.multipage_sections(multipage);
        }
        builder
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start_time = Instant::now();

    let options = load_options(cli.config.as_deref(), cli.option_overrides())?;
    info!(
        max_characters = options.max_characters(),
        new_after_n_chars = options.new_after_n_chars(),
        combine_text_under_n_chars = options.combine_text_under_n_chars(),
        multipage_sections = options.multipage_sections(),
        "chunking options"
    );

    let json = if cli.input.is_dir() {
        let chunks = chunk_directory(&cli.input, &options)?;
        to_json(&chunks, cli.pretty)?
    } else {
        let chunks = chunk_file(&cli.input, &options)?;
        to_json(&chunks, cli.pretty)?
    };

    match &cli.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    info!("done in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Resolve options from an optional config file plus command-line overrides
fn load_options(
    config: Option<&Path>,
    overrides: ChunkingOptionsBuilder,
) -> Result<ChunkingOptions> {
    let base = match config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<ChunkingOptionsBuilder>(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ChunkingOptionsBuilder::new(),
    };

    base.merge(overrides)
        .build()
        .context("invalid chunking options")
}

fn read_elements(path: &Path) -> Result<Vec<Element>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse elements from {}", path.display()))
}

fn chunk_file(path: &Path, options: &ChunkingOptions) -> Result<Vec<Chunk>> {
    let elements = read_elements(path)?;
    let element_count = elements.len();

    let chunks = chunk_by_title(elements, options);
    info!(
        path = %path.display(),
        elements = element_count,
        chunks = chunks.len(),
        "chunked file"
    );
    Ok(chunks)
}

/// Chunk every `*.json` file under `root`, keyed by path relative to it
fn chunk_directory(
    root: &Path,
    options: &ChunkingOptions,
) -> Result<BTreeMap<String, Vec<Chunk>>> {
    let mut results = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();

        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "json") {
            debug!(path = %path.display(), "skipping");
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let key = relative.to_string_lossy().replace('\\', "/");
        results.insert(key, chunk_file(path, options)?);
    }

    info!(files = results.len(), "chunked directory");
    Ok(results)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialize chunks")
}
