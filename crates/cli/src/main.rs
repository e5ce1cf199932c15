use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use repo_rag_code_chunker::{Chunk, CodeChunker};
use repo_rag_indexer::{IndexProgress, IndexerConfig, JsonlSink, LocalSource, RepoIndexer};

#[derive(Parser)]
#[command(name = "repo-rag")]
#[command(about = "Structural code chunking for retrieval pipelines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a single source file and print the result
    Chunk(ChunkArgs),

    /// Chunk every supported file under a directory into a JSONL corpus
    Load(LoadArgs),
}

#[derive(Args)]
struct ChunkArgs {
    /// Source file to chunk
    file: PathBuf,

    /// Token budget hint per chunk
    #[arg(long)]
    token_limit: Option<usize>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LoadArgs {
    /// Project directory to load (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output file for the chunk records
    #[arg(long, default_value = "chunks.jsonl")]
    out: PathBuf,

    /// Namespace stamped on every record
    #[arg(long, default_value = "default-namespace")]
    namespace: String,

    /// Per-file chunking timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Auto-enable quiet mode when --json is used (to keep stdout clean for JSON parsing)
    let json_output = match &cli.command {
        Commands::Chunk(args) => args.json,
        Commands::Load(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Chunk(args) => run_chunk(args).await?,
        Commands::Load(args) => run_load(args).await?,
    }

    Ok(())
}

async fn run_chunk(args: ChunkArgs) -> Result<()> {
    let path = args.file.canonicalize().context("Invalid file path")?;
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path.file_name().and_then(|name| name.to_str());

    let mut chunker = CodeChunker::for_path(&path);
    let chunks = chunker.chunk(&text, args.token_limit, file_name);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    eprintln!(
        "{} chunk(s) from {} ({})",
        chunks.len(),
        path.display(),
        chunker.language().as_str()
    );
    for (index, chunk) in chunks.iter().enumerate() {
        print_chunk(index, chunk);
    }

    Ok(())
}

/// Field-per-line dump for one chunk, stdout only.
fn print_chunk(index: usize, chunk: &Chunk) {
    println!("Chunk {}:", index + 1);
    println!("Start Line: {}", chunk.start_line);
    println!("End Line: {}", chunk.end_line);
    println!("Token Count: {}", chunk.token_count);
    if let Some(file_name) = &chunk.file_name {
        println!("File Name: {file_name}");
    }
    if let Some(class_name) = &chunk.class_name {
        println!("Class Name: {class_name}");
    }
    let function_name = chunk
        .function_name
        .as_deref()
        .filter(|name| *name != "other");
    if let Some(function_name) = function_name {
        println!("Function Name: {function_name}");
    }
    let chunk_type = if chunk.class_name.is_some() {
        "Class"
    } else if function_name.is_some() {
        "Function"
    } else {
        "Other Code"
    };
    println!("Chunk Type: {chunk_type}");
    println!("Chunk Content:");
    println!("{}", chunk.text);
    println!();
}

async fn run_load(args: LoadArgs) -> Result<()> {
    let root = args.root.canonicalize().context("Invalid project path")?;

    let mut config = IndexerConfig::default();
    if let Some(secs) = args.timeout_secs {
        config.file_timeout = Duration::from_secs(secs);
    }
    config.progress = Some(Arc::new(|progress: &IndexProgress| {
        log::info!(
            "Progress: {}/{} files, {} chunks",
            progress.processed_files + progress.skipped_files,
            progress.total_files,
            progress.chunks_created
        );
    }));

    let source = LocalSource::new(&root)?;
    let indexer = RepoIndexer::with_config(source, config);
    let mut sink = JsonlSink::create(&args.out).await?;
    let stats = indexer.index_into(&mut sink, &args.namespace).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        eprintln!("Chunks written to {}", sink.path().display());
        println!("{stats}");
    }

    Ok(())
}
