use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postsearch_core::{build_index, SearchService};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "postsearch-indexer")]
#[command(about = "Validate and query a directory of posts offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and index every post, failing on the first bad file
    Check {
        /// Directory of post files
        dir: PathBuf,
    },
    /// Print the JSON the server would return for a query
    Query {
        /// Directory of post files
        dir: PathBuf,
        /// Free-text query
        query: String,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir } => run_check(&dir),
        Commands::Query { dir, query } => run_query(&dir, &query),
    }
}

fn run_check(dir: &Path) -> Result<()> {
    let (store, index) = build_index(dir).with_context(|| format!("indexing {} failed", dir.display()))?;
    tracing::info!(num_docs = store.len(), num_terms = index.num_terms(), "posts are valid");
    println!("{} posts, {} terms", store.len(), index.num_terms());
    Ok(())
}

fn run_query(dir: &Path, text: &str) -> Result<()> {
    let service = SearchService::from_dir(dir).with_context(|| format!("indexing {} failed", dir.display()))?;
    let posts = service.search(text);
    tracing::info!(hits = posts.len(), "query complete");
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}
