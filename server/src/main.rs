use anyhow::{Context, Result};
use clap::Parser;
use postsearch_core::SearchService;
use postsearch_server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "postsearch-server", about = "Serve full-text search over a directory of posts")]
struct Args {
    /// Directory of post files to index at startup
    entries: PathBuf,
    /// Virtual host the routes answer to ("*" for any)
    #[arg(long, default_value = "irasutoya.alejandro.pictures")]
    host_name: String,
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
    /// Directory served at /
    #[arg(long, default_value = "./static")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    // Index fully before binding; a bad post stops the process here.
    let service = SearchService::from_dir(&args.entries).context("error occurred while indexing entries")?;

    let config = ServerConfig { host_name: args.host_name, static_dir: args.static_dir };
    let app = build_app(service, &config);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, host = %config.host_name, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
