use anyhow::Result;
use catmatch::{server, ServiceConfig};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catmatch")]
#[command(about = "Whole-word category phrase lookup over a tab-separated dictionary")]
#[command(version)]
struct Args {
    /// Tab-separated dictionary file with a `category` column
    dictionary: PathBuf,

    /// Address to bind the HTTP listener on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Maximum number of searches running at once
    #[arg(long, default_value_t = catmatch::config::DEFAULT_MAX_CONCURRENT_SEARCHES)]
    max_concurrent: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting catmatch");
    info!(?args, "Parsed CLI arguments");

    // validate the dictionary path before binding the listener
    if !args.dictionary.exists() {
        anyhow::bail!("Dictionary source does not exist: {}", args.dictionary.display());
    }

    if !args.dictionary.is_file() {
        anyhow::bail!("Dictionary source is not a file: {}", args.dictionary.display());
    }

    let config = ServiceConfig {
        dictionary_path: args.dictionary,
        bind_addr: args.bind,
        max_concurrent_searches: args.max_concurrent,
    };

    server::serve(config).await
}
