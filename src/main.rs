use clap::Parser;
use tracing::info;

use docscrape::cli::{Cli, Mode};
use docscrape::output::control_output;
use docscrape::process;
use docscrape::request::CachedClient;
use docscrape::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("docscrape error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_tracing();
    info!("Scraper started");
    let args = Cli::parse();
    info!("Command line arguments: {args:?}");

    let client = CachedClient::new();
    if args.clear_cache {
        client.clear_cache().await?;
    }

    let results = match args.mode {
        Mode::WhatsNew => process::whats_new(&client).await?,
        Mode::LatestVersions => process::latest_versions(&client).await?,
        Mode::Download => process::download(&client).await?,
        Mode::Pep => process::pep(&client).await?,
    };
    if let Some(results) = results {
        control_output(&results, &args)?;
    }

    info!("Scraper finished");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DOCSCRAPE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
