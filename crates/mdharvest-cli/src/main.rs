//! MdHarvest CLI - harvest a list of URLs into cleaned markdown

use clap::Parser;
use mdharvest::{Config, Pipeline};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// MdHarvest - fetch web pages, convert to markdown, clean with an LLM
#[derive(Parser, Debug)]
#[command(name = "mdharvest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON array of URLs to process
    #[arg(long, default_value = "urls.json")]
    urls: PathBuf,

    /// Root directory for raw/, clean/, and reports/ output
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Override the chat-completion API base URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Override the cleaning model
    #[arg(long)]
    model: Option<String>,

    /// Pause between URLs, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() {
    // .env is optional; a missing file is not an error
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Credential check runs before the URL list is touched
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    config = config
        .with_urls_file(cli.urls)
        .with_output_dir(cli.output)
        .with_request_delay(Duration::from_millis(cli.delay_ms));

    if let Some(base_url) = cli.api_base_url {
        config = config.with_api_base_url(base_url);
    }
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    match Pipeline::new(config).run().await {
        Ok(report) => {
            println!("{}", report.summary());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
