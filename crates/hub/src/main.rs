//! Document hub CLI.
//!
//! A single entry point with no flags: loads `hub.toml` (or `$HUB_CONFIG`),
//! runs the whole publishing pipeline and prints a summary. Exits with
//! status 1 on any fatal error.

mod output;

use clap::Parser;
use hub::{Pipeline, PipelineError, PipelineSummary};
use hub_config::{Config, ConfigError};
use hub_notion::NotionClient;
use tracing_subscriber::EnvFilter;

use output::Output;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,hub=info,hub_notion=info,hub_identity=info,hub_store=info,hub_site=info";

/// Mirror remote workspace records into the static document portal.
#[derive(Parser)]
#[command(name = "hub", version, about)]
struct Cli;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

fn main() {
    Cli::parse();
    let output = Output::new();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(summary) => output.summary(&summary),
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}

fn run() -> Result<PipelineSummary, CliError> {
    let config = Config::load(None)?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "loaded configuration");
    }

    let notion = &config.notion;
    let client = NotionClient::new(&notion.base_url, &notion.token, &notion.database_id)
        .with_api_version(&notion.api_version)
        .with_page_size(notion.page_size)
        .with_timeout(notion.timeout_secs);

    let summary = Pipeline::new(&config, &client).run()?;
    tracing::info!(
        documents = %config.paths_resolved.documents_dir().display(),
        "site written"
    );
    Ok(summary)
}
