mod browser;
mod config;
mod content;
mod dataset;
mod dispatch;
mod errors;
mod listing;
mod llm_client;
mod merge;
mod models;
mod pipeline;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::browser::HttpPageSource;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting qualification pipeline v{}", env!("CARGO_PKG_VERSION"));

    let stage = std::env::args().nth(1).unwrap_or_else(|| "extract".to_string());
    match stage.as_str() {
        "extract" => run_extract(&config).await,
        "parse-listing" => run_parse_listing(&config),
        other => bail!("unknown stage '{other}' (expected 'extract' or 'parse-listing')"),
    }
}

/// The main stage: collect pages, extract qualifications, write the merged
/// dataset.
async fn run_extract(config: &Config) -> Result<()> {
    let started = Instant::now();
    let today = chrono::Local::now().date_naive();
    let sheets_dir = Path::new(&config.sheets_dir);

    let input = dataset::input_path(sheets_dir, today);
    let data = dataset::read_dataset(&input)?;
    info!("loaded {} records from {}", data.records.len(), input.display());

    let llm = LlmClient::new(
        config.llm_api_url.clone(),
        config.llm_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    );
    llm.health_check().await.map_err(|e| {
        AppError::Endpoint(format!("{e}; is the local model server running?"))
    })?;
    info!("inference endpoint reachable (model: {})", config.llm_model);

    let source = HttpPageSource::new(Duration::from_secs(config.fetch_timeout_secs));
    let pipeline = Pipeline::new(Arc::new(llm), config.max_workers);
    let merged = pipeline.run(&data.records, &source).await;

    let output = dataset::output_path(sheets_dir, today);
    dataset::write_results(&output, &data.headers, &merged)?;
    info!("wrote {} rows to {}", merged.len(), output.display());
    info!("finished in {:.2}s", started.elapsed().as_secs_f64());

    Ok(())
}

/// Preparation stage: captured listing-card snippets → structured rows.
fn run_parse_listing(config: &Config) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let sheets_dir = Path::new(&config.sheets_dir);

    let input = dataset::captured_path(sheets_dir, today);
    let file = File::open(&input).map_err(|e| {
        AppError::Dataset(format!("cannot open captured listing {}: {e}", input.display()))
    })?;
    let entries = listing::parse_captured(file)?;
    info!("parsed {} listing cards from {}", entries.len(), input.display());

    let output = dataset::listing_path(sheets_dir, today);
    let out = File::create(&output).map_err(AppError::Io)?;
    listing::write_listing(out, &entries)?;
    info!("wrote {} rows to {}", entries.len(), output.display());

    Ok(())
}
