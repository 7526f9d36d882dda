use std::str::FromStr;

use anyhow::{Context, Result};

/// Runtime configuration loaded from environment variables.
///
/// Every value has a default matching a local Ollama-style endpoint, so a
/// bare `pipeline` run works against a stock local setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI-chat-compatible completions endpoint.
    pub llm_api_url: String,
    pub llm_model: String,
    /// Per-call timeout. Local-model inference is slow — minutes, not seconds.
    pub llm_timeout_secs: u64,
    /// Extraction worker count. Sized to the inference server, not the CPU.
    pub max_workers: usize,
    pub fetch_timeout_secs: u64,
    /// Directory holding the dated input/output datasets.
    pub sheets_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_url: env_or(
                "LLM_API_URL",
                "http://localhost:11434/v1/chat/completions",
            ),
            llm_model: env_or("LLM_MODEL", "gpt-oss"),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 300)?,
            max_workers: parse_env("MAX_WORKERS", crate::dispatch::DEFAULT_CONCURRENCY)?,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 20)?,
            sheets_dir: env_or("SHEETS_DIR", "sheets"),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
