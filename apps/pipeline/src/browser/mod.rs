//! Rendered-page acquisition.
//!
//! The pipeline only consumes markup strings; where they come from is a
//! collaborator concern behind `PageSource`. `HttpPageSource` covers
//! server-rendered postings; a live driver session (WebDriver and friends)
//! plugs in behind the same trait without touching the pipeline.
//!
//! Collection is strictly sequential — a browser-style session drives one
//! page at a time — so the slow, parallel-safe extraction phase is kept
//! entirely separate from it.

pub mod apply_link;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{PageContent, SourceRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timeout fetching {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {0} for {1}")]
    Status(u16, String),
}

/// One operation: navigate, wait for load-complete, yield the full rendered
/// markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain-HTTP page source for server-rendered postings.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Mozilla/5.0 (compatible; qual-pipeline/0.1)")
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16(), url.to_string()));
        }

        response.text().await.map_err(|e| FetchError::Http(e.to_string()))
    }
}

/// Sequential collect phase: one page per record, in record order.
///
/// A failed fetch yields a `PageContent` with no markup — the record stays
/// in the batch and surfaces downstream as a no-content outcome. The run is
/// never aborted from here.
pub async fn collect_pages(source: &dyn PageSource, records: &[SourceRecord]) -> Vec<PageContent> {
    let total = records.len();
    let mut pages = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        info!("collecting ({}/{total}): {}", i + 1, record.key);
        let markup = match source.fetch_rendered(&record.key).await {
            Ok(markup) => Some(markup),
            Err(e) => {
                warn!("fetch failed for {}: {e}", record.key);
                None
            }
        };
        pages.push(PageContent {
            key: record.key.clone(),
            markup,
        });
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    struct ScriptedSource {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_rendered(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status(404, url.to_string()))
        }
    }

    fn record(key: &str) -> SourceRecord {
        SourceRecord {
            key: key.to_string(),
            fields: vec![key.to_string()],
        }
    }

    #[tokio::test]
    async fn test_collect_yields_one_page_per_record_in_order() {
        let source = ScriptedSource {
            pages: HashMap::from([
                ("a".to_string(), "<html>a</html>".to_string()),
                ("c".to_string(), "<html>c</html>".to_string()),
            ]),
        };
        let records = vec![record("a"), record("b"), record("c")];

        let pages = collect_pages(&source, &records).await;

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].key, "a");
        assert!(pages[0].markup.is_some());
        // failed fetch keeps its slot, with no markup
        assert_eq!(pages[1].key, "b");
        assert!(pages[1].markup.is_none());
        assert_eq!(pages[2].markup.as_deref(), Some("<html>c</html>"));
    }
}
