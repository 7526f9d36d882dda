//! Bounded-concurrency dispatch of extraction calls.
//!
//! The extraction phase is the pipeline's only parallel region. A fixed pool
//! of workers draws from the item set; backpressure on the shared inference
//! endpoint is implicit in the pool bound, not an explicit queue. Workers
//! share no mutable state — every outcome carries its own key, so ordering
//! is re-established at merge time, not here.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::llm_client::Extractor;
use crate::models::{Extraction, ExtractionOutcome, ExtractionStatus, ReducedPage};

/// Default worker count — sized to local inference-server capacity, not CPU
/// count.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs the extractor over every item under a fixed concurrency bound.
///
/// Callers filter empty-text items out beforehand; everything submitted here
/// costs one inference call. Outcomes are collected in completion order. A
/// panic in one item's task is caught, logged, and downgraded to
/// `CallFailed` for that key alone — siblings and unsubmitted items are
/// unaffected. Returns exactly one outcome per submitted item.
pub async fn dispatch_all(
    extractor: Arc<dyn Extractor>,
    items: Vec<ReducedPage>,
    concurrency: usize,
) -> Vec<ExtractionOutcome> {
    let concurrency = concurrency.max(1);
    let total = items.len();
    info!("dispatching {total} items across {concurrency} workers");

    stream::iter(items.into_iter().map(|item| {
        let extractor = Arc::clone(&extractor);
        async move {
            let ReducedPage { key, text } = item;
            let task = tokio::spawn({
                let extractor = Arc::clone(&extractor);
                async move { extractor.extract(&text).await }
            });
            let extraction = match task.await {
                Ok(extraction) => extraction,
                Err(e) => {
                    warn!("extraction task for {key} aborted: {e}");
                    Extraction::failed(ExtractionStatus::CallFailed)
                }
            };
            ExtractionOutcome { key, extraction }
        }
    }))
    .buffer_unordered(concurrency)
    .collect()
    .await
}
