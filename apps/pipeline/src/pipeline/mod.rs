//! Two-phase pipeline: sequential collect-and-reduce, bounded-parallel
//! extraction, order-preserving merge.
//!
//! The phases are deliberately separate: the page source is driven one page
//! at a time, while extraction calls are parallel-safe, so neither phase is
//! serialized behind the other's bottleneck.

use std::sync::Arc;

use tracing::info;

use crate::browser::{self, PageSource};
use crate::content;
use crate::dispatch;
use crate::llm_client::Extractor;
use crate::merge;
use crate::models::{
    Extraction, ExtractionOutcome, ExtractionStatus, MergedRecord, ReducedPage, SourceRecord,
};

/// The extraction pipeline, wired with its backend and concurrency policy at
/// construction.
pub struct Pipeline {
    extractor: Arc<dyn Extractor>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn Extractor>, concurrency: usize) -> Self {
        Self {
            extractor,
            concurrency,
        }
    }

    /// Runs the full pipeline over the input records. Always returns exactly
    /// one merged row per input record, in input order.
    pub async fn run(
        &self,
        records: &[SourceRecord],
        source: &dyn PageSource,
    ) -> Vec<MergedRecord> {
        // Phase 1: collect and reduce, one page at a time.
        let pages = browser::collect_pages(source, records).await;
        let reduced: Vec<ReducedPage> = pages
            .into_iter()
            .map(|page| {
                let text = page.markup.as_deref().map(content::reduce).unwrap_or_default();
                ReducedPage {
                    key: page.key,
                    text,
                }
            })
            .collect();

        let (processable, unprocessable): (Vec<ReducedPage>, Vec<ReducedPage>) = reduced
            .into_iter()
            .partition(|page| !page.text.trim().is_empty());
        info!(
            "collected {} pages, {} processable, {} without content",
            records.len(),
            processable.len(),
            unprocessable.len()
        );

        // Phase 2: the sole parallel region.
        let mut outcomes =
            dispatch::dispatch_all(Arc::clone(&self.extractor), processable, self.concurrency)
                .await;

        // Items that never reached the dispatcher still get their outcome.
        outcomes.extend(unprocessable.into_iter().map(|page| ExtractionOutcome {
            key: page.key,
            extraction: Extraction::failed(ExtractionStatus::NoContent),
        }));

        log_status_counts(&outcomes);

        let index = merge::index_outcomes(outcomes);
        merge::merge(records, &index)
    }
}

fn log_status_counts(outcomes: &[ExtractionOutcome]) {
    let count = |status: ExtractionStatus| {
        outcomes
            .iter()
            .filter(|o| o.extraction.status == status)
            .count()
    };
    info!(
        ok = count(ExtractionStatus::Ok),
        no_content = count(ExtractionStatus::NoContent),
        call_failed = count(ExtractionStatus::CallFailed),
        parse_failed = count(ExtractionStatus::ParseFailed),
        "extraction finished"
    );
}
