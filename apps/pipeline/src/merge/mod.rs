//! Order-preserving merge of extraction outcomes onto the source records.
//!
//! Left-join semantics: every source record yields exactly one output row,
//! in input order, whether or not an outcome exists for its key. Failure
//! sentinels are fixed strings, distinguishable from a genuine empty `Ok`
//! result (which renders as an empty cell).

use std::collections::HashMap;

use crate::models::{Extraction, ExtractionOutcome, ExtractionStatus, MergedRecord, SourceRecord};

/// Written when the item was dispatched but no usable result came back, or
/// when no outcome exists for the key at all.
pub const SENTINEL_FAILED: &str = "extraction failed";

/// Written when the page yielded no extractable content (failed fetch or an
/// empty content band).
pub const SENTINEL_NO_CONTENT: &str = "page fetch failed or no content";

/// Indexes outcomes by key for the join. When the input repeats a key, the
/// last outcome wins — rows are still never duplicated or dropped.
pub fn index_outcomes(outcomes: Vec<ExtractionOutcome>) -> HashMap<String, Extraction> {
    outcomes
        .into_iter()
        .map(|outcome| (outcome.key, outcome.extraction))
        .collect()
}

/// Left-joins outcomes onto the original records.
///
/// Pure function of its inputs: merging the same records against the same
/// outcome map twice produces identical output.
pub fn merge(
    original: &[SourceRecord],
    outcomes: &HashMap<String, Extraction>,
) -> Vec<MergedRecord> {
    original
        .iter()
        .map(|record| {
            let (qualifications, preferred) = match outcomes.get(&record.key) {
                Some(extraction) => render(extraction),
                None => (SENTINEL_FAILED.to_string(), SENTINEL_FAILED.to_string()),
            };
            MergedRecord {
                fields: record.fields.clone(),
                qualifications,
                preferred,
            }
        })
        .collect()
}

/// Flattens one extraction into the two output cells.
fn render(extraction: &Extraction) -> (String, String) {
    match extraction.status {
        ExtractionStatus::Ok => (
            extraction.qualifications.join("\n"),
            extraction.preferred.join("\n"),
        ),
        ExtractionStatus::NoContent => (
            SENTINEL_NO_CONTENT.to_string(),
            SENTINEL_NO_CONTENT.to_string(),
        ),
        ExtractionStatus::CallFailed | ExtractionStatus::ParseFailed => {
            (SENTINEL_FAILED.to_string(), SENTINEL_FAILED.to_string())
        }
    }
}
