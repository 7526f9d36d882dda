use serde::{Deserialize, Serialize};

/// One row of the input dataset.
///
/// `key` is the posting's apply link — unique per row and the join key for
/// every downstream stage. `fields` carries all input columns (the key
/// column included) through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub key: String,
    pub fields: Vec<String>,
}

/// Raw rendered markup for one record, as handed over by the page-source
/// collaborator. `markup` is `None` when the fetch failed. Consumed once by
/// the reducer and then dropped — it can be large and nothing downstream
/// needs it.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub key: String,
    pub markup: Option<String>,
}

/// Markup-free, whitespace-normalized text for one record.
///
/// Empty `text` means "nothing extractable" — such items never reach the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedPage {
    pub key: String,
    pub text: String,
}

/// Final output row: the source columns plus the two extracted columns,
/// each flattened to newline-joined text (or a sentinel on failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub fields: Vec<String>,
    pub qualifications: String,
    pub preferred: String,
}
