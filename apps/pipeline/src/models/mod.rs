// Pipeline data types. Every stage owns its input until it emits output;
// nothing here is mutated after emission — the flow is strictly forward.

pub mod outcome;
pub mod record;

pub use outcome::{Extraction, ExtractionOutcome, ExtractionStatus};
pub use record::{MergedRecord, PageContent, ReducedPage, SourceRecord};
