use serde::{Deserialize, Serialize};

/// Terminal status of one extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// The endpoint replied and the reply parsed — the lists may still be
    /// legitimately empty.
    Ok,
    /// Nothing to extract: the page yielded no text, so no call was made.
    NoContent,
    /// Transport-level failure (timeout, non-2xx, connection refused).
    CallFailed,
    /// The endpoint replied but no parser strategy could recover JSON.
    ParseFailed,
}

/// Result of one extraction attempt, before it is tied back to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub qualifications: Vec<String>,
    pub preferred: Vec<String>,
    pub status: ExtractionStatus,
}

impl Extraction {
    pub fn ok(qualifications: Vec<String>, preferred: Vec<String>) -> Self {
        Self {
            qualifications,
            preferred,
            status: ExtractionStatus::Ok,
        }
    }

    /// A non-`Ok` outcome. Both lists are always empty on failure.
    pub fn failed(status: ExtractionStatus) -> Self {
        Self {
            qualifications: Vec::new(),
            preferred: Vec::new(),
            status,
        }
    }
}

/// One extraction result tied to its source record. Exactly one of these
/// exists per input record by the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub key: String,
    pub extraction: Extraction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_extraction_has_empty_lists() {
        let extraction = Extraction::failed(ExtractionStatus::CallFailed);
        assert!(extraction.qualifications.is_empty());
        assert!(extraction.preferred.is_empty());
        assert_eq!(extraction.status, ExtractionStatus::CallFailed);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ExtractionStatus::ParseFailed).unwrap();
        assert_eq!(json, r#""parse_failed""#);
    }

    #[test]
    fn test_empty_ok_is_distinct_from_failure() {
        let empty_ok = Extraction::ok(Vec::new(), Vec::new());
        let failed = Extraction::failed(ExtractionStatus::ParseFailed);
        assert_ne!(empty_ok, failed);
    }
}
