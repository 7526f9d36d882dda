//! Layered recovery of JSON from model replies.
//!
//! Local models rarely honor "JSON only" to the letter: replies arrive
//! wrapped in markdown fences, prefixed with chatter, or occasionally as
//! clean JSON. Recovery is an ordered list of carving strategies, each
//! producing a candidate substring that is then parsed; the first candidate
//! that parses wins.

use serde::Deserialize;

/// The two array-valued fields the extraction prompt asks for. Either may be
/// absent in the reply; absence means an empty list.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedLists {
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
}

/// Which carving strategy produced the successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Interior of a ```json fenced block.
    FencedBlock,
    /// Substring from the first `{` to the last `}`.
    BraceSpan,
    /// The whole reply, verbatim.
    Verbatim,
}

/// A successful parse, tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub strategy: ParseStrategy,
    pub lists: ExtractedLists,
}

const STRATEGIES: [ParseStrategy; 3] = [
    ParseStrategy::FencedBlock,
    ParseStrategy::BraceSpan,
    ParseStrategy::Verbatim,
];

/// Tries each strategy in order, most-strict first. Returns `None` only when
/// every strategy fails — the caller reports that as a parse failure.
pub fn parse_reply(content: &str) -> Option<ParsedReply> {
    STRATEGIES.iter().find_map(|&strategy| {
        let candidate = carve(strategy, content)?;
        serde_json::from_str::<ExtractedLists>(candidate)
            .ok()
            .map(|lists| ParsedReply { strategy, lists })
    })
}

/// Carves the candidate substring for one strategy, without parsing it.
fn carve(strategy: ParseStrategy, content: &str) -> Option<&str> {
    match strategy {
        ParseStrategy::FencedBlock => {
            let start = content.find("```json")? + "```json".len();
            let interior = &content[start..];
            let end = interior.find("```")?;
            Some(interior[..end].trim())
        }
        ParseStrategy::BraceSpan => {
            let start = content.find('{')?;
            let end = content.rfind('}')?;
            (start < end).then(|| &content[start..=end])
        }
        ParseStrategy::Verbatim => Some(content.trim()),
    }
}
