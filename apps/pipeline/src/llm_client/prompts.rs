// Prompt constants for qualification extraction. The JSON shape is spelled
// out verbatim in the prompt — small local models follow an example shape
// far more reliably than a prose description.

/// Template for the single extraction prompt. `{posting_text}` is replaced
/// with the reduced page text.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"The following is the content of a job-posting page. Find the qualifications (requirements) and the preferred qualifications in it and list each of them.
You MUST respond with ONLY a JSON object of exactly the following shape. If a section has no content, respond with an empty list ([]).

{
  "qualifications": [
    "first requirement",
    "second requirement"
  ],
  "preferred": [
    "first preferred qualification",
    "second preferred qualification"
  ]
}

--- posting content start ---
{posting_text}
--- posting content end ---"#;

/// Tiny prompt used by the endpoint health check.
pub const HEALTH_CHECK_PROMPT: &str = "Reply with the single word: ok";

/// Builds the extraction prompt for one reduced page.
pub fn build_extraction_prompt(posting_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{posting_text}", posting_text)
}
