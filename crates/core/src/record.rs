//! Terminal output and web search value objects.

use serde::{Deserialize, Serialize};

/// The structured record every successful run must terminate with.
///
/// The wire shape is `{"title", "personaUsed", "prompt"}` — the main loop
/// produces an array of these, the refinement loop a single object (or a
/// one-element array). Anything else is a malformed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratedPromptRecord {
    /// Short, engaging title for the prompt.
    pub title: String,

    /// The exact `term` of the persona this prompt was written for.
    pub persona_used: String,

    /// The full generated prompt text.
    pub prompt: String,
}

impl GeneratedPromptRecord {
    pub fn new(
        title: impl Into<String>,
        persona_used: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            persona_used: persona_used.into(),
            prompt: prompt.into(),
        }
    }
}

/// One entry from the web search tool, ordered by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_on_the_wire() {
        let record = GeneratedPromptRecord::new("T", "P", "X");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"title":"T","personaUsed":"P","prompt":"X"}"#);
    }

    #[test]
    fn record_rejects_snake_case_field() {
        let err = serde_json::from_str::<GeneratedPromptRecord>(
            r#"{"title":"T","persona_used":"P","prompt":"X"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn record_rejects_alternate_schema() {
        // The {title, persona, content} variant from older iterations must
        // not pass the strict parse.
        let err = serde_json::from_str::<GeneratedPromptRecord>(
            r#"{"title":"T","persona":"P","content":"X"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn search_result_roundtrip() {
        let result = SearchResult {
            title: "Rust".into(),
            link: "https://rust-lang.org".into(),
            snippet: "A systems language".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
