//! Thought-text parsing: action markers, code fences, terminal JSON.
//!
//! The model signals a tool call with a literal `Action:` line, e.g.
//! `Action: searchTheWeb("ai ethics")`. The grammar is deliberately naive —
//! first marker wins, arguments split on commas, quote characters removed —
//! because that is what deployed models reliably produce. Malformed action
//! text degrades to an unknown tool name, never an error.

use promptforge_core::record::GeneratedPromptRecord;

pub const ACTION_MARKER: &str = "Action:";

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    pub name: String,
    pub args: Vec<String>,
}

/// Scan a completed thought for an `Action:` marker.
///
/// Returns `None` only when the marker is absent (the thought is then the
/// final answer). The text considered runs from the first marker to the next
/// one, if the model emitted several. The function name is everything before
/// the first `(`; the arguments run to the LAST `)` (or to the end when the
/// close is missing), split on commas, each trimmed and with `'`, `"` and
/// backtick characters removed.
pub fn parse_action(thought: &str) -> Option<ActionCall> {
    let start = thought.find(ACTION_MARKER)? + ACTION_MARKER.len();
    let after = &thought[start..];
    let segment = match after.find(ACTION_MARKER) {
        Some(next) => &after[..next],
        None => after,
    }
    .trim();

    let Some(open) = segment.find('(') else {
        // Marker without a call form. Dispatch resolves this to a not-found
        // observation rather than ending the run.
        return Some(ActionCall {
            name: String::new(),
            args: Vec::new(),
        });
    };
    let name = segment[..open].to_string();

    let args_str = match segment.rfind(')') {
        Some(close) if close > open => &segment[open + 1..close],
        _ => &segment[open + 1..],
    };

    let args = if args_str.trim().is_empty() {
        Vec::new()
    } else {
        args_str.split(',').map(clean_arg).collect()
    };

    Some(ActionCall { name, args })
}

fn clean_arg(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '`'))
        .collect()
}

/// Remove Markdown ```json fences the model may wrap its final answer in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "").replace("```", "")
}

/// Parse a final thought into the terminal record array. Strict: anything
/// other than a JSON array of `{title, personaUsed, prompt}` objects fails.
pub fn parse_records(thought: &str) -> Result<Vec<GeneratedPromptRecord>, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(thought))
}

/// Parse a refinement result: a single record object, or an array holding
/// exactly one.
pub fn parse_refined(thought: &str) -> Option<GeneratedPromptRecord> {
    let cleaned = strip_code_fences(thought);
    if let Ok(record) = serde_json::from_str::<GeneratedPromptRecord>(&cleaned) {
        return Some(record);
    }
    match serde_json::from_str::<Vec<GeneratedPromptRecord>>(&cleaned) {
        Ok(mut records) if records.len() == 1 => Some(records.remove(0)),
        _ => None,
    }
}
