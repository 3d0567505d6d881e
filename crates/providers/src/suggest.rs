//! Topic and goal suggestion helpers.
//!
//! Both helpers run a single completion on the cheapest instruct model,
//! parse a JSON array out of whatever the model returned, and fall back to a
//! fixed list on any failure. They never return an error: a broken provider
//! must not break the suggestion UX.

use promptforge_core::message::ChatMessage;
use promptforge_core::provider::{Provider, ProviderRequest};
use tracing::warn;

use crate::model_utils::best_helper_model;

/// Suggest 8 starting topics for a generation session.
pub async fn suggest_topics(provider: &dyn Provider) -> Vec<String> {
    let prompt = "Provide a list of 8 deeply interesting, multidisciplinary topics that would be \
        excellent starting points for an AI-powered creative or strategic session.\n\
        Format the output as a JSON array of strings. Do not include any other text.\n\
        Example: [\"The future of decentralized science (DeSci)\", \"The philosophy of post-humanism\", \
        \"Sustainable fashion and eco-friendly textiles\", \"AI-powered personal finance management\", \
        \"Remote work productivity tools\", \"Mental health and wellness apps\", \
        \"Blockchain applications in supply chain\", \"Renewable energy storage solutions\"]";

    let topics = match run_suggestion(provider, prompt.to_string(), 400, 100).await {
        Ok(topics) => topics,
        Err(message) => {
            warn!(error = %message, "Topic suggestion failed, serving fallback list");
            Vec::new()
        }
    };

    if topics.is_empty() {
        return fallback_topics();
    }
    topics
}

/// Suggest 8 strategic goals for a topic.
pub async fn suggest_goals(provider: &dyn Provider, topic: &str) -> Vec<String> {
    let prompt = format!(
        "Based on the user's topic \"{topic}\", generate a list of 8 distinct, \
        action-oriented strategic goals. These goals should be clear, concise, and \
        represent different approaches to working with this topic.\n\
        Format the output as a JSON array of strings. Do not include any other text.\n\
        Example: [\"Create a comprehensive business plan for {topic}\", \
        \"Write a detailed technical guide about {topic}\", \
        \"Develop marketing content and strategy for {topic}\", \
        \"Design an educational course on {topic}\", \
        \"Build a product roadmap for {topic} solutions\", \
        \"Create research documentation for {topic}\", \
        \"Develop case studies and examples for {topic}\", \
        \"Design user experience flows for {topic} applications\"]"
    );

    let goals = match run_suggestion(provider, prompt, 600, 150).await {
        Ok(goals) => goals,
        Err(message) => {
            warn!(topic = %topic, error = %message, "Goal suggestion failed, serving fallback list");
            Vec::new()
        }
    };

    if goals.is_empty() {
        return fallback_goals(topic);
    }
    goals
}

async fn run_suggestion(
    provider: &dyn Provider,
    prompt: String,
    max_tokens: u32,
    max_line_len: usize,
) -> Result<Vec<String>, String> {
    let model = best_helper_model(provider).await.map_err(|e| e.to_string())?;

    let request = ProviderRequest::new(model, vec![ChatMessage::user(prompt)])
        .with_temperature(0.8)
        .with_max_tokens(max_tokens);

    let response = provider.complete(request).await.map_err(|e| e.to_string())?;
    Ok(parse_suggestions(&response.content, max_line_len))
}

/// Pull a list of suggestions out of a model response: a JSON array if one
/// can be found, otherwise one suggestion per line with numbered-list
/// prefixes removed.
fn parse_suggestions(content: &str, max_line_len: usize) -> Vec<String> {
    if let Some(json) = extract_json_array(content) {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(json) {
            return items;
        }
    }

    content
        .lines()
        .map(|line| strip_numbered_prefix(line).trim())
        .filter(|line| line.len() > 10 && line.len() < max_line_len)
        .take(8)
        .map(str::to_string)
        .collect()
}

/// The span from the first `[` to the last `]`, if both exist in order.
fn extract_json_array(content: &str) -> Option<&str> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&content[start..=end])
}

/// Strip a leading `1. ` style list marker.
fn strip_numbered_prefix(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix('.') {
            return rest.trim_start();
        }
    }
    line
}

fn fallback_topics() -> Vec<String> {
    [
        "Sustainable fashion and eco-friendly textiles",
        "AI-powered personal finance management",
        "Remote work productivity tools",
        "Mental health and wellness apps",
        "Blockchain applications in supply chain",
        "Renewable energy storage solutions",
        "Autonomous vehicle safety systems",
        "Personalized learning platforms",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn fallback_goals(topic: &str) -> Vec<String> {
    vec![
        format!("Create a comprehensive business plan for {topic}"),
        format!("Write a detailed technical guide about {topic}"),
        format!("Develop marketing content and strategy for {topic}"),
        format!("Design an educational course on {topic}"),
        format!("Build a product roadmap for {topic} solutions"),
        format!("Create research documentation for {topic}"),
        format!("Develop case studies and examples for {topic}"),
        format!("Design user experience flows for {topic} applications"),
    ]
}
