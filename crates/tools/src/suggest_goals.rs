//! Goal suggestion tool.
//!
//! Deterministic, catalog-aware goal templates — no model call. Persona
//! arguments that exist in the catalog contribute a persona-specific goal,
//! placed ahead of the generic templates so the persona bias survives the
//! five-goal cap.

use async_trait::async_trait;
use promptforge_core::catalog::Catalog;
use promptforge_core::tool::AgentTool;
use serde_json::{json, Value};
use tracing::debug;

const GOAL_LIMIT: usize = 5;

pub struct SuggestGoals;

/// The persona-specific phrasing for each seeded persona. Personas outside
/// the table fall back to a generic perspective goal.
fn persona_goal(term: &str, topic: &str) -> String {
    match term {
        "PragmaticEngineerPersona" => format!("Design technical architecture for {topic} systems"),
        "CreativeDesignerPersona" => {
            format!("Create visual design concepts for {topic} interfaces")
        }
        "BusinessStrategistPersona" => format!("Develop market analysis and strategy for {topic}"),
        "EducatorPersona" => format!("Design educational materials and curriculum for {topic}"),
        "ResearcherPersona" => format!("Conduct research methodology for {topic} studies"),
        _ => format!("Apply {term} perspective to {topic} development"),
    }
}

fn base_goals(topic: &str) -> Vec<String> {
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

#[async_trait]
impl AgentTool for SuggestGoals {
    fn name(&self) -> &str {
        "suggestGoals"
    }

    fn description(&self) -> &str {
        "Suggest up to five goals for a topic, biased toward the given personas."
    }

    async fn execute(&self, catalog: &Catalog, args: &[String]) -> Value {
        let topic = args.first().map(String::as_str).unwrap_or("");
        let personas = args.get(1..).unwrap_or_default();
        debug!(topic, personas = personas.len(), "Suggesting goals");

        // Persona goals first so they survive the cap; only personas that
        // exist in the catalog count.
        let mut goals: Vec<String> = personas
            .iter()
            .filter_map(|name| catalog.persona(name))
            .map(|p| persona_goal(&p.term, topic))
            .collect();
        goals.extend(base_goals(topic));
        goals.truncate(GOAL_LIMIT);

        json!(goals)
    }
}
