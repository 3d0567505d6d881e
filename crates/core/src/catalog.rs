//! The prompt-component catalog — the shared read-only context every tool
//! receives.
//!
//! A catalog holds reusable prompt fragments ("personas" and "tasks"). It is
//! loaded once per process (from an external source or the built-in seed
//! data) and passed to tools behind an `Arc`; nothing mutates it after
//! construction.

use serde::{Deserialize, Serialize};

/// What kind of prompt fragment a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Persona,
    Task,
    Qualifier,
    Constraint,
    Format,
}

/// A single reusable prompt fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptComponent {
    /// Row id when the component came from an external store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    /// Unique name, e.g. `PragmaticEngineerPersona`.
    pub term: String,

    /// One-line summary shown in pickers.
    pub description: String,

    /// The full fragment text injected into prompts.
    pub content: String,

    #[serde(rename = "component_type")]
    pub kind: ComponentKind,
}

impl PromptComponent {
    pub fn persona(
        term: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            term: term.into(),
            description: description.into(),
            content: content.into(),
            kind: ComponentKind::Persona,
        }
    }

    pub fn task(
        term: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            term: term.into(),
            description: description.into(),
            content: content.into(),
            kind: ComponentKind::Task,
        }
    }
}

/// Read-only application data: all personas and tasks known to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub personas: Vec<PromptComponent>,
    pub tasks: Vec<PromptComponent>,
}

impl Catalog {
    /// An empty catalog. Mostly useful in tests.
    pub fn empty() -> Self {
        Self {
            personas: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Look up a persona by term, case-insensitively.
    pub fn persona(&self, term: &str) -> Option<&PromptComponent> {
        self.personas
            .iter()
            .find(|p| p.term.eq_ignore_ascii_case(term))
    }

    /// Look up a task by term, case-insensitively.
    pub fn task(&self, term: &str) -> Option<&PromptComponent> {
        self.tasks
            .iter()
            .find(|t| t.term.eq_ignore_ascii_case(term))
    }

    /// All persona terms, in catalog order.
    pub fn persona_terms(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.term.as_str()).collect()
    }

    /// All task terms, in catalog order.
    pub fn task_terms(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.term.as_str()).collect()
    }

    /// The built-in catalog used when no external data source is configured.
    pub fn seed() -> Self {
        Self {
            personas: vec![
                PromptComponent::persona(
                    "PragmaticEngineerPersona",
                    "A practical software engineer focused on clean code and efficient solutions",
                    "You are a pragmatic software engineer with 10+ years of experience. You focus on \
                     writing clean, maintainable code that solves real problems efficiently. You \
                     prioritize practical solutions over theoretical perfection, but always ensure \
                     code quality and scalability.",
                ),
                PromptComponent::persona(
                    "CreativeDesignerPersona",
                    "A creative UX/UI designer who thinks about user experience first",
                    "You are a creative UX/UI designer with a passion for user-centered design. You \
                     think deeply about user psychology, visual hierarchy, and creating delightful \
                     experiences. You balance aesthetics with functionality.",
                ),
                PromptComponent::persona(
                    "BusinessStrategistPersona",
                    "A strategic business thinker focused on market analysis and growth",
                    "You are a strategic business consultant with expertise in market analysis, \
                     competitive strategy, and business development. You focus on identifying \
                     opportunities, analyzing market trends, and developing actionable growth \
                     strategies.",
                ),
                PromptComponent::persona(
                    "EducatorPersona",
                    "An experienced educator who excels at breaking down complex topics",
                    "You are an experienced educator and curriculum designer with a talent for making \
                     complex topics accessible and engaging. You focus on learning outcomes, \
                     progressive skill building, and creating materials that cater to different \
                     learning styles.",
                ),
                PromptComponent::persona(
                    "ResearcherPersona",
                    "A meticulous researcher who values data and evidence-based approaches",
                    "You are a meticulous researcher with a PhD-level understanding of research \
                     methodology. You value empirical evidence, rigorous analysis, and systematic \
                     approaches to problem-solving. You excel at literature reviews and data \
                     interpretation.",
                ),
            ],
            tasks: vec![
                PromptComponent::task(
                    "TechnicalDocumentationTask",
                    "Create comprehensive technical documentation and guides",
                    "Create detailed technical documentation including API references, setup guides, \
                     troubleshooting manuals, and best practices documentation.",
                ),
                PromptComponent::task(
                    "BusinessAnalysisTask",
                    "Conduct market research and competitive analysis",
                    "Perform comprehensive market research, competitive analysis, SWOT assessments, \
                     and strategic recommendations for business development.",
                ),
                PromptComponent::task(
                    "ContentCreationTask",
                    "Develop engaging content for various platforms and audiences",
                    "Create compelling content including blog posts, social media content, marketing \
                     copy, educational materials, and thought leadership pieces.",
                ),
                PromptComponent::task(
                    "ProductDesignTask",
                    "Design user experiences and product interfaces",
                    "Design user interfaces, user experiences, wireframes, prototypes, and conduct \
                     user research to create intuitive and engaging products.",
                ),
                PromptComponent::task(
                    "EducationalContentTask",
                    "Develop educational materials and learning experiences",
                    "Create courses, tutorials, workshops, training materials, and educational \
                     resources that effectively teach complex topics.",
                ),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_catalog_has_five_of_each() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.personas.len(), 5);
        assert_eq!(catalog.tasks.len(), 5);
    }

    #[test]
    fn persona_lookup_is_case_insensitive() {
        let catalog = Catalog::seed();
        let hit = catalog.persona("pragmaticengineerpersona").unwrap();
        assert_eq!(hit.term, "PragmaticEngineerPersona");
        assert!(catalog.persona("NoSuchPersona").is_none());
    }

    #[test]
    fn task_lookup_is_case_insensitive() {
        let catalog = Catalog::seed();
        assert!(catalog.task("TECHNICALDOCUMENTATIONTASK").is_some());
        assert!(catalog.task("MissingTask").is_none());
    }

    #[test]
    fn component_kind_serializes_capitalized() {
        let json = serde_json::to_string(&PromptComponent::persona("P", "d", "c")).unwrap();
        assert!(json.contains(r#""component_type":"Persona""#));
    }

    #[test]
    fn catalog_roundtrip() {
        let catalog = Catalog::seed();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.personas.len(), catalog.personas.len());
        assert_eq!(back.personas[0], catalog.personas[0]);
    }
}
