//! End-to-end integration tests for the Promptforge generation engine.
//!
//! These tests exercise the full pipeline from seed prompt to parsed records,
//! including tool execution against the built-in catalog, session bookkeeping,
//! and the gateway router.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use promptforge_agent::{AgentError, PromptEngine, PromptSession, MALFORMED_RESPONSE};
use promptforge_core::catalog::Catalog;
use promptforge_core::error::{ProviderError, ToolError};
use promptforge_core::provider::{Provider, ProviderRequest, ProviderResponse};
use promptforge_core::record::GeneratedPromptRecord;
use promptforge_tools::default_registry;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted completions in sequence.
struct ScriptedProvider {
    turns: Mutex<VecDeque<String>>,
    call_count: Mutex<usize>,
}

impl ScriptedProvider {
    fn new(turns: Vec<&str>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().map(String::from).collect()),
            call_count: Mutex::new(0),
        }
    }

    fn text(turn: &str) -> Self {
        Self::new(vec![turn])
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let mut turns = self.turns.lock().unwrap();
        let content = turns
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider exhausted at call #{}", *count + 1));
        *count += 1;
        Ok(ProviderResponse {
            content,
            model: "mock".into(),
        })
    }
}

fn engine_with(provider: ScriptedProvider) -> (Arc<ScriptedProvider>, PromptEngine) {
    let provider = Arc::new(provider);
    let engine = PromptEngine::new(
        provider.clone(),
        Arc::new(default_registry(Duration::from_secs(5))),
        Arc::new(Catalog::seed()),
        "mock-model",
    );
    (provider, engine)
}

const FINAL_JSON: &str = r#"[
  {"title": "Pragmatic Guide", "personaUsed": "PragmaticEngineerPersona", "prompt": "Write a setup guide."},
  {"title": "Design Brief", "personaUsed": "CreativeDesignerPersona", "prompt": "Sketch the onboarding flow."}
]"#;

// ── E2E: Full Generation Pipeline ────────────────────────────────────────

#[tokio::test]
async fn e2e_generation_with_catalog_tool_call() {
    // Scenario: the model inspects a persona with a tool, then answers.
    let (provider, engine) = engine_with(ScriptedProvider::new(vec![
        "I should check what this persona emphasizes.\nAction: getPersonaDetails(PragmaticEngineerPersona)",
        FINAL_JSON,
    ]));

    let records = engine
        .generate("rust tooling", "write onboarding docs", &[])
        .await
        .expect("generation should succeed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Pragmatic Guide");
    assert_eq!(records[0].persona_used, "PragmaticEngineerPersona");
    assert_eq!(provider.calls(), 2); // tool turn + final answer
}

#[tokio::test]
async fn e2e_generation_direct_answer_no_tools() {
    let (provider, engine) = engine_with(ScriptedProvider::text(FINAL_JSON));

    let records = engine
        .generate("urban gardening", "plan a starter guide", &[])
        .await
        .expect("generation should succeed");

    assert_eq!(records.len(), 2);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_generation_fenced_answer_still_parses() {
    let fenced = format!("```json\n{FINAL_JSON}\n```");
    let (_, engine) = engine_with(ScriptedProvider::text(&fenced));

    let records = engine
        .generate("t", "g", &[])
        .await
        .expect("fenced JSON should parse");
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn e2e_generation_prose_answer_is_an_error() {
    let (_, engine) = engine_with(ScriptedProvider::text(
        "Here are some great prompts for you!",
    ));

    let err = engine.generate("t", "g", &[]).await.unwrap_err();
    assert!(matches!(err, AgentError::MalformedResponse));
    assert_eq!(err.to_string(), MALFORMED_RESPONSE);
}

// ── E2E: Streamed Progress Events ────────────────────────────────────────

#[tokio::test]
async fn e2e_stream_reports_loop_progress_in_order() {
    let (_, engine) = engine_with(ScriptedProvider::new(vec![
        "Checking the catalog first.\nAction: listAvailablePersonas()",
        FINAL_JSON,
    ]));

    let mut events = engine.generate_stream("t", "g", Vec::new());
    let mut kinds = Vec::new();
    while let Some(event) = events.recv().await {
        kinds.push(event.event_type());
    }

    assert_eq!(
        kinds,
        vec![
            "thought",
            "action_started",
            "observation",
            "thought",
            "complete"
        ]
    );
}

// ── E2E: Refinement Pipeline ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_refinement_appends_to_session() {
    let refined_json = r#"{"title": "Pragmatic Guide v2", "personaUsed": "PragmaticEngineerPersona", "prompt": "Write a sharper setup guide."}"#;
    let (_, engine) = engine_with(ScriptedProvider::text(refined_json));

    let original = GeneratedPromptRecord {
        title: "Pragmatic Guide".into(),
        persona_used: "PragmaticEngineerPersona".into(),
        prompt: "Write a setup guide.".into(),
    };

    let mut session = PromptSession::new(&["PragmaticEngineerPersona".to_string()]);
    session.complete("PragmaticEngineerPersona", original.clone());

    let refined = engine
        .refine(&original, Some("make it more concise"))
        .await
        .expect("refinement should succeed");
    session.append_refined(refined);

    // The original record stays; the refinement lands after it.
    let records = session.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Pragmatic Guide");
    assert_eq!(records[1].title, "Pragmatic Guide v2");
}

// ── E2E: Session Bookkeeping ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_session_tracks_personas_independently() {
    let personas: Vec<String> = vec![
        "PragmaticEngineerPersona".into(),
        "EducatorPersona".into(),
        "ResearcherPersona".into(),
    ];
    let mut session = PromptSession::new(&personas);

    // Results arrive out of order; one persona fails outright.
    session.mark_generating("ResearcherPersona");
    session.mark_generating("PragmaticEngineerPersona");
    session.complete(
        "ResearcherPersona",
        GeneratedPromptRecord {
            title: "Methodical Review".into(),
            persona_used: "ResearcherPersona".into(),
            prompt: "Survey the literature.".into(),
        },
    );
    session.fail("EducatorPersona", "upstream hiccup");
    session.complete(
        "PragmaticEngineerPersona",
        GeneratedPromptRecord {
            title: "Pragmatic Guide".into(),
            persona_used: "PragmaticEngineerPersona".into(),
            prompt: "Write a setup guide.".into(),
        },
    );

    assert!(session.is_settled());

    // Completed records come back in the session's display order, not in
    // completion order, and the failed persona contributes nothing.
    let titles: Vec<&str> = session.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Pragmatic Guide", "Methodical Review"]);
}

// ── E2E: Tool Registry Full Coverage ─────────────────────────────────────

#[tokio::test]
async fn e2e_registered_tools_match_contract() {
    let registry = default_registry(Duration::from_secs(5));

    assert_eq!(
        registry.names(),
        vec![
            "getPersonaDetails",
            "getTaskDetails",
            "listAvailablePersonas",
            "listAvailableTasks",
            "searchTheWeb",
            "suggestGoals",
        ]
    );
}

#[tokio::test]
async fn e2e_catalog_tools_answer_from_seed_data() {
    let registry = default_registry(Duration::from_secs(5));
    let catalog = Catalog::seed();

    let detail = registry
        .execute(
            &catalog,
            "getPersonaDetails",
            &["PragmaticEngineerPersona".to_string()],
        )
        .await
        .expect("lookup should succeed");
    assert_eq!(detail["term"], "PragmaticEngineerPersona");
    assert!(detail["content"].as_str().unwrap().contains("pragmatic"));

    let listing = registry
        .execute(&catalog, "listAvailableTasks", &[])
        .await
        .expect("listing should succeed");
    assert_eq!(listing.as_array().unwrap().len(), 5);

    let goals = registry
        .execute(&catalog, "suggestGoals", &["rust tooling".to_string()])
        .await
        .expect("suggestions should succeed");
    assert!(!goals.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn e2e_unknown_tool_is_reported_not_thrown() {
    let registry = default_registry(Duration::from_secs(5));
    let catalog = Catalog::seed();

    let err = registry
        .execute(&catalog, "launchMissiles", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotFound(name) if name == "launchMissiles"));
}

// ── E2E: Gateway Router ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_health_and_options() {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let state = promptforge_gateway::GatewayState::from_config(
        promptforge_config::AppConfig::default(),
    );
    let app = promptforge_gateway::build_router(state);

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/options")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let options: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(options["personas"].as_array().unwrap().len(), 5);
    assert_eq!(options["tasks"].as_array().unwrap().len(), 5);
}

// ── E2E: Configuration System ────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_defaults_and_toml_roundtrip() {
    let config = promptforge_config::AppConfig::default();

    // Verify sensible defaults.
    assert_eq!(config.provider.name, "fireworks");
    assert_eq!(config.provider.request_timeout_secs, 25);
    assert!(config.server.port > 0);
    assert!(!config.server.host.is_empty());
    assert!(config.agent.max_iterations > 0);

    // Verify TOML roundtrip.
    let toml_str = toml::to_string_pretty(&config).expect("Config should serialize");
    let reparsed: promptforge_config::AppConfig =
        toml::from_str(&toml_str).expect("Config should parse back");

    assert_eq!(reparsed.provider.name, config.provider.name);
    assert_eq!(reparsed.server.port, config.server.port);
}
