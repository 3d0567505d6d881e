//! JSON API endpoints around the relay: web search, catalog options, model
//! listing, and topic/goal suggestions.

use crate::SharedState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use promptforge_core::catalog::PromptComponent;
use promptforge_core::record::SearchResult;
use promptforge_providers::{suggest_goals, suggest_topics};
use promptforge_tools::{search_duckduckgo, SearchError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

// ── Web search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// `POST /api/search` — scrape DuckDuckGo for up to five results.
pub async fn search_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let query = payload.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(bad_request("Query is required."));
    }

    info!(query = %query, "Search request");
    match search_duckduckgo(&state.search_client, query).await {
        Ok(results) => Ok(Json(results)),
        Err(SearchError::Timeout) => Err((
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new(SearchError::Timeout.to_string())),
        )),
        Err(SearchError::Failed(details)) => {
            warn!(query = %query, details = %details, "Search failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_details(
                    "Failed to fetch search results from DuckDuckGo.",
                    details,
                )),
            ))
        }
    }
}

// ── Catalog options ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub personas: Vec<PromptComponent>,
    pub tasks: Vec<PromptComponent>,
}

/// `GET /api/options` — the full persona and task catalog.
pub async fn options_handler(State(state): State<SharedState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        personas: state.catalog.personas.clone(),
        tasks: state.catalog.tasks.clone(),
    })
}

// ── Models ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// `GET /api/models` — model ids offered by the upstream provider.
pub async fn models_handler(
    State(state): State<SharedState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    match state.provider.list_models().await {
        Ok(models) => Ok(Json(ModelsResponse { models })),
        Err(e) => {
            warn!(error = %e, "Model listing failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_details(
                    "Failed to fetch models from the provider.",
                    e.to_string(),
                )),
            ))
        }
    }
}

// ── Suggestions ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

/// `POST /api/suggest-topics` — starting topics. Never fails; a broken
/// upstream serves the fallback list.
pub async fn suggest_topics_handler(State(state): State<SharedState>) -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: suggest_topics(state.provider.as_ref()).await,
    })
}

#[derive(Debug, Deserialize)]
pub struct SuggestGoalsRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<String>,
}

/// `POST /api/suggest-goals` — strategic goals for a topic.
pub async fn suggest_goals_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SuggestGoalsRequest>,
) -> Result<Json<GoalsResponse>, ApiError> {
    let topic = payload.topic.as_deref().map(str::trim).unwrap_or_default();
    if topic.is_empty() {
        return Err(bad_request("A valid \"topic\" is required."));
    }

    Ok(Json(GoalsResponse {
        goals: suggest_goals(state.provider.as_ref(), topic).await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use crate::test_support::state_with;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use promptforge_core::error::ProviderError;
    use promptforge_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Lists a fixed model set; completions always fail so suggestion
    /// endpoints exercise their fallbacks.
    struct ListOnly {
        models: Vec<String>,
    }

    #[async_trait]
    impl Provider for ListOnly {
        fn name(&self) -> &str {
            "list-only"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("no completions here".into()))
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(self.models.clone())
        }
    }

    struct ListFails;

    #[async_trait]
    impl Provider for ListFails {
        fn name(&self) -> &str {
            "list-fails"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("down".into()))
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Err(ProviderError::ApiError {
                status_code: 503,
                message: "maintenance".into(),
            })
        }
    }

    async fn get(uri: &str, provider: Arc<dyn Provider>) -> (StatusCode, serde_json::Value) {
        let app = build_router(state_with(provider, Some("fw-key")));
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post(
        uri: &str,
        body: &str,
        provider: Arc<dyn Provider>,
    ) -> (StatusCode, serde_json::Value) {
        let app = build_router(state_with(provider, Some("fw-key")));
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn options_returns_full_catalog() {
        let (status, json) = get("/api/options", Arc::new(ListOnly { models: vec![] })).await;
        assert_eq!(status, StatusCode::OK);

        let personas = json["personas"].as_array().unwrap();
        let tasks = json["tasks"].as_array().unwrap();
        assert_eq!(personas.len(), 5);
        assert_eq!(tasks.len(), 5);
        assert!(personas
            .iter()
            .any(|p| p["term"] == "PragmaticEngineerPersona"));
        assert!(tasks
            .iter()
            .any(|t| t["term"] == "TechnicalDocumentationTask"));
        assert_eq!(personas[0]["component_type"], "Persona");
    }

    #[tokio::test]
    async fn models_lists_provider_ids() {
        let provider = Arc::new(ListOnly {
            models: vec!["llama-8b-instruct".into(), "llama-70b-instruct".into()],
        });
        let (status, json) = get("/api/models", provider).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["models"],
            serde_json::json!(["llama-8b-instruct", "llama-70b-instruct"])
        );
    }

    #[tokio::test]
    async fn models_failure_is_bad_gateway() {
        let (status, json) = get("/api/models", Arc::new(ListFails)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "Failed to fetch models from the provider.");
        assert!(json["details"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn suggest_topics_serves_fallback_when_upstream_is_broken() {
        let (status, json) = post("/api/suggest-topics", "{}", Arc::new(ListFails)).await;
        assert_eq!(status, StatusCode::OK);

        let topics = json["topics"].as_array().unwrap();
        assert_eq!(topics.len(), 8);
        assert_eq!(topics[0], "Sustainable fashion and eco-friendly textiles");
    }

    #[tokio::test]
    async fn suggest_goals_requires_topic() {
        let (status, json) = post("/api/suggest-goals", "{}", Arc::new(ListFails)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "A valid \"topic\" is required.");

        let (status, _) = post(
            "/api/suggest-goals",
            r#"{"topic":"   "}"#,
            Arc::new(ListFails),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn suggest_goals_interpolates_topic_in_fallback() {
        let (status, json) = post(
            "/api/suggest-goals",
            r#"{"topic":"vertical farming"}"#,
            Arc::new(ListFails),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let goals = json["goals"].as_array().unwrap();
        assert_eq!(goals.len(), 8);
        assert!(goals[0].as_str().unwrap().contains("vertical farming"));
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (status, json) = post(
            "/api/search",
            "{}",
            Arc::new(ListOnly { models: vec![] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Query is required.");

        let (status, _) = post(
            "/api/search",
            r#"{"query":"  "}"#,
            Arc::new(ListOnly { models: vec![] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
