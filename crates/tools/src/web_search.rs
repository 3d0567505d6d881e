//! Web search tool — scrapes the DuckDuckGo HTML endpoint.
//!
//! DuckDuckGo's `html.duckduckgo.com/html/` endpoint serves plain server-side
//! rendered results, so no API key is needed. We pull title, link, and
//! snippet from each `div.result` block and keep the top five. The relay's
//! `/api/search` endpoint reuses [`search_duckduckgo`] directly.

use std::time::Duration;

use async_trait::async_trait;
use promptforge_core::catalog::Catalog;
use promptforge_core::record::SearchResult;
use promptforge_core::tool::AgentTool;
use scraper::{Html, Selector};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

const DUCKDUCKGO_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo blocks default HTTP-library user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

const RESULT_LIMIT: usize = 5;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Request timeout - please try again")]
    Timeout,

    #[error("Failed to fetch search results from DuckDuckGo. {0}")]
    Failed(String),
}

/// Build a client suitable for the DuckDuckGo endpoint.
pub fn search_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Run one search and return the top results.
pub async fn search_duckduckgo(
    client: &reqwest::Client,
    query: &str,
) -> Result<Vec<SearchResult>, SearchError> {
    let response = client
        .get(DUCKDUCKGO_URL)
        .query(&[("q", query)])
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Failed(e.to_string())
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Failed(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Failed(e.to_string()))?;

    let results = parse_results(&body);
    debug!(query, count = results.len(), "Search complete");
    Ok(results)
}

/// Extract results from the rendered page. Blocks missing a title or a
/// snippet are skipped.
fn parse_results(html: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let result_sel = Selector::parse("div.result").expect("valid selector");
    let title_sel = Selector::parse("h2.result__title a").expect("valid selector");
    let url_sel = Selector::parse("a.result__url").expect("valid selector");
    let snippet_sel = Selector::parse("a.result__snippet").expect("valid selector");

    let mut results = Vec::new();
    for block in document.select(&result_sel) {
        if results.len() >= RESULT_LIMIT {
            break;
        }

        let title = block
            .select(&title_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let link = block
            .select(&url_sel)
            .next()
            .and_then(|e| e.value().attr("href"))
            .unwrap_or_default()
            .to_string();
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        if !title.is_empty() && !snippet.is_empty() {
            results.push(SearchResult {
                title,
                link,
                snippet,
            });
        }
    }
    results
}

/// The `searchTheWeb` tool: first argument is the query.
pub struct SearchTheWeb {
    client: reqwest::Client,
}

impl SearchTheWeb {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: search_client(timeout),
        }
    }
}

#[async_trait]
impl AgentTool for SearchTheWeb {
    fn name(&self) -> &str {
        "searchTheWeb"
    }

    fn description(&self) -> &str {
        "Search the web for real-time context. Returns titles, links, and snippets."
    }

    async fn execute(&self, _catalog: &Catalog, args: &[String]) -> Value {
        let query = args.first().map(String::as_str).unwrap_or("");
        debug!(query, "Searching the web");

        match search_duckduckgo(&self.client, query).await {
            Ok(results) => json!(results),
            Err(e) => {
                warn!(query, error = %e, "Web search failed");
                Value::String(format!(
                    "Error: Failed to search the web for '{query}'. {e}"
                ))
            }
        }
    }
}
