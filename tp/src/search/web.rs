//! HTTP web search client for SerpAPI, Tavily and Brave

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{SearchClient, SearchError, SearchHit};
use crate::config::SearchConfig;

/// Maximum snippet length kept from a provider result
const MAX_SNIPPET_CHARS: usize = 300;

/// Supported search providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    #[serde(rename = "serpapi")]
    SerpApi,
    Tavily,
    Brave,
}

impl SearchProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerpApi => "SerpAPI",
            Self::Tavily => "Tavily",
            Self::Brave => "Brave",
        }
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Search client bound to one provider and one run's API key
pub struct WebSearchClient {
    provider: SearchProvider,
    api_key: String,
    max_results: usize,
    http: Client,
}

impl WebSearchClient {
    pub fn new(config: &SearchConfig, api_key: &str) -> Result<Self, SearchError> {
        debug!(provider = %config.provider, max_results = config.max_results, "WebSearchClient::new: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            provider: config.provider,
            api_key: api_key.to_string(),
            max_results: config.max_results,
            http,
        })
    }

    /// Search using SerpAPI (Google engine)
    async fn search_serpapi(&self, query: &str) -> Result<Value, SearchError> {
        debug!(%query, "WebSearchClient::search_serpapi: called");
        let response = self
            .http
            .get("https://serpapi.com/search")
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", &self.max_results.to_string()),
                ("engine", "google"),
            ])
            .send()
            .await?;

        self.read_json(response).await
    }

    /// Search using Tavily API
    async fn search_tavily(&self, query: &str) -> Result<Value, SearchError> {
        debug!(%query, "WebSearchClient::search_tavily: called");
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
            "search_depth": "basic"
        });

        let response = self.http.post("https://api.tavily.com/search").json(&body).send().await?;

        self.read_json(response).await
    }

    /// Search using Brave Search API
    async fn search_brave(&self, query: &str) -> Result<Value, SearchError> {
        debug!(%query, "WebSearchClient::search_brave: called");
        let response = self
            .http
            .get("https://api.search.brave.com/res/v1/web/search")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", &self.max_results.to_string())])
            .send()
            .await?;

        self.read_json(response).await
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, SearchError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "WebSearchClient::read_json: API error");
            return Err(SearchError::ApiError {
                provider: self.provider.name(),
                status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.without_url().to_string()))
    }
}

#[async_trait]
impl SearchClient for WebSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        debug!(provider = %self.provider, %query, "WebSearchClient::search: called");
        let raw = match self.provider {
            SearchProvider::SerpApi => self.search_serpapi(query).await?,
            SearchProvider::Tavily => self.search_tavily(query).await?,
            SearchProvider::Brave => self.search_brave(query).await?,
        };

        let mut hits = parse_hits(self.provider, &raw);
        hits.truncate(self.max_results);
        info!(provider = %self.provider, hits = hits.len(), "search complete");
        Ok(hits)
    }
}

/// Extract hits from a provider response; missing result arrays mean no hits
pub fn parse_hits(provider: SearchProvider, raw: &Value) -> Vec<SearchHit> {
    debug!(%provider, "parse_hits: called");
    let (results, url_key, snippet_key) = match provider {
        SearchProvider::SerpApi => (&raw["organic_results"], "link", "snippet"),
        SearchProvider::Tavily => (&raw["results"], "url", "content"),
        SearchProvider::Brave => (&raw["web"]["results"], "url", "description"),
    };

    let Some(results) = results.as_array() else {
        debug!("parse_hits: no result array");
        return Vec::new();
    };

    results
        .iter()
        .map(|r| {
            SearchHit::new(
                r["title"].as_str().unwrap_or("(no title)"),
                r[url_key].as_str().unwrap_or(""),
                truncate(r[snippet_key].as_str().unwrap_or(""), MAX_SNIPPET_CHARS),
            )
        })
        .collect()
}

/// Truncate string to max length in characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
