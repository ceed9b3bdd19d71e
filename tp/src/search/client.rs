//! SearchClient trait definition

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SearchError;

/// One raw web result, in provider order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Web search capability
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one query; an empty vector means the provider found nothing
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use tracing::debug;

    /// Mock search client returning a fixed result set (or a failure)
    pub struct MockSearchClient {
        hits: Option<Vec<SearchHit>>,
        queries: Mutex<Vec<String>>,
    }

    impl MockSearchClient {
        pub fn new(hits: Vec<SearchHit>) -> Self {
            debug!(hit_count = hits.len(), "MockSearchClient::new: called");
            Self {
                hits: Some(hits),
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Client whose every call fails with a 401
        pub fn failing() -> Self {
            Self {
                hits: None,
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Queries received so far
        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchClient for MockSearchClient {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
            debug!(%query, "MockSearchClient::search: called");
            self.queries.lock().unwrap().push(query.to_string());
            self.hits.clone().ok_or(SearchError::ApiError {
                provider: "mock",
                status: 401,
                message: "invalid key".to_string(),
            })
        }
    }
}
