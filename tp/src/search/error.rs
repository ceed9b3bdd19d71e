//! Search adapter error types

use thiserror::Error;

/// Errors that can occur during a search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{provider} API error {status}: {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Search request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Failed to parse search response: {0}")]
    InvalidResponse(String),
}

/// Drops the request URL, which carries the SerpAPI key as a query parameter
impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_network_error_drops_url() {
        let key = "serp-secret-0042";
        let err = reqwest::Client::new()
            .get(format!("http://127.0.0.1:1/search?q=kyoto&api_key={}", key))
            .send()
            .await
            .unwrap_err();
        let err = SearchError::from(err);

        assert!(matches!(err, SearchError::Network(_)));
        assert!(!err.to_string().contains(key));
        assert!(!format!("{:?}", err).contains(key));
    }
}
