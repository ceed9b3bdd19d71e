//! Search capability adapter
//!
//! Wraps a web-search provider behind [`SearchClient::search`].

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod web;

pub use client::{SearchClient, SearchHit};
pub use error::SearchError;
pub use web::{SearchProvider, WebSearchClient, parse_hits};

use crate::config::SearchConfig;

/// Create a search client for the configured provider and one run's key
pub fn create_client(config: &SearchConfig, api_key: &str) -> Result<Arc<dyn SearchClient>, SearchError> {
    debug!(provider = %config.provider, "search::create_client: called");
    Ok(Arc::new(WebSearchClient::new(config, api_key)?))
}
