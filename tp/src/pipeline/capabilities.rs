//! Capability adapter construction
//!
//! The orchestrator never holds API keys between runs. It asks a
//! [`Capabilities`] implementation for fresh adapters bound to the keys of
//! the run being started.

use std::sync::Arc;

use tracing::debug;

use crate::config::{Config, LlmConfig, SearchConfig};
use crate::llm::{self, LlmClient, LlmError};
use crate::search::{self, SearchClient, SearchError};

/// Builds generation and search adapters for one run
pub trait Capabilities: Send + Sync {
    fn generation(&self, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError>;

    fn search(&self, api_key: &str) -> Result<Arc<dyn SearchClient>, SearchError>;
}

/// HTTP adapters from configuration
#[derive(Debug, Clone)]
pub struct HttpCapabilities {
    llm: LlmConfig,
    search: SearchConfig,
}

impl HttpCapabilities {
    pub fn from_config(config: &Config) -> Self {
        debug!(provider = %config.llm.provider, search = %config.search.provider, "HttpCapabilities::from_config: called");
        Self {
            llm: config.llm.clone(),
            search: config.search.clone(),
        }
    }
}

impl Capabilities for HttpCapabilities {
    fn generation(&self, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
        llm::create_client(&self.llm, api_key)
    }

    fn search(&self, api_key: &str) -> Result<Arc<dyn SearchClient>, SearchError> {
        search::create_client(&self.search, api_key)
    }
}
