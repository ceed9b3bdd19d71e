//! Per-run credentials for the capability providers

use std::fmt;

use tracing::debug;

use crate::config::Config;

/// API keys for the generation and search providers
///
/// Supplied explicitly to each pipeline run; nothing in the crate stores
/// them globally. `Debug` output is redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PipelineCredentials {
    pub generation_api_key: Option<String>,
    pub search_api_key: Option<String>,
}

impl PipelineCredentials {
    pub fn new(generation_api_key: impl Into<String>, search_api_key: impl Into<String>) -> Self {
        Self {
            generation_api_key: Some(generation_api_key.into()),
            search_api_key: Some(search_api_key.into()),
        }
    }

    /// Read both keys from the environment variables named in the config
    ///
    /// Missing variables yield `None`; the orchestrator reports them as a
    /// precondition failure.
    pub fn from_env(config: &Config) -> Self {
        debug!(
            generation_env = %config.llm.api_key_env,
            search_env = %config.search.api_key_env,
            "PipelineCredentials::from_env: called"
        );
        Self {
            generation_api_key: std::env::var(&config.llm.api_key_env).ok(),
            search_api_key: std::env::var(&config.search.api_key_env).ok(),
        }
    }

    /// Generation key if present and non-blank
    pub fn generation_key(&self) -> Option<&str> {
        self.generation_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Search key if present and non-blank
    pub fn search_key(&self) -> Option<&str> {
        self.search_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl fmt::Debug for PipelineCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: Option<&str>) -> &'static str {
            if key.is_some() { "<set>" } else { "<missing>" }
        }
        f.debug_struct("PipelineCredentials")
            .field("generation_api_key", &redact(self.generation_key()))
            .field("search_api_key", &redact(self.search_key()))
            .finish()
    }
}
