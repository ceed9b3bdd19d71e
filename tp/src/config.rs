//! travelplanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::MAX_SOURCES;
use crate::search::SearchProvider;

/// Main travelplanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation provider configuration
    pub llm: LlmConfig,

    /// Web search provider configuration
    pub search: SearchConfig,

    /// Research stage limits
    pub research: ResearchConfig,

    /// Prompt template configuration
    pub prompts: PromptsConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .travelplanner.yml
        let local_config = PathBuf::from(".travelplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/travelplanner/travelplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("travelplanner").join("travelplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed here; the full `load` reports them once logging
    /// is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => {
                let local = PathBuf::from(".travelplanner.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("travelplanner").join("travelplanner.yml")
                }
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Faster model used for query derivation and ranking
    #[serde(rename = "research-model")]
    pub research_model: String,

    /// Higher-reasoning model used to write the itinerary
    #[serde(rename = "planning-model")]
    pub planning_model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            research_model: "gpt-4o".to_string(),
            planning_model: "o3-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 16384,
            timeout_ms: 300_000,
        }
    }
}

/// Web search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider (serpapi, tavily, brave)
    pub provider: SearchProvider,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Raw results requested from the provider before ranking
    #[serde(rename = "max-results")]
    pub max_results: usize,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::SerpApi,
            api_key_env: "SERPAPI_API_KEY".to_string(),
            max_results: 20,
            timeout_ms: 30_000,
        }
    }
}

/// Research stage limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Sources kept after ranking (clamped to 10)
    #[serde(rename = "max-sources")]
    pub max_sources: usize,
}

impl ResearchConfig {
    /// Configured source limit, never above the hard cap and never zero
    pub fn source_limit(&self) -> usize {
        self.max_sources.clamp(1, MAX_SOURCES)
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_sources: MAX_SOURCES,
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory checked first for `{name}.pmt` overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.research_model, "gpt-4o");
        assert_eq!(config.llm.planning_model, "o3-mini");
        assert_eq!(config.search.provider, SearchProvider::SerpApi);
        assert_eq!(config.research.source_limit(), 10);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: openai
  research-model: gpt-4o-mini
  planning-model: o3
  api-key-env: MY_OPENAI_KEY
  base-url: https://llm.example.com
  max-tokens: 8192
  timeout-ms: 60000

search:
  provider: tavily
  api-key-env: MY_TAVILY_KEY
  max-results: 15

research:
  max-sources: 5

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.research_model, "gpt-4o-mini");
        assert_eq!(config.llm.planning_model, "o3");
        assert_eq!(config.llm.api_key_env, "MY_OPENAI_KEY");
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.search.provider, SearchProvider::Tavily);
        assert_eq!(config.search.max_results, 15);
        assert_eq!(config.research.source_limit(), 5);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  planning-model: o1
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.planning_model, "o1");

        // Defaults for unspecified
        assert_eq!(config.llm.research_model, "gpt-4o");
        assert_eq!(config.search.api_key_env, "SERPAPI_API_KEY");
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_source_limit_is_clamped() {
        let research = ResearchConfig { max_sources: 50 };
        assert_eq!(research.source_limit(), 10);
        let research = ResearchConfig { max_sources: 0 };
        assert_eq!(research.source_limit(), 1);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tp.yml");
        std::fs::write(&path, "search:\n  provider: brave\nlog-level: warn\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.search.provider, SearchProvider::Brave);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let path = PathBuf::from("/nonexistent/travelplanner.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
