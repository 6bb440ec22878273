//! Configuration for capture and retrieval

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default retrieval budget in estimated cost units
pub const DEFAULT_BUDGET: usize = 2000;

const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Which index backend organizes the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Events filed under each affected path
    #[default]
    FileIndex,
    /// Events grouped per session, walked most recent first
    SessionChain,
    /// Only decisions, rejections and tradeoffs
    DecisionSet,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::FileIndex,
        BackendKind::SessionChain,
        BackendKind::DecisionSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::FileIndex => "file_index",
            BackendKind::SessionChain => "session_chain",
            BackendKind::DecisionSet => "decision_set",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "file_index" | "file" => Ok(BackendKind::FileIndex),
            "session_chain" | "session" => Ok(BackendKind::SessionChain),
            "decision_set" | "decision" => Ok(BackendKind::DecisionSet),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// External summarization service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Environment variable holding the credential
    pub api_key_env: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl SummarizerConfig {
    pub fn new() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Credential from the environment; empty values count as absent
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture and retrieval configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Active index backend
    pub backend: BackendKind,

    /// Retrieval budget in estimated cost units
    pub budget: usize,

    /// External summarizer (used only when a credential is present)
    pub summarizer: SummarizerConfig,
}

/// On-disk shape; the backend stays a string so bad selectors are reported
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summarizer: Option<SummarizerConfig>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            backend: BackendKind::default(),
            budget: DEFAULT_BUDGET,
            summarizer: SummarizerConfig::new(),
        }
    }

    /// Parse config JSON; unknown backends are rejected
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(content).map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Config::new();
        if let Some(backend) = file.backend {
            config.backend = backend.parse()?;
        }
        if let Some(budget) = file.budget {
            config.budget = budget;
        }
        if let Some(summarizer) = file.summarizer {
            config.summarizer = summarizer;
        }
        Ok(config)
    }

    /// Load from a file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::new());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, path)
    }

    pub fn to_json(&self) -> String {
        let file = ConfigFile {
            backend: Some(self.backend.as_str().to_string()),
            budget: Some(self.budget),
            summarizer: Some(self.summarizer.clone()),
        };
        serde_json::to_string_pretty(&file).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.backend, BackendKind::FileIndex);
        assert_eq!(config.budget, 2000);
        assert_eq!(config.summarizer.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_backend_from_str_aliases() {
        assert_eq!(
            "session-chain".parse::<BackendKind>().unwrap(),
            BackendKind::SessionChain
        );
        assert_eq!(
            "decision".parse::<BackendKind>().unwrap(),
            BackendKind::DecisionSet
        );
        assert_eq!("FILE".parse::<BackendKind>().unwrap(), BackendKind::FileIndex);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = "vector_db".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(ref s) if s == "vector_db"));

        let json = r#"{"backend": "graphdb"}"#;
        let result = Config::from_json(json, Path::new("cairn.json"));
        assert!(matches!(result, Err(ConfigError::UnknownBackend(_))));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{"backend": "decision_set"}"#;
        let config = Config::from_json(json, Path::new("cairn.json")).unwrap();
        assert_eq!(config.backend, BackendKind::DecisionSet);
        assert_eq!(config.budget, DEFAULT_BUDGET);
        assert_eq!(config.summarizer, SummarizerConfig::new());
    }

    #[test]
    fn test_malformed_config_is_error() {
        let result = Config::from_json("{not json", Path::new("cairn.json"));
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("cairn.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_to_json_roundtrip() {
        let mut config = Config::new();
        config.backend = BackendKind::SessionChain;
        config.budget = 500;
        let json = config.to_json();
        let parsed = Config::from_json(&json, Path::new("cairn.json")).unwrap();
        assert_eq!(parsed, config);
    }
}
