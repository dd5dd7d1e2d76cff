//! Productivity configuration types and loading

use eyre::{Context, Result};
use kvstore::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat endpoint configuration
    pub llm: LlmConfig,

    /// Key-value backend holding the tasks and stats documents
    pub storage: StoreConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before talking to the chat endpoint
    ///
    /// Call this early in startup to fail fast with a clear error message.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key().is_none() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .productivity.yml
        let local_config = PathBuf::from(".productivity.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/productivity/productivity.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("productivity").join("productivity.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are ignored here; the full `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Chat endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL; requests go to `{base-url}/v1/messages`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per reply
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds (none by default)
    #[serde(rename = "timeout-ms", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 1000,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore::BackendKind;
    use serial_test::serial;

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url, "https://api.anthropic.com");
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  timeout-ms: 60000

storage:
  kind: sqlite
  path: /var/lib/productivity/state.db

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.timeout_ms, Some(60000));
        assert_eq!(config.storage.kind, BackendKind::Sqlite);
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/productivity/state.db"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: claude-haiku
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.llm.base_url, "https://api.anthropic.com");
        assert_eq!(config.storage.kind, BackendKind::File);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pb.yml");
        fs::write(&path, "llm:\n  max-tokens: 42\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.max_tokens, 42);
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pb.yml");
        fs::write(&path, "llm:\n  max-tokens: lots\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
        assert_eq!(Config::load_log_level(Some(&path)), None);
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        let config = LlmConfig {
            api_key_env: "PB_TEST_API_KEY".to_string(),
            ..Default::default()
        };

        unsafe { std::env::remove_var("PB_TEST_API_KEY") };
        assert_eq!(config.api_key(), None);

        unsafe { std::env::set_var("PB_TEST_API_KEY", "   ") };
        assert_eq!(config.api_key(), None);

        unsafe { std::env::set_var("PB_TEST_API_KEY", "sk-test") };
        assert_eq!(config.api_key().as_deref(), Some("sk-test"));

        unsafe { std::env::remove_var("PB_TEST_API_KEY") };
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "PB_TEST_VALIDATE_KEY".to_string();

        unsafe { std::env::remove_var("PB_TEST_VALIDATE_KEY") };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PB_TEST_VALIDATE_KEY"));

        unsafe { std::env::set_var("PB_TEST_VALIDATE_KEY", "sk-test") };
        assert!(config.validate().is_ok());

        unsafe { std::env::remove_var("PB_TEST_VALIDATE_KEY") };
    }
}
