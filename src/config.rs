use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Remote evaluator and script store
    #[serde(default)]
    pub server: ServerConfig,

    /// Request timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// What to do when a request fails (timeout, connection error or non-200 status)
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Server endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServerConfig {
    /// Base URL of the playground server (e.g., "http://localhost:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the evaluation endpoint
    #[serde(default = "default_execute_path")]
    pub execute_path: String,

    /// Path of the multiplexed file-management endpoint
    #[serde(default = "default_files_path")]
    pub files_path: String,

    /// Path of the example-fetch endpoint
    #[serde(default = "default_examples_path")]
    pub examples_path: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_execute_path() -> String {
    "/execute/".to_string()
}

fn default_files_path() -> String {
    "/files/".to_string()
}

fn default_examples_path() -> String {
    "/example/".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            execute_path: default_execute_path(),
            files_path: default_files_path(),
            examples_path: default_examples_path(),
        }
    }
}

impl ServerConfig {
    /// Full URL of an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Request timeouts in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeoutConfig {
    /// Timeout for evaluation requests. These fire in quick succession, so keep it short.
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_ms: u64,

    /// Timeout for file-management and example requests
    #[serde(default = "default_file_timeout")]
    pub file_ms: u64,
}

fn default_evaluation_timeout() -> u64 {
    3000
}

fn default_file_timeout() -> u64 {
    10000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            evaluation_ms: default_evaluation_timeout(),
            file_ms: default_file_timeout(),
        }
    }
}

impl TimeoutConfig {
    pub fn evaluation(&self) -> Duration {
        Duration::from_millis(self.evaluation_ms)
    }

    pub fn file(&self) -> Duration {
        Duration::from_millis(self.file_ms)
    }
}

/// Recovery strategy for failed requests. Failed requests are never retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Reload the whole session
    #[default]
    Reload,
    /// Show the network-error overlay and skip the request's handler
    ErrorOverlay,
    /// Reload on a non-success status, show the network-error overlay on transport failure
    Split,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timeouts: TimeoutConfig::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("control-session").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults if not found
    pub fn load_or_default() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                match Self::load_from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}, using defaults",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.evaluation_ms == 0 || self.timeouts.file_ms == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        let base = &self.server.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got '{}'",
                base
            )));
        }

        for (field, path) in [
            ("execute_path", &self.server.execute_path),
            ("files_path", &self.server.files_path),
            ("examples_path", &self.server.examples_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{} must start with '/', got '{}'",
                    field, path
                )));
            }
        }

        Ok(())
    }

    /// JSON Schema of the config file
    pub fn json_schema() -> String {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
