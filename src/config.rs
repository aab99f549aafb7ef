//! Configuration loading and management.
//!
//! Loads configuration from `./tasklens.toml` (or `$TASKLENS_CONFIG_PATH`).
//! Environment variables override file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
///
/// Path: `./tasklens.toml` or `$TASKLENS_CONFIG_PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TasklensConfig {
    /// Core settings.
    pub core: CoreConfig,
    /// Filesystem paths for persistent state.
    pub paths: PathsConfig,
    /// Generation service configuration.
    pub llm: LlmConfig,
}

impl TasklensConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// If the file does not exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: TasklensConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(TasklensConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("TASKLENS_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("tasklens.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("TASKLENS_LOG_LEVEL") {
            self.core.log_level = v;
        }
        if let Some(v) = env("TASKLENS_OWNER_ID") {
            self.core.owner_id = v;
        }

        if let Some(v) = env("TASKLENS_DB_PATH") {
            self.paths.db_path = v;
        }
        if let Some(v) = env("TASKLENS_LOGS_DIR") {
            self.paths.logs_dir = v;
        }

        if let Some(v) = env("TASKLENS_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = env("TASKLENS_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env("TASKLENS_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = env("TASKLENS_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.llm.timeout_seconds = n,
                Err(_) => tracing::warn!(
                    var = "TASKLENS_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Parse a TOML string into config (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error when the TOML does not parse.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: TasklensConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Core config ─────────────────────────────────────────────────

/// Core settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Tracing log level filter.
    pub log_level: String,
    /// Default owner identity for CLI operations.
    pub owner_id: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            owner_id: "local".to_string(),
        }
    }
}

// ── Paths config ────────────────────────────────────────────────

/// Filesystem paths for persistent state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Task SQLite database path.
    pub db_path: String,
    /// Directory for rotated JSON log files.
    pub logs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            db_path: "tasklens.db".to_string(),
            logs_dir: "logs".to_string(),
        }
    }
}

// ── LLM config ──────────────────────────────────────────────────

/// Generation service configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL.
    pub base_url: String,
    /// API key. Missing at call time is a configuration error, reported
    /// opaquely to callers and in full only in server-side logs.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Request-level timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

// ── Tests ───────────────────────────────────────────────────────
