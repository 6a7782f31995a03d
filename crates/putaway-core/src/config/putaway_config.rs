use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_DB_DIR, DEFAULT_DB_FILE, DEFAULT_MAX_ALTERNATIVES,
    DEFAULT_VIRTUAL_PREFIXES,
};
use crate::errors::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PutawayConfig {
    pub location: LocationConfig,
    pub recommend: RecommendConfig,
    pub resilience: ResilienceConfig,
    pub storage: StorageConfig,
    pub explanation: ExplanationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Codes starting with any of these are virtual areas, never candidates.
    pub virtual_prefixes: Vec<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            virtual_prefixes: DEFAULT_VIRTUAL_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub max_alternatives: usize,
    pub enable_audit_log: bool,
    /// Recorded as the `user` of recommendation audit events.
    pub audit_user: String,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            enable_audit_log: true,
            audit_user: "system".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Total attempts per collaborator call, including the first.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub request_timeout_ms: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            backoff_multiplier: 2.0,
            request_timeout_ms: 30_000,
        }
    }
}

impl ResilienceConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub read_pool_size: usize,
    pub pattern_cache_capacity: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: Path::new(DEFAULT_DB_DIR).join(DEFAULT_DB_FILE),
            read_pool_size: 4,
            pattern_cache_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    /// Base URL of an Ollama server. `None` uses the template explainer only.
    pub ollama_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            ollama_url: None,
            model: "llama3.2".to_string(),
            temperature: 0.1,
            max_tokens: 1024,
            timeout_ms: 60_000,
        }
    }
}

impl ExplanationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PutawayConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else `<root>/putaway.toml` if it exists,
    /// else defaults. Environment overrides are applied last.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let mut config = match path {
            Some(path) => {
                let source = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_toml(&source)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PUTAWAY_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PUTAWAY_DB_PATH") {
            self.storage.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("PUTAWAY_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("PUTAWAY_MAX_RETRIES") {
            self.resilience.max_retries = parse_env("PUTAWAY_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("PUTAWAY_REQUEST_TIMEOUT_MS") {
            self.resilience.request_timeout_ms = parse_env("PUTAWAY_REQUEST_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("PUTAWAY_OLLAMA_URL") {
            self.explanation.ollama_url = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("PUTAWAY_OLLAMA_MODEL") {
            self.explanation.model = v;
        }
        if let Some(v) = lookup("PUTAWAY_ENABLE_AUDIT_LOG") {
            self.recommend.enable_audit_log = v.eq_ignore_ascii_case("true");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.location.virtual_prefixes.iter().any(|p| p.is_empty()) {
            return Err(invalid("location.virtual_prefixes", "prefixes must not be empty strings"));
        }
        if self.resilience.max_retries == 0 {
            return Err(invalid("resilience.max_retries", "must allow at least one attempt"));
        }
        let m = self.resilience.backoff_multiplier;
        if !m.is_finite() || m < 1.0 {
            return Err(invalid("resilience.backoff_multiplier", "must be a finite value >= 1.0"));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.explanation.temperature) {
            return Err(invalid("explanation.temperature", "must be within 0.0..=2.0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvVar {
        var: var.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = PutawayConfig::default();
        config.validate().unwrap();
        assert_eq!(config.location.virtual_prefixes, vec!["FLOOR", "REC", "ORD"]);
        assert_eq!(config.recommend.max_alternatives, 3);
        assert_eq!(config.resilience.max_retries, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PutawayConfig::from_toml(
            r#"
            [location]
            virtual_prefixes = ["FLOOR", "REC", "ORD", "QC"]

            [resilience]
            max_retries = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.location.virtual_prefixes.len(), 4);
        assert_eq!(config.resilience.max_retries, 5);
        assert_eq!(config.resilience.initial_backoff_ms, 1_000);
        assert_eq!(config.storage.read_pool_size, 4);
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let err = PutawayConfig::from_toml("[location]\nvirtual_prefixes = [\"\"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = PutawayConfig::from_toml("[resilience\nmax_retries = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PUTAWAY_MAX_RETRIES", "7"),
            ("PUTAWAY_OLLAMA_URL", "http://localhost:11434"),
            ("PUTAWAY_ENABLE_AUDIT_LOG", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = PutawayConfig::default();
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.resilience.max_retries, 7);
        assert_eq!(config.explanation.ollama_url.as_deref(), Some("http://localhost:11434"));
        assert!(!config.recommend.enable_audit_log);
    }

    #[test]
    fn test_env_override_parse_error() {
        let mut config = PutawayConfig::default();
        let err = config
            .apply_env_overrides(|k| (k == "PUTAWAY_MAX_RETRIES").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_load_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[recommend]\nmax_alternatives = 2\n",
        )
        .unwrap();
        let config = PutawayConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.recommend.max_alternatives, 2);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = PutawayConfig::load(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
