//! Configuration for the Turing daemon
//!
//! Stored in ~/.config/turing/config.toml. Environment variables override file
//! values so a `.env` next to the daemon is enough for local experiments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;

const CONFIG_DIR: &str = "turing";
const CONFIG_FILE: &str = "config.toml";
const DATA_DIR: &str = "turing";

/// Active model settings. Read once when the generation client is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub active_llm: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Where the Ollama-compatible service listens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Ollama `/api/embed` with a sentence-embedding model
    #[default]
    Ollama,
    /// Local feature hashing; offline, matches shared words only
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Vector size for the hashing embedder
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Directory holding the memory database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Settings for the filesystem injection strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_true")]
    pub file_injection: bool,
    /// Root for filesystem skill paths (home directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Sub-directories recognised by name in user messages
    #[serde(default = "default_known_folders")]
    pub known_folders: Vec<String>,
}

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuringConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

fn default_model() -> String {
    "qwen2.5:1.5b".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR)
}

fn default_retrieval_limit() -> usize {
    crate::ports::DEFAULT_RETRIEVAL_LIMIT
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

fn default_true() -> bool {
    true
}

fn default_known_folders() -> Vec<String> {
    vec!["turing-os".to_string()]
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            active_llm: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            retrieval_limit: default_retrieval_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            file_injection: true,
            base_dir: None,
            known_folders: default_known_folders(),
        }
    }
}

impl TuringConfig {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, DomainError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR))
            .ok_or_else(|| {
                DomainError::Configuration("could not determine config directory".to_string())
            })
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, DomainError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load from `path` (or the default location), apply env overrides, validate.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = Self::read_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without env overrides or validation
    pub fn read_file(path: &Path) -> Result<Self, DomainError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            DomainError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config to file
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, DomainError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                DomainError::Configuration(format!(
                    "failed to create config directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| DomainError::Configuration(format!("failed to serialize config: {}", e)))?;

        fs::write(&path, content).map_err(|e| {
            DomainError::Configuration(format!("failed to write {}: {}", path.display(), e))
        })?;

        Ok(path)
    }

    /// Apply `TURING_*` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("TURING_MODEL") {
            self.model.active_llm = model;
        }
        if let Some(raw) = lookup("TURING_TEMPERATURE") {
            self.model.temperature = raw.parse().map_err(|_| {
                DomainError::Configuration(format!("TURING_TEMPERATURE is not a number: {}", raw))
            })?;
        }
        if let Some(url) = lookup("TURING_OLLAMA_URL") {
            self.service.base_url = url;
        }
        if let Some(dir) = lookup("TURING_DATA_DIR") {
            self.memory.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = lookup("TURING_BIND") {
            self.server.bind = bind;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.active_llm.trim().is_empty() {
            return Err(DomainError::Configuration(
                "model.active_llm must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(DomainError::Configuration(format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                self.model.temperature
            )));
        }
        if !self.service.base_url.starts_with("http://")
            && !self.service.base_url.starts_with("https://")
        {
            return Err(DomainError::Configuration(format!(
                "service.base_url must be an http(s) URL, got '{}'",
                self.service.base_url
            )));
        }
        if self.memory.retrieval_limit == 0 {
            return Err(DomainError::Configuration(
                "memory.retrieval_limit must be at least 1".to_string(),
            ));
        }
        match self.embedding.provider {
            EmbeddingProvider::Hashing if self.embedding.dimensions == 0 => {
                return Err(DomainError::Configuration(
                    "embedding.dimensions must be at least 1".to_string(),
                ));
            }
            EmbeddingProvider::Ollama if self.embedding.model.trim().is_empty() => {
                return Err(DomainError::Configuration(
                    "embedding.model must not be empty".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    /// Path of the SQLite memory database
    pub fn memory_db_path(&self) -> PathBuf {
        self.memory.data_dir.join("memory.sqlite3")
    }

    /// Root for filesystem skill paths
    pub fn file_base_dir(&self) -> PathBuf {
        self.routing
            .base_dir
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TuringConfig::read_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.model.active_llm, "qwen2.5:1.5b");
        assert!((config.model.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.memory.retrieval_limit, 5);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Ollama);
        assert_eq!(config.embedding.model, "nomic-embed-text");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[model]\nactive_llm = \"mistral\"\n").unwrap();

        let config = TuringConfig::read_file(&path).unwrap();
        assert_eq!(config.model.active_llm, "mistral");
        assert!((config.model.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.service.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[model\nactive_llm = ").unwrap();

        let err = TuringConfig::read_file(&path).unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[test]
    fn test_save_then_load_keeps_model_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TuringConfig::default();
        config.model.active_llm = "llama3.2".to_string();
        config.model.temperature = 0.9;
        config.save(Some(&path)).unwrap();

        let loaded = TuringConfig::read_file(&path).unwrap();
        assert_eq!(loaded.model.active_llm, "llama3.2");
        assert!((loaded.model.temperature - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TURING_MODEL", "phi3"),
            ("TURING_TEMPERATURE", "1.1"),
            ("TURING_DATA_DIR", "/tmp/turing-test"),
        ]
        .into_iter()
        .collect();

        let mut config = TuringConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.active_llm, "phi3");
        assert!((config.model.temperature - 1.1).abs() < 1e-6);
        assert_eq!(
            config.memory_db_path(),
            PathBuf::from("/tmp/turing-test/memory.sqlite3")
        );
    }

    #[test]
    fn test_bad_temperature_env() {
        let mut config = TuringConfig::default();
        let err = config
            .apply_env(|key| (key == "TURING_TEMPERATURE").then(|| "warm".to_string()))
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = TuringConfig::default();
        assert!(config.validate().is_ok());

        config.model.temperature = 3.5;
        assert!(config.validate().is_err());

        config.model.temperature = 0.5;
        config.model.active_llm = "  ".to_string();
        assert!(config.validate().is_err());

        config.model.active_llm = "qwen2.5:1.5b".to_string();
        config.service.base_url = "localhost:11434".to_string();
        assert!(config.validate().is_err());

        config.service.base_url = "http://localhost:11434".to_string();
        config.memory.retrieval_limit = 0;
        assert!(config.validate().is_err());

        config.memory.retrieval_limit = 5;
        config.embedding.model = String::new();
        assert!(config.validate().is_err());

        config.embedding.provider = EmbeddingProvider::Hashing;
        assert!(config.validate().is_ok());
        config.embedding.dimensions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hashing_provider_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[embedding]\nprovider = \"hashing\"\ndimensions = 128\n").unwrap();

        let config = TuringConfig::read_file(&path).unwrap();
        assert_eq!(config.embedding.provider, EmbeddingProvider::Hashing);
        assert_eq!(config.embedding.dimensions, 128);
    }
}
