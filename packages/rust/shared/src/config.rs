//! Application configuration for domainqa.
//!
//! User config lives at `~/.domainqa/domainqa.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DomainQaError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "domainqa.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".domainqa";

// ---------------------------------------------------------------------------
// Config structs (matching domainqa.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Which adapters are registered and how their knowledge is checked.
    #[serde(default)]
    pub adapters: AdaptersConfig,

    /// Engine-level answer checks applied after adapter postprocessing.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Domain used when neither a tag nor detection selects an adapter.
    #[serde(default = "default_domain")]
    pub default_domain: String,

    /// Maximum questions answered concurrently in batch mode.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

fn default_domain() -> String {
    "general".into()
}
fn default_batch_concurrency() -> u32 {
    3
}

/// `[adapters]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptersConfig {
    /// Adapter names to register, in priority order.
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,

    /// Reject terminology maps whose keys overlap.
    #[serde(default)]
    pub strict_terminology: bool,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            strict_terminology: false,
        }
    }
}

fn default_enabled() -> Vec<String> {
    vec!["medical".into(), "general".into()]
}

/// `[engine]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Penalize answers that cite no sources.
    #[serde(default = "default_true")]
    pub enable_source_citation: bool,

    /// Answers shorter than this (trimmed, in chars) are penalized.
    #[serde(default = "default_min_answer_chars")]
    pub min_answer_chars: usize,

    #[serde(default = "default_short_answer_penalty")]
    pub short_answer_penalty: f64,

    #[serde(default = "default_uncertainty_penalty")]
    pub uncertainty_penalty: f64,

    #[serde(default = "default_missing_source_penalty")]
    pub missing_source_penalty: f64,

    /// Phrases signalling the model was unsure (case-insensitive).
    #[serde(default = "default_uncertain_phrases")]
    pub uncertain_phrases: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_source_citation: true,
            min_answer_chars: default_min_answer_chars(),
            short_answer_penalty: default_short_answer_penalty(),
            uncertainty_penalty: default_uncertainty_penalty(),
            missing_source_penalty: default_missing_source_penalty(),
            uncertain_phrases: default_uncertain_phrases(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_min_answer_chars() -> usize {
    10
}
fn default_short_answer_penalty() -> f64 {
    0.5
}
fn default_uncertainty_penalty() -> f64 {
    0.7
}
fn default_missing_source_penalty() -> f64 {
    0.8
}
fn default_uncertain_phrases() -> Vec<String> {
    ["i don't know", "not sure", "cannot determine", "sorry"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fallback domain name.
    pub default_domain: String,
    /// Maximum concurrent requests in batch mode.
    pub batch_concurrency: u32,
    /// Engine-level answer checks.
    pub engine: EngineConfig,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_domain: config.defaults.default_domain.clone(),
            batch_concurrency: config.defaults.batch_concurrency,
            engine: config.engine.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.domainqa/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DomainQaError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.domainqa/domainqa.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DomainQaError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DomainQaError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Check value ranges that serde cannot express.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.defaults.batch_concurrency == 0 {
        return Err(DomainQaError::config("defaults.batch_concurrency must be at least 1"));
    }
    if config.adapters.enabled.is_empty() {
        return Err(DomainQaError::config("adapters.enabled must name at least one adapter"));
    }

    let penalties = [
        ("short_answer_penalty", config.engine.short_answer_penalty),
        ("uncertainty_penalty", config.engine.uncertainty_penalty),
        ("missing_source_penalty", config.engine.missing_source_penalty),
    ];
    for (name, value) in penalties {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainQaError::config(format!(
                "engine.{name} must be within [0, 1], got {value}"
            )));
        }
    }

    Ok(())
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DomainQaError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DomainQaError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DomainQaError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("default_domain"));
        assert!(toml_str.contains("strict_terminology"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.batch_concurrency, 3);
        assert_eq!(parsed.adapters.enabled, vec!["medical", "general"]);
        assert_eq!(parsed.engine.min_answer_chars, 10);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[adapters]
strict_terminology = true

[engine]
enable_source_citation = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.adapters.strict_terminology);
        assert_eq!(config.adapters.enabled.len(), 2);
        assert!(!config.engine.enable_source_citation);
        assert_eq!(config.engine.uncertainty_penalty, 0.7);
        assert_eq!(config.defaults.default_domain, "general");
    }

    #[test]
    fn pipeline_config_from_app_config() {
        let app = AppConfig::default();
        let pipeline = PipelineConfig::from(&app);
        assert_eq!(pipeline.default_domain, "general");
        assert_eq!(pipeline.batch_concurrency, 3);
        assert_eq!(pipeline.engine.missing_source_penalty, 0.8);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.defaults.batch_concurrency = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.engine.uncertainty_penalty = 1.5;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("uncertainty_penalty"));

        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/domainqa.toml")).unwrap_err();
        assert!(matches!(err, DomainQaError::Io { .. }));
    }
}
