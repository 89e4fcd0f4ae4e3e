//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.newsprobe.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".newsprobe.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// History persistence settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where and how the analysis history is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Directory holding the storage slots.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Slot key of the history collection.
    #[serde(default = "default_key")]
    pub key: String,

    /// Keep at most this many records, evicting the oldest.
    /// Unset means history grows without bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: default_key(),
            max_records: None,
        }
    }
}

impl HistoryConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

fn default_data_dir() -> String {
    ".newsprobe".to_string()
}

fn default_key() -> String {
    "analysis_history".to_string()
}

/// Which classifier implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Random stand-in with artificial latency.
    #[default]
    Random,
    /// HTTP inference endpoint.
    Remote,
}

/// Classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: ClassifierBackend,

    /// Artificial latency of the random backend, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Endpoint of the remote backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout of the remote backend, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Fixed seed for the random backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Random,
            delay_ms: default_delay_ms(),
            url: None,
            timeout_seconds: default_timeout(),
            seed: None,
        }
    }
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.newsprobe.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_dir) = args.data_dir {
            self.history.data_dir = data_dir.display().to_string();
        }
        if let Some(max_records) = args.max_records {
            self.history.max_records = Some(max_records);
        }

        if let Some(backend) = args.backend {
            self.classifier.backend = backend;
        }
        if let Some(delay_ms) = args.delay_ms {
            self.classifier.delay_ms = delay_ms;
        }
        if let Some(ref url) = args.url {
            self.classifier.url = Some(url.clone());
        }
        if let Some(seed) = args.seed {
            self.classifier.seed = Some(seed);
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.key, "analysis_history");
        assert_eq!(config.history.max_records, None);
        assert_eq!(config.classifier.backend, ClassifierBackend::Random);
        assert_eq!(config.classifier.delay_ms, 2000);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[history]
data_dir = "/tmp/probe"
max_records = 50

[classifier]
backend = "remote"
url = "http://localhost:9000/classify"
timeout_seconds = 5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.history.data_dir(), PathBuf::from("/tmp/probe"));
        assert_eq!(config.history.key, "analysis_history");
        assert_eq!(config.history.max_records, Some(50));
        assert_eq!(config.classifier.backend, ClassifierBackend::Remote);
        assert_eq!(
            config.classifier.url.as_deref(),
            Some("http://localhost:9000/classify")
        );
        assert_eq!(config.classifier.timeout_seconds, 5);
        assert_eq!(config.classifier.delay_ms, 2000);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[history]"));
        assert!(toml_str.contains("[classifier]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.history.key, "analysis_history");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[classifier]\ndelay_ms = 0\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.classifier.delay_ms, 0);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::parse_from([
            "newsprobe",
            "--data-dir",
            "/var/lib/probe",
            "--delay-ms",
            "10",
            "--seed",
            "3",
            "--max-records",
            "20",
            "history",
        ]);

        let mut config = Config::default();
        config.merge_with_args(&args);
        assert_eq!(config.history.data_dir, "/var/lib/probe");
        assert_eq!(config.history.max_records, Some(20));
        assert_eq!(config.classifier.delay_ms, 10);
        assert_eq!(config.classifier.seed, Some(3));
        assert_eq!(config.classifier.backend, ClassifierBackend::Random);
    }

    #[test]
    fn test_merge_keeps_file_values_without_flags() {
        let args = Args::parse_from(["newsprobe", "history"]);
        let mut config: Config = toml::from_str("[classifier]\ndelay_ms = 5\n").unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.classifier.delay_ms, 5);
    }

    #[test]
    fn test_general_verbose_raises_log_level() {
        let args = Args::parse_from(["newsprobe", "history"]);

        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        config.merge_with_args(&args);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        let mut config = Config::default();
        config.merge_with_args(&args);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::INFO);
    }
}
