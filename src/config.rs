//! Output configuration.

use crate::handler::{JsonSink, Level, Sink, TextSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// ConfigError represents a configuration that cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// OutputFormat selects the sink encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {:?}", s)),
        }
    }
}

/// MeldConfig controls how records are encoded and which are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldConfig {
    /// Minimum level written: debug, info, warn, error
    #[serde(default)]
    pub level: Level,

    /// Output format: text, json
    #[serde(default)]
    pub format: OutputFormat,

    /// Filter directive for the crate's own diagnostics, overridden by `MELD_LOG`
    #[serde(default = "default_diagnostics")]
    pub diagnostics: String,
}

fn default_diagnostics() -> String {
    "warn".to_string()
}

impl Default for MeldConfig {
    fn default() -> Self {
        Self {
            level: Level::default(),
            format: OutputFormat::default(),
            diagnostics: default_diagnostics(),
        }
    }
}

impl MeldConfig {
    /// Parses a configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Builds the configured sink over `writer`.
    pub fn build_sink<W: Write + Send + 'static>(&self, writer: W) -> Arc<dyn Sink> {
        match self.format {
            OutputFormat::Text => Arc::new(TextSink::new(writer, self.level)),
            OutputFormat::Json => Arc::new(JsonSink::new(writer, self.level)),
        }
    }
}
