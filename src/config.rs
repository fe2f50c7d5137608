//! Assistant configuration: working directory, shell limits, LLM endpoint.
//!
//! Loaded from a TOML file under the XDG config directory when present,
//! otherwise defaults. Constructed once per process and passed into the
//! pipeline entry point — no hidden globals.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;
use crate::paths::PilotPaths;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(deskpilot::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    #[diagnostic(
        code(deskpilot::config::parse),
        help("The file must be valid TOML. Check the syntax near the reported location.")
    )]
    Parse {
        path: String,
        message: String,
    },
}

/// Configuration for the assistant pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Working directory relative paths resolve against (uploads, searches,
    /// shell execution).
    pub workdir: PathBuf,
    /// Hard timeout for whitelisted shell commands, in seconds.
    pub shell_timeout_secs: u64,
    /// LLM endpoint used for intent inference, question answering, and
    /// email drafting. All uses are best-effort with deterministic fallbacks.
    pub llm: LlmConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            shell_timeout_secs: 30,
            llm: LlmConfig::default(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load the XDG config file if it exists, otherwise defaults.
    ///
    /// A present-but-invalid file is still an error: silently ignoring a
    /// half-written config hides user mistakes.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let Ok(paths) = PilotPaths::resolve() else {
            return Ok(Self::default());
        };
        let file = paths.config_file();
        if file.exists() {
            Self::load(&file)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AssistantConfig::default();
        assert_eq!(config.workdir, PathBuf::from("."));
        assert_eq!(config.shell_timeout_secs, 30);
        assert!(config.llm.enabled);
    }

    #[test]
    fn load_partial_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "shell_timeout_secs = 5\n[llm]\nmodel = \"qwen2.5\"\n").unwrap();

        let config = AssistantConfig::load(&file).unwrap();
        assert_eq!(config.shell_timeout_secs, 5);
        assert_eq!(config.llm.model, "qwen2.5");
        // Unspecified fields keep their defaults.
        assert_eq!(config.workdir, PathBuf::from("."));
    }

    #[test]
    fn load_invalid_toml_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "not valid [ toml").unwrap();
        assert!(AssistantConfig::load(&file).is_err());
    }
}
