//! XDG-compliant path resolution for deskpilot.
//!
//! Resolves the config directory following the XDG Base Directory
//! Specification, plus the user-facing directories the assistant targets
//! (home, Desktop) when a command gives no explicit path.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(deskpilot::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(deskpilot::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// The user's home directory, from `HOME` (or `USERPROFILE` on Windows).
pub fn home_dir() -> PathResult<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var(var).map(PathBuf::from).map_err(|_| PathError::NoHome)
}

/// Base directory for files and folders created from a relative path:
/// `~/Desktop` when it exists, otherwise the home directory, otherwise `.`.
pub fn desktop_or_home() -> PathBuf {
    match home_dir() {
        Ok(home) => {
            let desktop = home.join("Desktop");
            if desktop.is_dir() { desktop } else { home }
        }
        Err(_) => PathBuf::from("."),
    }
}

/// Global XDG-compliant directories for deskpilot.
#[derive(Debug, Clone)]
pub struct PilotPaths {
    /// `$XDG_CONFIG_HOME/deskpilot/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/deskpilot/`
    pub data_dir: PathBuf,
}

impl PilotPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = home_dir()?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("deskpilot");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("deskpilot");

        Ok(Self { config_dir, data_dir })
    }

    /// Default location of the assistant's TOML config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Create the directories if they do not yet exist.
    pub fn ensure(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}
