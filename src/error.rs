//! Rich diagnostic error types for deskpilot.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. These surface only at the outer CLI
//! boundary (configuration, paths): the command pipeline itself never returns
//! an error to its caller — every failure mode degrades to a well-formed
//! `CommandResult`.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for deskpilot.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum DeskError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Llm(#[from] crate::llm::LlmError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tool(#[from] crate::tools::ToolError),
}

/// Convenience alias for fallible deskpilot operations.
pub type DeskResult<T> = std::result::Result<T, DeskError>;
