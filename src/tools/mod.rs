//! Tool collaborators: the side-effecting handlers behind the dispatcher.
//!
//! Every tool reports through [`ToolReport`], a uniform record carrying the
//! success flag, an optional error, an optional human-facing message, and any
//! extra data fields. Operational failures (missing file, rejected command,
//! unreachable endpoint) are reports with `success = false`; the `Err` side of
//! a tool call is reserved for genuinely unexpected conditions and is
//! converted to a failed outcome at the dispatch boundary.

pub mod answer;
pub mod email;
pub mod file_reader;
pub mod search;
pub mod shell;
pub mod system;

use miette::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors a tool may surface to the dispatcher.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolError {
    #[error("{tool}: {message}")]
    #[diagnostic(
        code(deskpilot::tools::internal),
        help("This indicates an unexpected condition inside a tool, not a normal operational failure.")
    )]
    Internal { tool: &'static str, message: String },
}

/// Convenience alias for tool executions.
pub type ToolResult = Result<ToolReport, ToolError>;

/// Uniform result record produced by every tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolReport {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Machine-facing error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-facing one-liner for the aggregated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_message: Option<String>,
    /// Secondary human-facing note (collected when no friendly message is set).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Tool-specific extra fields, flattened into the serialized record.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ToolReport {
    /// A successful report.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            friendly_message: None,
            message: None,
            data: Map::new(),
        }
    }

    /// A failed report with an error description.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            friendly_message: None,
            message: None,
            data: Map::new(),
        }
    }

    /// Attach a human-facing one-liner.
    pub fn friendly(mut self, message: impl Into<String>) -> Self {
        self.friendly_message = Some(message.into());
        self
    }

    /// Attach a secondary note.
    pub fn note(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an extra data field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
