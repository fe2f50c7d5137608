//! Execution dispatch: exhaustive mapping from actions to tool collaborators.
//!
//! The dispatcher owns every tool, constructed once from the assistant
//! configuration and reused across invocations. Dispatch is an exhaustive
//! match over [`Action`], so an unknown action is impossible for internally
//! constructed plans and an explicit [`Action::Unrecognized`] re-route for
//! inference-sourced ones. Tool failures of any kind become a failed
//! [`ExecutionOutcome`] — nothing propagates past this boundary.

pub mod runner;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::action::Action;
use crate::config::AssistantConfig;
use crate::llm::LlmClient;
use crate::tools::answer::Answerer;
use crate::tools::email::EmailDrafter;
use crate::tools::file_reader::FileReader;
use crate::tools::search::FileSearcher;
use crate::tools::shell::ShellRunner;
use crate::tools::system::SystemControl;
use crate::tools::ToolResult;

/// Uniform outcome of one executed step. Produced once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// The tool's full serialized report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Maps each action onto its tool and normalizes the result.
pub struct Dispatcher {
    files: FileReader,
    searcher: FileSearcher,
    email: EmailDrafter,
    shell: ShellRunner,
    system: SystemControl,
    answerer: Answerer,
}

impl Dispatcher {
    /// Build the tool set from configuration. Everything is immutable after
    /// construction, so a dispatcher is safe for concurrent read-only use.
    pub fn new(config: &AssistantConfig, llm: Arc<LlmClient>) -> Self {
        Self {
            files: FileReader::new(config.workdir.clone()),
            searcher: FileSearcher::new(config.workdir.clone()),
            email: EmailDrafter::new(llm.clone()),
            shell: ShellRunner::new(config.workdir.clone(), config.shell_timeout_secs),
            system: SystemControl::new(),
            answerer: Answerer::new(llm),
        }
    }

    /// Execute one step. Never returns an error and never panics on any
    /// documented input.
    pub fn execute(&self, action: &Action) -> ExecutionOutcome {
        let result = match action {
            Action::ReadFile { file_path } => self.files.read(file_path),
            Action::Summarize { text, style } => self.files.summarize(text, style),
            Action::GenerateEmail {
                subject,
                recipient,
                body,
            } => {
                // A body-only step is a free-text drafting request.
                if subject.is_empty() && recipient.is_empty() {
                    self.email.draft_from_prompt(body)
                } else {
                    self.email.draft(subject, recipient, body)
                }
            }
            Action::RunShell { command } => self.shell.run(command),
            Action::AnswerQuestion { question } => self.answerer.answer(question),
            Action::SearchFiles { query, directory } => self.searcher.search(query, directory),
            Action::OpenUrl { url } => self.system.open_url(url),
            Action::OpenApp { app_name } => self.system.open_app(app_name),
            Action::OpenExplorer { path } => self.system.open_explorer(path),
            Action::CreateFile { path, content } => self.system.create_file(path, content),
            Action::CreateFolder { path } => self.system.create_folder(path),
            Action::OpenTerminal { path } => self.system.open_terminal(path.as_deref()),
            Action::GetSystemInfo => self.system.system_info(),
            Action::GetTime => self.system.time(),
            Action::Unrecognized { name, params } => {
                tracing::warn!(action = %name, "unknown action, treating as question");
                let question = params
                    .get("question")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Action: {name}"));
                self.answerer.answer(&question)
            }
        };

        wrap(action.name(), result)
    }

    /// The shell whitelist, surfaced for the CLI's capability listing.
    pub fn shell_commands(&self) -> Vec<&'static str> {
        self.shell.available_commands()
    }
}

/// Normalize a tool result into an outcome. An `Err` from a tool is the
/// "handler exception" path: converted, never propagated.
fn wrap(action_name: &str, result: ToolResult) -> ExecutionOutcome {
    match result {
        Ok(report) => {
            let success = report.success;
            let error = report.error.clone();
            let output = serde_json::to_value(&report).ok();
            ExecutionOutcome {
                success,
                output,
                error,
            }
        }
        Err(e) => ExecutionOutcome {
            success: false,
            output: None,
            error: Some(format!("Error executing {action_name}: {e}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;
    use crate::tools::{ToolError, ToolReport};

    fn dispatcher_in(dir: &std::path::Path) -> Dispatcher {
        let config = AssistantConfig {
            workdir: dir.to_path_buf(),
            ..Default::default()
        };
        Dispatcher::new(&config, Arc::new(LlmClient::new(LlmConfig::default())))
    }

    #[test]
    fn unknown_action_reroutes_to_answering() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = dispatcher_in(dir.path()).execute(&Action::Unrecognized {
            name: "do_a_flip".into(),
            params: serde_json::Map::new(),
        });
        assert!(outcome.success);
        let output = outcome.output.unwrap();
        assert_eq!(output["question"], "Action: do_a_flip");
    }

    #[test]
    fn unknown_action_with_question_param_uses_it() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut params = serde_json::Map::new();
        params.insert("question".into(), "what is rust".into());
        let outcome = dispatcher_in(dir.path()).execute(&Action::Unrecognized {
            name: "ponder".into(),
            params,
        });
        assert!(outcome.success);
        assert_eq!(outcome.output.unwrap()["question"], "what is rust");
    }

    #[test]
    fn shell_whitelist_blocks_at_dispatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = dispatcher_in(dir.path()).execute(&Action::RunShell {
            command: "rm -rf /".into(),
        });
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("not whitelisted"));
    }

    #[test]
    fn tool_error_becomes_failed_outcome() {
        let outcome = wrap(
            "read_file",
            Err(ToolError::Internal {
                tool: "read_file",
                message: "disk fell off".into(),
            }),
        );
        assert!(!outcome.success);
        assert!(outcome.output.is_none());
        let error = outcome.error.unwrap();
        assert!(error.starts_with("Error executing read_file:"));
        assert!(error.contains("disk fell off"));
    }

    #[test]
    fn report_error_field_is_copied_up() {
        let outcome = wrap("read_file", Ok(ToolReport::err("File not found: x")));
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("File not found: x"));
        // The full report is still present as output.
        assert_eq!(outcome.output.unwrap()["success"], false);
    }
}
