//! Closed action vocabulary with typed parameters.
//!
//! Every operation the assistant can perform is one variant of [`Action`].
//! Resolvers construct variants directly; steps arriving from the inference
//! path deserialize through the wire shape `{"action": <name>, "params": {…}}`,
//! where an unknown name becomes [`Action::Unrecognized`] rather than an error.
//! Parameter validation happens here, at the resolver boundary — the
//! dispatcher never does defensive lookups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One atomic operation in an intent's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireStep", from = "WireStep")]
pub enum Action {
    /// Read a plaintext or PDF file.
    ReadFile { file_path: String },
    /// Summarize text. `text` is usually supplied by inference-sourced steps;
    /// pattern-resolved steps leave it empty.
    Summarize { text: String, style: String },
    /// Draft an email. An empty subject and recipient means "draft from the
    /// body as a free-text request".
    GenerateEmail {
        subject: String,
        recipient: String,
        body: String,
    },
    /// Run a whitelisted shell command.
    RunShell { command: String },
    /// Answer a question conversationally.
    AnswerQuestion { question: String },
    /// Search a directory for entries matching a query.
    SearchFiles { query: String, directory: String },
    /// Open a URL (or site name) in the default browser.
    OpenUrl { url: String },
    /// Launch an application by name.
    OpenApp { app_name: String },
    /// Open the file explorer at a path.
    OpenExplorer { path: String },
    /// Create a file, with optional content.
    CreateFile { path: String, content: String },
    /// Create a folder.
    CreateFolder { path: String },
    /// Open a terminal window, optionally at a path.
    OpenTerminal { path: Option<String> },
    /// Report system specs.
    GetSystemInfo,
    /// Report the current local time.
    GetTime,
    /// An action name outside the closed vocabulary. Only reachable from
    /// externally-sourced steps; the dispatcher re-routes it to question
    /// answering instead of failing.
    Unrecognized { name: String, params: Map<String, Value> },
}

impl Action {
    /// The wire name of this action.
    pub fn name(&self) -> &str {
        match self {
            Self::ReadFile { .. } => "read_file",
            Self::Summarize { .. } => "summarize",
            Self::GenerateEmail { .. } => "generate_email",
            Self::RunShell { .. } => "run_shell",
            Self::AnswerQuestion { .. } => "answer_question",
            Self::SearchFiles { .. } => "search_files",
            Self::OpenUrl { .. } => "open_url",
            Self::OpenApp { .. } => "open_app",
            Self::OpenExplorer { .. } => "open_explorer",
            Self::CreateFile { .. } => "create_file",
            Self::CreateFolder { .. } => "create_folder",
            Self::OpenTerminal { .. } => "open_terminal",
            Self::GetSystemInfo => "get_system_info",
            Self::GetTime => "get_time",
            Self::Unrecognized { name, .. } => name,
        }
    }
}

/// Serde representation: `{"action": <name>, "params": {…}}` in both
/// directions. This is the shape the inference collaborator emits and the
/// shape `CommandResult` reports back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireStep {
    pub action: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

fn str_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

impl From<WireStep> for Action {
    fn from(step: WireStep) -> Self {
        match known_action(&step.action, &step.params) {
            Some(action) => action,
            None => Self::Unrecognized {
                name: step.action,
                params: step.params,
            },
        }
    }
}

/// Map a wire name to its typed variant; `None` for out-of-vocabulary names.
fn known_action(name: &str, p: &Map<String, Value>) -> Option<Action> {
    let text = |key: &str| str_param(p, key).unwrap_or_default();

    Some(match name {
        "read_file" => Action::ReadFile {
            file_path: text("file_path"),
        },
        "summarize" => Action::Summarize {
            text: text("text"),
            style: str_param(p, "style").unwrap_or_else(|| "short".into()),
        },
        "generate_email" => Action::GenerateEmail {
            subject: text("subject"),
            recipient: text("recipient"),
            body: text("body"),
        },
        "run_shell" => Action::RunShell {
            command: text("command"),
        },
        "answer_question" => Action::AnswerQuestion {
            question: text("question"),
        },
        // Greeting aliases the inference stage likes to invent.
        "respond_to_greeting" | "greet_user" | "answer_greeting" => Action::AnswerQuestion {
            question: str_param(p, "question").unwrap_or_else(|| "hello".into()),
        },
        "search_files" => Action::SearchFiles {
            query: text("query"),
            directory: str_param(p, "directory").unwrap_or_else(|| ".".into()),
        },
        "open_url" => Action::OpenUrl { url: text("url") },
        "open_app" => Action::OpenApp {
            app_name: text("app_name"),
        },
        "open_explorer" => Action::OpenExplorer {
            path: str_param(p, "path").unwrap_or_else(|| ".".into()),
        },
        "create_file" => Action::CreateFile {
            path: text("path"),
            content: text("content"),
        },
        "create_folder" => Action::CreateFolder { path: text("path") },
        "open_terminal" => Action::OpenTerminal {
            path: str_param(p, "path"),
        },
        "get_system_info" => Action::GetSystemInfo,
        "get_time" => Action::GetTime,
        _ => return None,
    })
}

impl From<Action> for WireStep {
    fn from(action: Action) -> Self {
        fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        }

        let name = action.name().to_string();
        let params = match action {
            Action::ReadFile { file_path } => params(&[("file_path", file_path.into())]),
            Action::Summarize { text, style } => {
                params(&[("text", text.into()), ("style", style.into())])
            }
            Action::GenerateEmail {
                subject,
                recipient,
                body,
            } => params(&[
                ("subject", subject.into()),
                ("recipient", recipient.into()),
                ("body", body.into()),
            ]),
            Action::RunShell { command } => params(&[("command", command.into())]),
            Action::AnswerQuestion { question } => params(&[("question", question.into())]),
            Action::SearchFiles { query, directory } => {
                params(&[("query", query.into()), ("directory", directory.into())])
            }
            Action::OpenUrl { url } => params(&[("url", url.into())]),
            Action::OpenApp { app_name } => params(&[("app_name", app_name.into())]),
            Action::OpenExplorer { path } => params(&[("path", path.into())]),
            Action::CreateFile { path, content } => {
                params(&[("path", path.into()), ("content", content.into())])
            }
            Action::CreateFolder { path } => params(&[("path", path.into())]),
            Action::OpenTerminal { path } => match path {
                Some(p) => params(&[("path", p.into())]),
                None => Map::new(),
            },
            Action::GetSystemInfo | Action::GetTime => Map::new(),
            Action::Unrecognized { params, .. } => params,
        };

        WireStep { action: name, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(action: Action) -> Action {
        let json = serde_json::to_string(&action).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn wire_round_trip() {
        let actions = vec![
            Action::ReadFile {
                file_path: "uploads/notes.txt".into(),
            },
            Action::Summarize {
                text: String::new(),
                style: "short".into(),
            },
            Action::RunShell { command: "ls".into() },
            Action::OpenTerminal { path: None },
            Action::GetTime,
        ];
        for action in actions {
            assert_eq!(round_trip(action.clone()), action);
        }
    }

    #[test]
    fn wire_shape_is_action_plus_params() {
        let json = serde_json::to_value(Action::OpenUrl {
            url: "https://github.com".into(),
        })
        .unwrap();
        assert_eq!(json["action"], "open_url");
        assert_eq!(json["params"]["url"], "https://github.com");
    }

    #[test]
    fn unknown_wire_name_becomes_unrecognized() {
        let action: Action =
            serde_json::from_str(r#"{"action": "launch_rocket", "params": {"target": "moon"}}"#)
                .unwrap();
        match action {
            Action::Unrecognized { name, params } => {
                assert_eq!(name, "launch_rocket");
                assert_eq!(params["target"], "moon");
            }
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn greeting_alias_maps_to_answer_question() {
        let action: Action =
            serde_json::from_str(r#"{"action": "greet_user", "params": {}}"#).unwrap();
        assert_eq!(
            action,
            Action::AnswerQuestion {
                question: "hello".into()
            }
        );
    }

    #[test]
    fn missing_params_key_defaults_empty() {
        let action: Action = serde_json::from_str(r#"{"action": "get_time"}"#).unwrap();
        assert_eq!(action, Action::GetTime);
    }
}
