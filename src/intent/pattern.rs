//! Deterministic pattern-based intent resolution.
//!
//! Rule-ordered classifier mapping raw command text to an [`Intent`]. The
//! branch order encodes the tie-break policy: creation phrases before generic
//! "open", deep links before generic resource opening, greetings by exact
//! match, then substring keyword families, then system info, then general
//! question answering as the catch-all. First match wins.
//!
//! This resolver covers every supported intent on its own and never fails:
//! commands with no extractable parameters resolve to a clarification intent,
//! not an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::action::Action;
use crate::intent::{Intent, deeplink};
use crate::paths;

const CREATE_FILE_PHRASES: &[&str] = &["create file", "make file", "new file", "write file"];
const CREATE_FOLDER_PHRASES: &[&str] = &[
    "create folder",
    "make folder",
    "new folder",
    "make directory",
    "new directory",
];
const OPEN_PHRASES: &[&str] = &["open", "launch", "start", "visit", "go to", "play", "ask"];
const GREETINGS: &[&str] = &["hello", "hi", "hey", "greetings", "good morning", "good afternoon"];
const HELP_PHRASES: &[&str] = &["help", "what can you do", "capabilities", "commands", "manual"];
const SUMMARIZE_PHRASES: &[&str] = &["summarize", "summary", "brief", "overview", "tl;dr"];
const READ_PHRASES: &[&str] = &["read", "show content", "display", "cat", "view file"];
const SEARCH_PHRASES: &[&str] = &["search", "find", "locate", "where is", "list files"];
const EMAIL_PHRASES: &[&str] = &["email", "draft", "send", "write to", "compose"];
const SHELL_PHRASES: &[&str] = &[
    "run", "execute", "command", "terminal", "shell", "cmd", "pwd", "ls", "dir",
];
const SYSTEM_PHRASES: &[&str] = &[
    "system info",
    "specs",
    "cpu",
    "ram",
    "memory",
    "what time",
    "current time",
    "clock",
];

/// Assistant platforms recognized in "ask <platform> …" phrasing.
const ASSISTANT_PLATFORMS: &[&str] = &["gemini", "chatgpt", "perplexity", "claude", "gpt"];

/// Sites opened via a URL rather than treated as application names.
const KNOWN_SITES: &[&str] = &[
    "gemini",
    "chatgpt",
    "perplexity",
    "claude",
    "youtube",
    "google",
    "amazon",
    "netflix",
    "github",
    "stackoverflow",
    "gmail",
    "whatsapp",
    "spotify",
    "facebook",
    "twitter",
    "instagram",
    "linkedin",
];

const FILE_EXTENSIONS: &[&str] = &[".pdf", ".txt", ".doc", ".docx"];
const SEARCH_STOPWORDS: &[&str] = &["search", "find", "look", "for", "locate"];

static CREATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(create|make|new)\s+(file|folder|directory)\s+").unwrap()
});
static CREATE_VERB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(create|make|new)\s+").unwrap());

/// What a creation phrase asks to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateKind {
    File,
    Folder,
}

/// Deterministic, dependency-free intent resolver.
///
/// Stateless after construction; safe for concurrent read-only use.
#[derive(Debug, Default)]
pub struct PatternResolver;

impl PatternResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a command to an intent. Always returns a usable plan.
    pub fn resolve(&self, command: &str) -> Intent {
        let lower = command.to_lowercase();

        // 1. File/folder creation — more specific than generic "create"/"open".
        if CREATE_FILE_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.create_intent(&lower, CreateKind::File);
        }
        if CREATE_FOLDER_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.create_intent(&lower, CreateKind::Folder);
        }

        // 2. Deep links ("search X on Y") take priority over generic search.
        if lower.contains("on")
            && ["search", "find", "look for", "ask"].iter().any(|w| lower.contains(w))
        {
            return self.open_resource(&lower);
        }
        // "ask <assistant>" even without "on".
        if lower.starts_with("ask ") && ASSISTANT_PLATFORMS.iter().any(|p| lower.contains(p)) {
            return self.open_resource(&lower);
        }

        // 3. Generic resource opening — unless the command is really a file
        // read/summarize ("open notes.txt and summarize it").
        if OPEN_PHRASES.iter().any(|p| lower.contains(p))
            && !lower.contains("read")
            && !lower.contains("summarize")
        {
            return self.open_resource(&lower);
        }

        // 4. Keyword families. Greetings match exactly; the rest by substring.
        if GREETINGS.iter().any(|p| *p == lower) {
            return self.question(command, "user is greeting");
        }
        if HELP_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.question(command, "user needs help");
        }
        if SUMMARIZE_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.summarize_file(command);
        }
        if READ_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.read_file(command);
        }
        if SEARCH_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.search_files(command, &lower);
        }
        if EMAIL_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.draft_email(command);
        }
        if SHELL_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.run_shell(&lower);
        }

        // 5. System info / time.
        if SYSTEM_PHRASES.iter().any(|p| lower.contains(p)) {
            return self.system(&lower);
        }

        // 6. Catch-all: treat the command as a question.
        self.question(command, "question is answerable")
    }

    fn question(&self, command: &str, assumption: &str) -> Intent {
        Intent::new(
            "general_qa",
            vec![Action::AnswerQuestion {
                question: command.to_string(),
            }],
        )
        .with_target(command)
        .with_assumption(assumption)
    }

    /// Clarification intent used when a file operation names no file.
    fn clarify_file(&self, command: &str, verb: &str) -> Intent {
        Intent::new(
            "general_qa",
            vec![Action::AnswerQuestion {
                question: format!("Please specify which file to {verb}. You said: '{command}'"),
            }],
        )
        .with_target(command)
        .with_assumption("user needs to specify filename")
        .with_clarification(format!("Which file would you like me to {verb}?"))
    }

    fn summarize_file(&self, command: &str) -> Intent {
        let Some(filename) = extract_filename(command) else {
            return self.clarify_file(command, "summarize");
        };
        Intent::new(
            "summarize_file",
            vec![
                Action::ReadFile {
                    file_path: format!("uploads/{filename}"),
                },
                Action::Summarize {
                    text: String::new(),
                    style: "short".into(),
                },
            ],
        )
        .with_target(filename)
        .with_assumption("file exists in uploads folder")
    }

    fn read_file(&self, command: &str) -> Intent {
        let Some(filename) = extract_filename(command) else {
            return self.clarify_file(command, "read");
        };
        Intent::new(
            "read_file",
            vec![Action::ReadFile {
                file_path: format!("uploads/{filename}"),
            }],
        )
        .with_target(filename)
        .with_assumption("file exists in uploads folder")
    }

    fn search_files(&self, command: &str, lower: &str) -> Intent {
        let query = extract_search_query(command).unwrap_or_else(|| "relevant files".into());
        let directory = if lower.contains("desktop") {
            paths::home_dir()
                .map(|home| home.join("Desktop").display().to_string())
                .unwrap_or_else(|_| ".".into())
        } else {
            ".".into()
        };
        Intent::new(
            "search_files",
            vec![Action::SearchFiles {
                query: query.clone(),
                directory,
            }],
        )
        .with_target(query)
        .with_assumption("search directory exists")
    }

    fn draft_email(&self, command: &str) -> Intent {
        Intent::new(
            "draft_email",
            vec![Action::GenerateEmail {
                subject: "Meeting Follow-up".into(),
                recipient: "team@company.com".into(),
                body: format!("Regarding: {command}"),
            }],
        )
        .with_target("email draft")
        .with_confirmation()
        .with_assumption("email content is appropriate")
    }

    fn run_shell(&self, lower: &str) -> Intent {
        let shell_cmd = synthesize_shell_command(lower);
        Intent::new(
            "run_shell_command",
            vec![Action::RunShell {
                command: shell_cmd.clone(),
            }],
        )
        .with_target(shell_cmd)
        .with_confirmation()
        .with_assumption("command is safe and whitelisted")
    }

    fn system(&self, lower: &str) -> Intent {
        if ["time", "clock", "date"].iter().any(|w| lower.contains(w)) {
            Intent::new("get_time", vec![Action::GetTime])
                .with_target("time")
                .with_assumption("user wants local time")
        } else {
            Intent::new("get_system_info", vec![Action::GetSystemInfo])
                .with_target("system info")
                .with_assumption("user wants system specs")
        }
    }

    /// Classify "open X": deep link, known site, explorer, terminal, or app.
    fn open_resource(&self, lower: &str) -> Intent {
        if let Some(link) = deeplink::build(lower) {
            return Intent::new(
                "open_url",
                vec![Action::OpenUrl {
                    url: link.url.clone(),
                }],
            )
            .with_target(format!("{} search: {}", link.platform, link.query))
            .with_assumption("url is valid");
        }

        // Strip the opening verbs to get the bare resource.
        let resource = lower
            .replace("open", "")
            .replace("launch", "")
            .replace("start", "")
            .replace("visit", "")
            .replace("go to", "")
            .trim()
            .to_string();

        let looks_like_url = KNOWN_SITES.contains(&resource.as_str())
            || [".com", ".org", ".net", ".edu", ".in"].iter().any(|s| resource.contains(s))
            || resource.contains("http");

        if looks_like_url {
            Intent::new(
                "open_website",
                vec![Action::OpenUrl {
                    url: resource.clone(),
                }],
            )
            .with_target(resource)
            .with_assumption("url is valid")
        } else if ["explorer", "folder", "directory", "file explorer"]
            .iter()
            .any(|w| resource.contains(w))
        {
            let path = paths::home_dir()
                .map(|home| home.display().to_string())
                .unwrap_or_else(|_| ".".into());
            Intent::new("open_explorer", vec![Action::OpenExplorer { path }])
                .with_target("file explorer")
                .with_assumption("path exists")
        } else if ["terminal", "cmd", "command prompt", "powershell"]
            .iter()
            .any(|w| resource.contains(w))
        {
            Intent::new("run_shell_command", vec![Action::OpenTerminal { path: None }])
                .with_target("terminal")
                .with_assumption("terminal is available")
        } else {
            Intent::new(
                "open_app",
                vec![Action::OpenApp {
                    app_name: resource.clone(),
                }],
            )
            .with_target(resource)
            .with_assumption("application is installed")
        }
    }

    fn create_intent(&self, lower: &str, kind: CreateKind) -> Intent {
        // Strip "create file "/"make folder " etc. from the front; if the
        // phrase had no file/folder token ("create notes.txt"), strip just
        // the verb.
        let mut name = CREATE_PREFIX.replace(lower, "").trim().to_string();
        if name == *lower {
            name = CREATE_VERB.replace(lower, "").trim().to_string();
        }
        if name.is_empty() {
            name = match kind {
                CreateKind::File => "new_item".into(),
                CreateKind::Folder => "New Folder".into(),
            };
        }

        let (intent_name, step) = match kind {
            CreateKind::File => (
                "create_file",
                Action::CreateFile {
                    path: name.clone(),
                    content: String::new(),
                },
            ),
            CreateKind::Folder => ("create_folder", Action::CreateFolder { path: name.clone() }),
        };
        Intent::new(intent_name, vec![step])
            .with_target(name)
            .with_assumption("path is valid")
    }
}

/// First whitespace token ending in a recognized document extension.
fn extract_filename(command: &str) -> Option<String> {
    command
        .to_lowercase()
        .split_whitespace()
        .find(|word| FILE_EXTENSIONS.iter().any(|ext| word.ends_with(ext)))
        .map(str::to_string)
}

/// The command minus search stop-words; `None` when nothing remains.
fn extract_search_query(command: &str) -> Option<String> {
    let lower = command.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| !SEARCH_STOPWORDS.contains(w))
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Map a natural-language shell request to one concrete platform command.
fn synthesize_shell_command(lower: &str) -> String {
    let windows = cfg!(windows);
    if lower.contains("pwd") {
        if windows { "echo %CD%" } else { "pwd" }
    } else if lower.contains("whoami") {
        "whoami"
    } else if lower.contains("dir") || lower.contains("ls") {
        if windows { "dir" } else { "ls" }
    } else if lower.contains("terminal") || lower.contains("cmd") {
        "echo 'Terminal session started'"
    } else if windows {
        "dir"
    } else {
        "ls"
    }
    .to_string()
}
