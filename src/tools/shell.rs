//! Whitelisted shell execution with timeout and output limits.
//!
//! A command runs only when its leading token is on the platform whitelist;
//! everything else is rejected before any process is spawned. Execution goes
//! through the system shell with a kill-on-deadline poll loop and a cap on
//! captured output.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::tools::{ToolError, ToolReport, ToolResult};

/// Maximum captured stdout/stderr size (64 KB each).
const MAX_OUTPUT_SIZE: usize = 64 * 1024;

/// Safe commands on Unix-likes.
const UNIX_WHITELIST: &[&str] = &[
    "ls", "pwd", "whoami", "echo", "date", "find", "grep", "wc", "head", "tail", "cat", "mkdir",
    "cd", "python", "python3", "pip",
];

/// Safe commands on Windows.
const WINDOWS_WHITELIST: &[&str] = &[
    "dir", "cd", "echo", "type", "find", "findstr", "where", "tree", "mkdir", "rmdir", "copy",
    "move", "whoami", "hostname", "systeminfo", "tasklist", "python", "python3", "pip", "cls",
    "date", "time",
];

/// Unix spellings accepted on Windows because they translate cleanly.
const TRANSLATABLE: &[&str] = &["ls", "pwd", "cat", "grep"];

/// Executes whitelisted shell commands with a hard timeout.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    workdir: PathBuf,
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(workdir: PathBuf, timeout_secs: u64) -> Self {
        Self {
            workdir,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn whitelist() -> &'static [&'static str] {
        if cfg!(windows) { WINDOWS_WHITELIST } else { UNIX_WHITELIST }
    }

    /// Whether the command's leading token is whitelisted.
    pub fn is_command_safe(&self, command: &str) -> bool {
        let Some(base) = command.split_whitespace().next() else {
            return false;
        };
        if cfg!(windows) && TRANSLATABLE.contains(&base) {
            return true;
        }
        Self::whitelist().contains(&base)
    }

    /// The whitelisted commands, sorted, including translatable spellings.
    pub fn available_commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<&'static str> = Self::whitelist().to_vec();
        if cfg!(windows) {
            commands.extend_from_slice(TRANSLATABLE);
        }
        commands.sort_unstable();
        commands.dedup();
        commands
    }

    /// Run a command. Whitelist rejection and timeout are failed reports;
    /// a completed subprocess is a successful report carrying its exit code.
    pub fn run(&self, command: &str) -> ToolResult {
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return Ok(ToolReport::err("No command provided"));
        }

        let base = trimmed.split_whitespace().next().unwrap_or_default();
        if !self.is_command_safe(trimmed) {
            tracing::warn!(command = %trimmed, "rejected non-whitelisted shell command");
            return Ok(ToolReport::err(format!(
                "Command '{base}' is not whitelisted for safety reasons."
            ))
            .with("whitelisted_commands", json!(self.available_commands())));
        }

        let shell_cmd = if cfg!(windows) {
            translate_unix_spelling(trimmed)
        } else {
            trimmed.to_string()
        };

        let mut child = match self.spawn(&shell_cmd) {
            Ok(child) => child,
            Err(e) => {
                return Ok(ToolReport::err(format!("Error executing command: {e}"))
                    .friendly(format!("❌ Failed to execute command: {e}")));
            }
        };

        // Poll for completion; kill on deadline.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        let secs = self.timeout.as_secs();
                        return Ok(ToolReport::err(format!(
                            "Command timed out after {secs} seconds"
                        ))
                        .friendly("❌ Command took too long to execute"));
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    return Err(ToolError::Internal {
                        tool: "run_shell",
                        message: format!("failed to wait on command: {e}"),
                    });
                }
            }
        };

        let stdout = read_capped(child.stdout.take());
        let stderr = read_capped(child.stderr.take());
        let return_code = status.code().unwrap_or(-1);
        let friendly = friendly_summary(trimmed, return_code, &stdout, &stderr);

        let mut report = ToolReport::ok()
            .friendly(friendly)
            .with("output", stdout)
            .with("return_code", return_code)
            .with("command_executed", shell_cmd)
            .with("platform", if cfg!(windows) { "Windows" } else { "Unix" });
        if !stderr.is_empty() {
            report.error = Some(stderr);
        }
        Ok(report)
    }

    fn spawn(&self, command: &str) -> std::io::Result<std::process::Child> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("/bin/sh");
            c.arg("-c").arg(command);
            c
        };
        cmd.current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

/// Read a captured pipe fully, truncating past the output cap.
fn read_capped<R: std::io::Read>(pipe: Option<R>) -> String {
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    if std::io::Read::read_to_end(&mut pipe, &mut buf).is_err() {
        return String::new();
    }
    let text = String::from_utf8_lossy(&buf);
    if text.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... [truncated, total: {} bytes]", &text[..cut], text.len())
    } else {
        text.into_owned()
    }
}

/// Translate common Unix spellings to Windows equivalents.
fn translate_unix_spelling(command: &str) -> String {
    const TRANSLATIONS: &[(&str, &str)] = &[
        ("ls", "dir"),
        ("pwd", "echo %CD%"),
        ("cat", "type"),
        ("grep", "findstr"),
        ("rm ", "del "),
        ("cp ", "copy "),
        ("mv ", "move "),
    ];
    let lower = command.to_lowercase();
    for (unix, windows) in TRANSLATIONS {
        if lower.starts_with(unix) {
            return lower.replacen(unix, windows, 1);
        }
    }
    command.to_string()
}

/// User-facing one-liner describing what the command did.
fn friendly_summary(command: &str, return_code: i32, stdout: &str, stderr: &str) -> String {
    let base = command.split_whitespace().next().unwrap_or_default();

    if return_code == 0 {
        match base {
            "ls" | "dir" => {
                let items = stdout.lines().filter(|l| !l.trim().is_empty()).count();
                format!("📁 Found {items} items in current directory")
            }
            "pwd" | "cd" => format!("📂 Current directory: {}", stdout.trim()),
            "whoami" | "hostname" => format!("👤 {}", stdout.trim()),
            _ => {
                let preview: String = stdout.chars().take(100).collect();
                let preview = if stdout.chars().count() > 100 {
                    format!("{preview}...")
                } else {
                    preview
                };
                format!("✅ Command executed successfully\n{}", preview.trim())
            }
        }
    } else {
        format!(
            "❌ Command failed: {}",
            if stderr.trim().is_empty() { "Unknown error" } else { stderr.trim() }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ShellRunner {
        ShellRunner::new(PathBuf::from("."), 30)
    }

    #[test]
    fn rejects_non_whitelisted_command() {
        let report = runner().run("rm -rf /").unwrap();
        assert!(!report.success);
        assert!(report.error.unwrap().contains("not whitelisted"));
        // The rejection lists what is allowed.
        assert!(report.data["whitelisted_commands"].as_array().is_some());
    }

    #[test]
    fn rejects_empty_command() {
        let report = runner().run("   ").unwrap();
        assert!(!report.success);
    }

    #[cfg(unix)]
    #[test]
    fn echo_runs_and_reports_output() {
        let report = runner().run("echo hello").unwrap();
        assert!(report.success);
        assert_eq!(report.data["return_code"], 0);
        assert!(report.data["output"].as_str().unwrap().contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn hanging_command_is_killed_at_deadline() {
        let runner = ShellRunner::new(PathBuf::from("."), 1);
        let report = runner.run("tail -f /dev/null").unwrap();
        assert!(!report.success);
        assert!(report.error.unwrap().contains("timed out"));
        assert_eq!(
            report.friendly_message.as_deref(),
            Some("❌ Command took too long to execute")
        );
    }

    #[test]
    fn safety_check_uses_leading_token() {
        let r = runner();
        assert!(r.is_command_safe("echo rm"));
        assert!(!r.is_command_safe("rm echo"));
        assert!(!r.is_command_safe(""));
    }

    #[test]
    fn translations_apply_at_command_start_only() {
        assert_eq!(translate_unix_spelling("ls -la"), "dir -la");
        assert_eq!(translate_unix_spelling("cat notes.txt"), "type notes.txt");
        assert_eq!(translate_unix_spelling("echo ls"), "echo ls");
    }

    #[test]
    fn friendly_summary_counts_listing() {
        let msg = friendly_summary("ls", 0, "a\nb\nc\n", "");
        assert_eq!(msg, "📁 Found 3 items in current directory");
    }

    #[test]
    fn friendly_summary_failure_uses_stderr() {
        let msg = friendly_summary("grep x missing", 2, "", "no such file");
        assert!(msg.contains("no such file"));
    }
}
