//! System control: browser/app/explorer/terminal launching, file and folder
//! creation, system info, and local time.
//!
//! Launch operations spawn detached processes through the platform opener
//! (`xdg-open`, `open`, `cmd /C start`) and are best-effort: a failed spawn is
//! a failed report, never a crash. Creation operations resolve relative paths
//! onto the user's Desktop (falling back to home).

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use serde_json::json;

use crate::paths;
use crate::tools::{ToolReport, ToolResult};

/// Known site name → canonical URL.
const URL_MAP: &[(&str, &str)] = &[
    ("gemini", "https://gemini.google.com"),
    ("chatgpt", "https://chat.openai.com"),
    ("perplexity", "https://perplexity.ai"),
    ("claude", "https://claude.ai"),
    ("youtube", "https://youtube.com"),
    ("google", "https://google.com"),
    ("amazon", "https://www.amazon.in"),
    ("netflix", "https://netflix.com"),
    ("github", "https://github.com"),
    ("stackoverflow", "https://stackoverflow.com"),
    ("gmail", "https://mail.google.com"),
    ("whatsapp", "https://web.whatsapp.com"),
    ("spotify", "https://open.spotify.com"),
];

/// Site → search URL template, for recovering embedded search phrases that
/// reach `open_url` as raw text (e.g. from the inference stage).
const SEARCH_TEMPLATES: &[(&str, &str)] = &[
    ("google", "https://www.google.com/search?q={}"),
    ("youtube", "https://www.youtube.com/results?search_query={}"),
    ("amazon", "https://www.amazon.in/s?k={}"),
    ("bing", "https://www.bing.com/search?q={}"),
    ("duckduckgo", "https://duckduckgo.com/?q={}"),
    ("github", "https://github.com/search?q={}"),
    ("stackoverflow", "https://stackoverflow.com/search?q={}"),
    ("perplexity", "https://www.perplexity.ai/search?q={}"),
];

/// Friendly app name → launch target.
const APP_MAP: &[(&str, &str)] = &[
    ("chrome", "chrome"),
    ("notepad", "notepad"),
    ("calc", "calc"),
    ("calculator", "calc"),
    ("explorer", "explorer"),
    ("file explorer", "explorer"),
    ("cmd", "cmd"),
    ("powershell", "powershell"),
    ("code", "code"),
    ("vscode", "code"),
    ("spotify", "spotify"),
    ("discord", "discord"),
    ("slack", "slack"),
    ("teams", "msteams"),
    ("word", "winword"),
    ("excel", "excel"),
    ("powerpoint", "powerpnt"),
];

/// Platform automation: launches, filesystem creation, info and time.
#[derive(Debug, Clone, Default)]
pub struct SystemControl;

impl SystemControl {
    pub fn new() -> Self {
        Self
    }

    /// Open a URL (or site name, or embedded search phrase) in the browser.
    pub fn open_url(&self, url: &str) -> ToolResult {
        let final_url = resolve_url(url);
        tracing::info!(url = %final_url, "opening in browser");

        match launch_opener(&final_url) {
            Ok(()) => {
                let name = friendly_site_name(&final_url);
                Ok(ToolReport::ok()
                    .note(format!("🌐 {name} is now opened in your browser!"))
                    .friendly(format!("✅ {name} is now opened!"))
                    .with("output", format!("Opened: {final_url}"))
                    .with("action", "opened_browser"))
            }
            Err(e) => Ok(ToolReport::err(format!("Failed to open URL: {e}"))
                .friendly(format!("❌ Sorry, I couldn't open {url}"))),
        }
    }

    /// Launch an application by name.
    pub fn open_app(&self, app_name: &str) -> ToolResult {
        let target = APP_MAP
            .iter()
            .find(|(name, _)| *name == app_name.to_lowercase())
            .map(|(_, cmd)| *cmd)
            .unwrap_or(app_name);

        match launch_app(target) {
            Ok(()) => Ok(ToolReport::ok()
                .note(format!("🚀 {app_name} is now launched!"))
                .friendly(format!("✅ {app_name} is now opened!"))
                .with("output", format!("Launched application: {app_name}"))
                .with("action", "launched_app")),
            Err(e) => Ok(ToolReport::err(format!("Failed to open application: {e}"))
                .friendly(format!("❌ Could not open {app_name}"))),
        }
    }

    /// Open the file explorer at a path (home when `.` or empty).
    pub fn open_explorer(&self, path: &str) -> ToolResult {
        let target = if path.is_empty() || path == "." {
            paths::home_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            PathBuf::from(path)
        };

        if !target.exists() {
            return Ok(ToolReport::err(format!(
                "Path does not exist: {}",
                target.display()
            ))
            .friendly("❌ Sorry, I couldn't open File Explorer"));
        }

        let folder = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Home".into());

        match launch_opener(&target.display().to_string()) {
            Ok(()) => Ok(ToolReport::ok()
                .note(format!("📁 File Explorer opened at: {folder}"))
                .friendly(format!("✅ File Explorer is now opened at {folder}!"))
                .with("output", format!("Opened file explorer at: {}", target.display()))
                .with("action", "opened_explorer")),
            Err(e) => Ok(ToolReport::err(format!("Failed to open file explorer: {e}"))
                .friendly("❌ Sorry, I couldn't open File Explorer")),
        }
    }

    /// Open a terminal window, optionally at a path.
    pub fn open_terminal(&self, path: Option<&str>) -> ToolResult {
        let dir = match path {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => paths::home_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        match launch_terminal(&dir) {
            Ok(()) => Ok(ToolReport::ok()
                .friendly("✅ Terminal opened")
                .with("output", format!("Opened terminal at {}", dir.display()))),
            Err(e) => Ok(ToolReport::err(format!("Failed to open terminal: {e}"))
                .friendly("❌ Failed to open terminal")),
        }
    }

    /// Create a file. Relative paths land on the Desktop (or home).
    pub fn create_file(&self, path: &str, content: &str) -> ToolResult {
        let name = if path.trim().is_empty() { "new_file.txt" } else { path };
        let mut target = resolve_creation_path(name);

        // A bare directory target gets a default filename inside it.
        if target.is_dir() {
            target = target.join("new_file.txt");
        }

        if let Some(parent) = target.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Ok(ToolReport::err(format!("Failed to create file: {e}"))
                    .friendly("❌ Failed to create file"));
            }
        }

        match std::fs::write(&target, content) {
            Ok(()) => {
                let filename = target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".into());
                Ok(ToolReport::ok()
                    .friendly(format!("✅ File created: {filename}"))
                    .with("output", format!("Created file at: {}", target.display())))
            }
            Err(e) => Ok(ToolReport::err(format!("Failed to create file: {e}"))
                .friendly("❌ Failed to create file")),
        }
    }

    /// Create a folder (and any missing parents).
    pub fn create_folder(&self, path: &str) -> ToolResult {
        let target = resolve_creation_path(path);
        match std::fs::create_dir_all(&target) {
            Ok(()) => {
                let folder = target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "folder".into());
                Ok(ToolReport::ok()
                    .friendly(format!("✅ Folder created: {folder}"))
                    .with("output", format!("Created folder at: {}", target.display())))
            }
            Err(e) => Ok(ToolReport::err(format!("Failed to create folder: {e}"))
                .friendly("❌ Failed to create folder")),
        }
    }

    /// Report system specs: OS, architecture, and what `/proc` offers.
    pub fn system_info(&self) -> ToolResult {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let bits = if cfg!(target_pointer_width = "64") { "64-bit" } else { "32-bit" };

        let mut info = json!({
            "system": os,
            "machine": arch,
            "architecture": bits,
        });

        if let Ok(cores) = std::thread::available_parallelism() {
            info["cpu"] = json!({ "logical_cores": cores.get() });
        }
        if let Some(model) = proc_cpu_model() {
            info["cpu"]["model"] = json!(model);
        }
        if let Some((total_gb, available_gb)) = proc_memory_gb() {
            info["ram"] = json!({
                "total_gb": total_gb,
                "available_gb": available_gb,
            });
        }

        let cpu_line = info["cpu"]["model"]
            .as_str()
            .map(|m| m.to_string())
            .unwrap_or_else(|| arch.to_string());
        let mut friendly = format!("💻 System: {os} ({bits})\n⚙️ Processor: {cpu_line}");
        if let Some(total) = info["ram"]["total_gb"].as_f64() {
            friendly.push_str(&format!("\n🧠 RAM: {total:.1} GB"));
        }

        Ok(ToolReport::ok().friendly(friendly).with("output", info))
    }

    /// The current local time, formatted.
    pub fn time(&self) -> ToolResult {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(ToolReport::ok()
            .friendly(format!("🕒 Current Time: {now}"))
            .with("output", now))
    }
}

/// Turn whatever reached `open_url` into something a browser can load.
fn resolve_url(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();

    // 1. Known site names map directly.
    if let Some((_, url)) = URL_MAP.iter().find(|(name, _)| *name == lower) {
        return (*url).to_string();
    }

    // 2. Raw text like "amazon search iphone": recover the search.
    if lower.contains("search") {
        for (site, template) in SEARCH_TEMPLATES {
            if lower.contains(site) {
                let query: String = lower
                    .split_whitespace()
                    .filter(|w| *w != *site && !["search", "for", "on"].contains(w))
                    .collect::<Vec<_>>()
                    .join("+");
                return template.replace("{}", &query);
            }
        }
    }

    // 3. "play X on youtube" style.
    if lower.contains("play") && lower.contains("youtube") {
        let query: String = lower
            .split_whitespace()
            .filter(|w| !["play", "on", "youtube"].contains(w))
            .collect::<Vec<_>>()
            .join("+");
        return format!("https://www.youtube.com/results?search_query={query}");
    }

    // 4. Already a URL.
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return raw.trim().to_string();
    }

    // 5. A bare domain.
    if lower.contains('.') {
        return format!("https://{}", raw.trim());
    }

    // 6. Last resort: guess the .com.
    format!("https://{lower}.com")
}

/// "https://www.amazon.in/s?k=x" → "Amazon".
fn friendly_site_name(url: &str) -> String {
    let domain = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("");
    let name = domain.trim_start_matches("www.").split('.').next().unwrap_or(domain);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Resolve a creation path: absolute stays, relative lands on Desktop/home.
fn resolve_creation_path(path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        paths::desktop_or_home().join(p)
    }
}

fn launch_opener(target: &str) -> std::io::Result<()> {
    if cfg!(windows) {
        Command::new("cmd").args(["/C", "start", "", target]).spawn()?;
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(target).spawn()?;
    } else {
        Command::new("xdg-open").arg(target).spawn()?;
    }
    Ok(())
}

fn launch_app(target: &str) -> std::io::Result<()> {
    if cfg!(windows) {
        Command::new("cmd").args(["/C", "start", "", target]).spawn()?;
    } else if cfg!(target_os = "macos") {
        Command::new("open").args(["-a", target]).spawn()?;
    } else {
        Command::new(target).spawn()?;
    }
    Ok(())
}

fn launch_terminal(dir: &Path) -> std::io::Result<()> {
    if cfg!(windows) {
        Command::new("cmd")
            .args(["/C", "start", "cmd", "/K"])
            .arg(format!("cd /d {}", dir.display()))
            .spawn()?;
    } else if cfg!(target_os = "macos") {
        Command::new("open").args(["-a", "Terminal"]).arg(dir).spawn()?;
    } else {
        Command::new("gnome-terminal")
            .arg("--working-directory")
            .arg(dir)
            .spawn()?;
    }
    Ok(())
}

/// First `model name` line from `/proc/cpuinfo`, Linux only.
fn proc_cpu_model() -> Option<String> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    cpuinfo
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split(':').nth(1))
        .map(|s| s.trim().to_string())
}

/// (total, available) memory in GB from `/proc/meminfo`, Linux only.
fn proc_memory_gb() -> Option<(f64, f64)> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    let field = |key: &str| -> Option<f64> {
        meminfo
            .lines()
            .find(|l| l.starts_with(key))?
            .split_whitespace()
            .nth(1)?
            .parse::<f64>()
            .ok()
            .map(|kb| (kb / (1024.0 * 1024.0) * 100.0).round() / 100.0)
    };
    Some((field("MemTotal:")?, field("MemAvailable:")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_site() {
        assert_eq!(resolve_url("github"), "https://github.com");
        assert_eq!(resolve_url("gmail"), "https://mail.google.com");
    }

    #[test]
    fn resolve_embedded_search() {
        assert_eq!(
            resolve_url("amazon search iphone"),
            "https://www.amazon.in/s?k=iphone"
        );
    }

    #[test]
    fn resolve_play_on_youtube() {
        assert_eq!(
            resolve_url("play lofi beats on youtube"),
            "https://www.youtube.com/results?search_query=lofi+beats"
        );
    }

    #[test]
    fn resolve_passthrough_and_guesses() {
        assert_eq!(resolve_url("https://example.org/x"), "https://example.org/x");
        assert_eq!(resolve_url("example.org"), "https://example.org");
        assert_eq!(resolve_url("figma"), "https://figma.com");
    }

    #[test]
    fn friendly_name_from_url() {
        assert_eq!(friendly_site_name("https://www.amazon.in/s?k=x"), "Amazon");
        assert_eq!(friendly_site_name("https://github.com"), "Github");
    }

    #[test]
    fn create_file_and_folder_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let control = SystemControl::new();

        let file = dir.path().join("deep/nested/note.txt");
        let report = control
            .create_file(&file.display().to_string(), "hello")
            .unwrap();
        assert!(report.success, "{:?}", report.error);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
        assert_eq!(
            report.friendly_message.as_deref(),
            Some("✅ File created: note.txt")
        );

        let folder = dir.path().join("projects/demo");
        let report = control.create_folder(&folder.display().to_string()).unwrap();
        assert!(report.success);
        assert!(folder.is_dir());
    }

    #[test]
    fn create_file_into_existing_dir_gets_default_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let control = SystemControl::new();
        let report = control
            .create_file(&dir.path().display().to_string(), "")
            .unwrap();
        assert!(report.success);
        assert!(dir.path().join("new_file.txt").exists());
    }

    #[test]
    fn explorer_rejects_missing_path() {
        let control = SystemControl::new();
        let report = control.open_explorer("/definitely/not/a/path").unwrap();
        assert!(!report.success);
        assert!(report.error.unwrap().contains("does not exist"));
    }

    #[test]
    fn time_is_formatted() {
        let report = SystemControl::new().time().unwrap();
        assert!(report.success);
        let time = report.data["output"].as_str().unwrap();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(time.len(), 19);
        assert_eq!(&time[4..5], "-");
    }

    #[test]
    fn system_info_always_reports_os() {
        let report = SystemControl::new().system_info().unwrap();
        assert!(report.success);
        assert!(!report.data["output"]["system"].as_str().unwrap().is_empty());
        assert!(report.friendly_message.unwrap().contains("System"));
    }
}
