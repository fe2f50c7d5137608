//! File reading and summarization: plaintext and PDF only.
//!
//! Any other extension is rejected before the file is touched. Relative paths
//! resolve against the assistant's working directory so the `uploads/<name>`
//! convention works regardless of where the process was started.

use std::path::{Path, PathBuf};

use crate::tools::{ToolReport, ToolResult};

/// Word budget below which text is returned verbatim instead of summarized.
const PASSTHROUGH_WORDS: usize = 100;

/// Reads supported document formats and produces extractive summaries.
#[derive(Debug, Clone)]
pub struct FileReader {
    workdir: PathBuf,
}

impl FileReader {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    /// Read a `.txt` or `.pdf` file.
    pub fn read(&self, path: &str) -> ToolResult {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Ok(ToolReport::err(format!(
                "File not found: {}",
                resolved.display()
            )));
        }

        let extension = resolved
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => self.read_txt(&resolved),
            "pdf" => self.read_pdf(&resolved),
            other => Ok(ToolReport::err(format!(
                "Unsupported file format: .{other}. Supported: PDF, TXT"
            ))),
        }
    }

    fn read_txt(&self, path: &Path) -> ToolResult {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(ToolReport::err(format!(
                    "Error reading file: {e}"
                )));
            }
        };
        // Non-UTF-8 text files still get read, lossily.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let words = content.split_whitespace().count();

        Ok(ToolReport::ok()
            .friendly(format!("📄 Read {} (TXT, {words} words)", path.display()))
            .with("content", content)
            .with("file_type", "TXT"))
    }

    fn read_pdf(&self, path: &Path) -> ToolResult {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(ToolReport::err(format!(
                    "Error reading file: {e}"
                )));
            }
        };

        let text = match pdf_extract::extract_text_from_mem(&bytes) {
            Ok(text) => text,
            Err(e) => {
                return Ok(ToolReport::err(format!("Error reading file: {e}")));
            }
        };

        // pdf-extract inserts form feeds between pages.
        let page_count = text.matches('\x0C').count() + 1;
        let content = text.trim().to_string();

        Ok(ToolReport::ok()
            .friendly(format!(
                "📄 Read {} (PDF, {page_count} pages)",
                path.display()
            ))
            .with("content", content)
            .with("file_type", "PDF")
            .with("page_count", page_count))
    }

    /// Summarize text. `short` keeps the first 50 words, anything else 150;
    /// text at or under the passthrough budget is returned whole.
    pub fn summarize(&self, text: &str, style: &str) -> ToolResult {
        if text.trim().is_empty() {
            return Ok(ToolReport::err("No text provided for summarization"));
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let summary = if words.len() <= PASSTHROUGH_WORDS {
            text.to_string()
        } else {
            let take = if style == "short" { 50 } else { 150 };
            format!("{}...", words[..take].join(" "))
        };

        let summary_words = summary.split_whitespace().count();
        Ok(ToolReport::ok()
            .friendly(format!("📝 Summary: {summary}"))
            .with("summary", summary)
            .with("original_length", words.len())
            .with("summary_length", summary_words))
    }
}
