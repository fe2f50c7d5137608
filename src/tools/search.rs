//! Directory search: case-insensitive name matching with entry metadata.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::json;

use crate::tools::{ToolReport, ToolResult};

/// Cap on reported entries; the match count is still the full total.
const MAX_RESULTS: usize = 10;

/// Searches a single directory level for entries matching a query.
#[derive(Debug, Clone)]
pub struct FileSearcher {
    workdir: PathBuf,
}

impl FileSearcher {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    pub fn search(&self, query: &str, directory: &str) -> ToolResult {
        let dir = Path::new(directory);
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.workdir.join(dir)
        };

        let query_lower = query.to_lowercase();
        let mut results = Vec::new();
        let mut total = 0usize;

        // A directory that simply isn't there means zero matches, not an
        // error; only an actual read failure is reported as one.
        let entries = if dir.exists() {
            match std::fs::read_dir(&dir) {
                Ok(entries) => entries.flatten().collect::<Vec<_>>(),
                Err(e) => {
                    return Ok(ToolReport::err(format!("Search error: {e}"))
                        .with("results", json!([])));
                }
            }
        } else {
            Vec::new()
        };

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.to_lowercase().contains(&query_lower) {
                continue;
            }
            total += 1;
            if results.len() >= MAX_RESULTS {
                continue;
            }

            let path = entry.path();
            let meta = entry.metadata().ok();
            let kind = if path.is_dir() { "directory" } else { "file" };
            let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);
            let modified = meta
                .and_then(|m| m.modified().ok())
                .map(|t| DateTime::<Local>::from(t).to_rfc3339())
                .unwrap_or_default();

            results.push(json!({
                "name": name,
                "path": path.display().to_string(),
                "type": kind,
                "size": size,
                "modified": modified,
            }));
        }

        Ok(ToolReport::ok()
            .note(format!("Found {total} items matching '{query}'"))
            .with("query", query)
            .with("directory", dir.display().to_string())
            .with("results", json!(results))
            .with("result_count", total))
    }
}
