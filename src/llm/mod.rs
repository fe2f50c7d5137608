//! Ollama client for optional natural language inference.
//!
//! The LLM is used **only** best-effort: intent inference, question answering,
//! and email drafting all carry deterministic fallbacks and keep working when
//! no model is reachable. Nothing in the pipeline fails because this client is
//! absent, slow, or returns garbage.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the LLM subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    #[error("LLM endpoint is not available at {url}")]
    #[diagnostic(
        code(deskpilot::llm::unavailable),
        help("Start Ollama with `ollama serve`, or run with --no-llm to use pattern-only resolution.")
    )]
    Unavailable { url: String },

    #[error("LLM request failed: {message}")]
    #[diagnostic(
        code(deskpilot::llm::request_failed),
        help("Check that the endpoint is running and the model is pulled.")
    )]
    RequestFailed { message: String },

    #[error("failed to parse LLM response: {message}")]
    #[diagnostic(
        code(deskpilot::llm::parse_error),
        help("The model returned an unexpected response format.")
    )]
    ParseError { message: String },
}

/// Configuration for the LLM client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether to use the LLM at all. `false` forces pattern-only resolution.
    pub enabled: bool,
    /// Base URL for the Ollama-style API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
            timeout_secs: 30,
        }
    }
}

/// Client for an Ollama-style REST API, synchronous via `ureq`.
pub struct LlmClient {
    config: LlmConfig,
    available: bool,
}

impl LlmClient {
    /// Create a new client. Call [`probe`](Self::probe) before first use;
    /// until then the client reports itself unavailable.
    pub fn new(config: LlmConfig) -> Self {
        Self { config, available: false }
    }

    /// Probe the server with a lightweight request to `/api/tags`.
    ///
    /// A disabled client never probes and stays unavailable.
    pub fn probe(&mut self) -> bool {
        if !self.config.enabled {
            self.available = false;
            return false;
        }

        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build();

        self.available = match agent.get(&url).call() {
            Ok(resp) => resp.status() == 200,
            Err(_) => false,
        };
        self.available
    }

    /// Whether the endpoint answered the last probe.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Generate a completion from a prompt.
    pub fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        if !self.available {
            return Err(LlmError::Unavailable {
                url: self.config.base_url.clone(),
            });
        }

        let url = format!("{}/api/generate", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });

        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys.to_string());
        }

        let body_str = serde_json::to_string(&body).map_err(|e| LlmError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| LlmError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| LlmError::ParseError {
                message: e.to_string(),
            })?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| LlmError::ParseError {
                message: "missing 'response' field".into(),
            })
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("available", &self.available)
            .finish()
    }
}
