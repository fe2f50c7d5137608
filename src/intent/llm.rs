//! Inference-backed intent resolution with unconditional pattern fallback.
//!
//! Wraps the LLM client in a strict best-effort policy: on a missing or
//! unreachable endpoint, on any call failure, on a response without a
//! parseable JSON object, or on a parsed intent with an empty plan, the
//! resolver silently delegates to [`PatternResolver`]. It never fails and
//! never surfaces inference problems to its caller.

use std::sync::Arc;

use crate::intent::Intent;
use crate::intent::pattern::PatternResolver;
use crate::llm::{LlmClient, LlmError};

/// Instruction template for the inference stage. Enumerates the closed action
/// vocabulary and the routing rules; the only contract on the response is
/// "JSON object with intent/target/steps keys, else fallback".
const SYSTEM_PROMPT: &str = "\
You are an intent parser for a desktop assistant. Analyze the user's command \
and return ONLY a JSON object, no other text.

Capabilities:
1. Open URLs/Apps: \"open gemini\", \"open youtube\", \"open calculator\"
2. Search/Deep links: \"search iphone on amazon\" -> open_url with the search URL
3. File ops: \"create folder projects/test\" -> create_folder, \"read notes.txt\" -> read_file
4. Terminal: \"open terminal\" -> open_terminal
5. Q&A: \"explain ML\" -> answer_question
6. System: \"system info\" -> get_system_info, \"what time is it\" -> get_time

Known actions: read_file, summarize, generate_email, run_shell, \
answer_question, search_files, open_url, open_app, open_explorer, \
create_file, create_folder, open_terminal, get_system_info, get_time.

Rules:
- If the command is \"Ask Gemini...\", \"Ask ChatGPT...\", \"Search on Google...\", \
ALWAYS use open_url with the search URL, never answer_question.
- For \"search X on Y\", construct the search URL.
- For file paths, keep them exactly as written (preserve casing and slashes).

JSON format:
{\"intent\": \"action_name\", \"target\": \"target_name\", \
\"steps\": [{\"action\": \"action_name\", \"params\": {}}]}";

/// Two-stage resolver: LLM inference first, deterministic patterns always
/// ready behind it.
#[derive(Debug)]
pub struct LlmIntentResolver {
    client: Arc<LlmClient>,
    fallback: PatternResolver,
}

impl LlmIntentResolver {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self {
            client,
            fallback: PatternResolver::new(),
        }
    }

    /// Resolve a command. Never fails.
    pub fn resolve(&self, command: &str) -> Intent {
        if !self.client.is_available() {
            return self.fallback.resolve(command);
        }

        match self.try_infer(command) {
            Ok(intent) if !intent.steps.is_empty() => intent,
            Ok(_) => {
                tracing::debug!("inference returned an empty plan, using pattern resolver");
                self.fallback.resolve(command)
            }
            Err(e) => {
                tracing::debug!(error = %e, "intent inference failed, using pattern resolver");
                self.fallback.resolve(command)
            }
        }
    }

    fn try_infer(&self, command: &str) -> Result<Intent, LlmError> {
        let prompt = format!("Command: \"{command}\"");
        let response = self.client.generate(&prompt, Some(SYSTEM_PROMPT))?;

        let json = extract_json_object(&response).ok_or_else(|| LlmError::ParseError {
            message: "no JSON object found in response".into(),
        })?;

        serde_json::from_str(json).map_err(|e| LlmError::ParseError {
            message: format!("intent JSON did not match expected shape: {e}"),
        })
    }
}

/// The slice from the first `{` to the last `}` in the response, if any.
/// Models wrap JSON in prose and code fences; this cuts through both.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
