//! Question answering: LLM with canned fallbacks. Always succeeds.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::tools::{ToolReport, ToolResult};

const ANSWER_SYSTEM_PROMPT: &str = "\
You are a desktop assistant. Answer the user's question directly and \
helpfully, without disclaimers about real-time data. For technical questions, \
give detailed technical answers. Be informative, not evasive.";

/// Answers questions conversationally, with deterministic fallbacks when no
/// model is reachable.
#[derive(Debug)]
pub struct Answerer {
    llm: Arc<LlmClient>,
}

impl Answerer {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Answer a question. This never fails: an unreachable model downgrades
    /// to a canned response.
    pub fn answer(&self, question: &str) -> ToolResult {
        if self.llm.is_available() {
            match self.llm.generate(question, Some(ANSWER_SYSTEM_PROMPT)) {
                Ok(text) => {
                    let answer = text.trim().to_string();
                    return Ok(ToolReport::ok()
                        .friendly(answer.clone())
                        .with("answer", answer)
                        .with("question", question)
                        .with("answer_type", "ai_generated")
                        .with("is_conversational", true));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "LLM answer failed, using canned response");
                }
            }
        }

        let answer = canned_answer(question);
        Ok(ToolReport::ok()
            .friendly(answer.clone())
            .with("answer", answer)
            .with("question", question)
            .with("answer_type", "fallback")
            .with("is_conversational", true))
    }
}

/// Deterministic responses for the question families worth special-casing.
fn canned_answer(question: &str) -> String {
    let lower = question.to_lowercase();

    if lower.contains("hello") {
        return "👋 Hello! I'm your desktop assistant. How can I help you?".into();
    }
    if lower.contains("hi") {
        return "👋 Hi! What can I do for you?".into();
    }
    if ["joke", "funny", "laugh", "humor"].iter().any(|w| lower.contains(w)) {
        return "Here's a joke: Why don't eggs tell jokes? They'd crack each other up!".into();
    }
    if ["time", "clock", "what time"].iter().any(|w| lower.contains(w)) {
        return "I can't access real-time information here, but try asking me for the current time directly.".into();
    }
    if ["weather", "temperature"].iter().any(|w| lower.contains(w)) {
        return "I don't have weather access. I can open a weather website for you.".into();
    }
    if ["model", "version", "what are you"].iter().any(|w| lower.contains(w)) {
        return "I'm a desktop assistant. I help with files, emails, commands, and opening apps and websites.".into();
    }

    "I can help with that. I can assist with files, emails, commands, opening websites and apps, and more.".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;

    fn answerer() -> Answerer {
        Answerer::new(Arc::new(LlmClient::new(LlmConfig::default())))
    }

    #[test]
    fn always_succeeds_without_llm() {
        let report = answerer().answer("explain monads").unwrap();
        assert!(report.success);
        assert_eq!(report.data["answer_type"], "fallback");
        assert!(report.friendly_message.is_some());
    }

    #[test]
    fn greeting_gets_a_greeting() {
        let report = answerer().answer("hello").unwrap();
        assert!(report.data["answer"].as_str().unwrap().contains("Hello"));
    }

    #[test]
    fn joke_family() {
        let answer = canned_answer("tell me a joke");
        assert!(answer.contains("joke"));
    }

    #[test]
    fn self_description() {
        let answer = canned_answer("what are you");
        assert!(answer.contains("desktop assistant"));
    }
}
