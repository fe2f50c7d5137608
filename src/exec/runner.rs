//! Step runner: sequential fail-fast execution and result aggregation.
//!
//! One command produces one [`CommandResult`]. Steps run strictly in order
//! because later steps may depend on earlier side effects; the first failed
//! step halts the rest of the plan. Nothing is retried and nothing is rolled
//! back.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::action::Action;
use crate::config::AssistantConfig;
use crate::exec::{Dispatcher, ExecutionOutcome};
use crate::intent::Intent;
use crate::intent::llm::LlmIntentResolver;
use crate::llm::LlmClient;

/// One executed step: the action in wire shape plus its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    #[serde(flatten)]
    pub step: Action,
    pub result: ExecutionOutcome,
}

/// Aggregate result of one pipeline invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub intent: Intent,
    /// May be shorter than `intent.steps`: execution stops at the first
    /// failure.
    pub step_results: Vec<StepResult>,
    pub overall_success: bool,
    pub requires_confirmation: bool,
    pub friendly_response: String,
    pub execution_time_seconds: f64,
}

/// The pipeline entry point: resolver + dispatcher, created once per process
/// and reused across invocations.
pub struct Agent {
    resolver: LlmIntentResolver,
    dispatcher: Dispatcher,
}

impl Agent {
    /// Build the full pipeline. Probes the LLM endpoint once; when it is
    /// unreachable (or disabled) every resolution takes the pattern path.
    pub fn new(config: AssistantConfig) -> Self {
        let mut client = LlmClient::new(config.llm.clone());
        if client.probe() {
            tracing::info!(model = %client.model(), "LLM available for intent parsing");
        } else {
            tracing::info!("LLM unavailable, using pattern-based intent parsing");
        }
        let client = Arc::new(client);

        Self {
            resolver: LlmIntentResolver::new(client.clone()),
            dispatcher: Dispatcher::new(&config, client),
        }
    }

    /// Process a natural-language command end to end.
    pub fn process(&self, command: &str) -> CommandResult {
        let intent = self.resolver.resolve(command);
        self.run_intent(command, intent)
    }

    /// Execute an already-resolved intent. Exposed separately so callers can
    /// run plans from other sources (tests, replayed jobs).
    pub fn run_intent(&self, command: &str, intent: Intent) -> CommandResult {
        let started = Instant::now();
        tracing::debug!(intent = %intent.intent, steps = intent.steps.len(), "executing plan");

        let mut step_results = Vec::new();
        let mut friendly_parts: Vec<String> = Vec::new();
        let mut overall_success = true;

        for step in &intent.steps {
            let outcome = self.dispatcher.execute(step);

            if let Some(message) = collect_message(&outcome) {
                friendly_parts.push(message);
            }

            let failed = !outcome.success;
            step_results.push(StepResult {
                step: step.clone(),
                result: outcome,
            });
            if failed {
                overall_success = false;
                break;
            }
        }

        let execution_time_seconds =
            (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;

        let mut friendly_response = if !friendly_parts.is_empty() {
            friendly_parts.join("\n")
        } else if overall_success {
            "✅ Command executed successfully.".to_string()
        } else {
            "❌ Command failed to execute completely.".to_string()
        };
        friendly_response.push_str(&format!("\n\n(Executed in {execution_time_seconds}s)"));

        CommandResult {
            command: command.to_string(),
            requires_confirmation: intent.confirmation_required,
            intent,
            step_results,
            overall_success,
            friendly_response,
            execution_time_seconds,
        }
    }

    /// The shell whitelist, for the CLI's capability listing.
    pub fn shell_commands(&self) -> Vec<&'static str> {
        self.dispatcher.shell_commands()
    }
}

/// A step's human-facing line: `friendly_message`, else `message`.
fn collect_message(outcome: &ExecutionOutcome) -> Option<String> {
    let Some(Value::Object(map)) = &outcome.output else {
        return None;
    };
    map.get("friendly_message")
        .or_else(|| map.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_in(dir: &std::path::Path) -> Agent {
        let mut config = AssistantConfig {
            workdir: dir.to_path_buf(),
            ..Default::default()
        };
        config.llm.enabled = false;
        Agent::new(config)
    }

    #[test]
    fn fail_fast_stops_after_failing_step() {
        let dir = tempfile::TempDir::new().unwrap();
        let agent = agent_in(dir.path());

        let intent = Intent::new(
            "test_plan",
            vec![
                Action::GetTime,
                Action::RunShell {
                    command: "rm -rf /".into(),
                },
                Action::GetTime,
            ],
        );
        let result = agent.run_intent("three step plan", intent);

        assert_eq!(result.step_results.len(), 2);
        assert!(!result.overall_success);
        assert!(result.step_results[0].result.success);
        assert!(!result.step_results[1].result.success);
    }

    #[test]
    fn friendly_messages_join_with_newlines() {
        let dir = tempfile::TempDir::new().unwrap();
        let agent = agent_in(dir.path());

        let intent = Intent::new("test_plan", vec![Action::GetTime, Action::GetTime]);
        let result = agent.run_intent("times two", intent);

        assert!(result.overall_success);
        let lines: Vec<&str> = result.friendly_response.lines().collect();
        assert!(lines[0].starts_with("🕒"));
        assert!(lines[1].starts_with("🕒"));
        assert!(result.friendly_response.contains("(Executed in"));
    }

    #[test]
    fn execution_time_is_rounded() {
        let dir = tempfile::TempDir::new().unwrap();
        let agent = agent_in(dir.path());
        let result = agent.process("what time is it");
        let scaled = result.execution_time_seconds * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
