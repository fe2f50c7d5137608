//! End-to-end integration tests for the deskpilot pipeline.
//!
//! These exercise the full path from raw command text through intent
//! resolution, dispatch, and aggregation, with the LLM disabled so every
//! resolution is deterministic.

use deskpilot::action::Action;
use deskpilot::config::AssistantConfig;
use deskpilot::exec::runner::Agent;
use deskpilot::intent::Intent;
use deskpilot::intent::pattern::PatternResolver;

fn agent_in(dir: &std::path::Path) -> Agent {
    let mut config = AssistantConfig {
        workdir: dir.to_path_buf(),
        ..Default::default()
    };
    config.llm.enabled = false;
    Agent::new(config)
}

#[test]
fn read_txt_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("uploads")).unwrap();
    std::fs::write(
        dir.path().join("uploads/notes.txt"),
        "remember to water the plants",
    )
    .unwrap();

    let agent = agent_in(dir.path());
    let result = agent.process("read notes.txt");

    assert!(result.overall_success);
    assert_eq!(result.intent.intent, "read_file");
    assert_eq!(result.step_results.len(), 1);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert_eq!(output["content"], "remember to water the plants");
    assert_eq!(output["file_type"], "TXT");
}

#[test]
fn missing_file_stops_the_summarize_plan() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    // Two steps resolved, but the read fails, so the summarize never runs.
    let result = agent.process("summarize my notes.txt file");
    assert_eq!(result.intent.steps.len(), 2);
    assert_eq!(result.step_results.len(), 1);
    assert!(!result.overall_success);
    assert!(result.friendly_response.contains("(Executed in"));
}

#[test]
fn question_command_succeeds_with_answer() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("why is the sky blue");
    assert!(result.overall_success);
    assert_eq!(result.intent.intent, "general_qa");
    assert!(!result.requires_confirmation);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert_eq!(output["answer_type"], "fallback");
}

#[test]
fn clarification_when_no_filename() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("summarize");
    assert!(result.overall_success);
    assert!(result.intent.clarification_question.is_some());
    assert_eq!(result.step_results.len(), 1);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert!(
        output["question"]
            .as_str()
            .unwrap()
            .contains("Please specify which file")
    );
}

#[test]
fn dangerous_shell_command_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let intent = Intent::new(
        "run_shell_command",
        vec![Action::RunShell {
            command: "rm -rf /".into(),
        }],
    )
    .with_confirmation();
    let result = agent.run_intent("run rm -rf /", intent);

    assert!(!result.overall_success);
    assert!(result.requires_confirmation);
    assert!(
        result.step_results[0]
            .result
            .error
            .as_ref()
            .unwrap()
            .contains("not whitelisted")
    );
}

#[cfg(unix)]
#[test]
fn whitelisted_shell_command_runs_in_workdir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("run ls");
    assert!(result.overall_success, "{}", result.friendly_response);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert!(output["output"].as_str().unwrap().contains("marker.txt"));
}

#[test]
fn create_file_via_dispatcher_with_absolute_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let target = dir.path().join("todo.txt");
    let intent = Intent::new(
        "create_file",
        vec![Action::CreateFile {
            path: target.display().to_string(),
            content: String::new(),
        }],
    );
    let result = agent.run_intent("create file todo.txt", intent);

    assert!(result.overall_success);
    assert!(target.exists());
    assert!(result.friendly_response.contains("File created: todo.txt"));
}

#[test]
fn deep_link_resolution_end_to_end_shape() {
    // Resolution only: executing would open a browser.
    let resolver = PatternResolver::new();
    let intent = resolver.resolve("search iphone on amazon");
    assert_eq!(intent.intent, "open_url");
    assert_eq!(
        intent.steps,
        vec![Action::OpenUrl {
            url: "https://www.amazon.in/s?k=iphone".into()
        }]
    );
}

#[test]
fn unrecognized_step_still_yields_success() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let intent: Intent = serde_json::from_str(
        r#"{"intent": "mystery", "steps": [{"action": "defragment_soul", "params": {}}]}"#,
    )
    .unwrap();
    let result = agent.run_intent("do the mystery thing", intent);

    assert!(result.overall_success);
    assert_eq!(result.step_results.len(), 1);
}

#[test]
fn search_and_time_pipeline() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("report-2026.txt"), "q3").unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("find report");
    assert!(result.overall_success);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert_eq!(output["result_count"], 1);

    let result = agent.process("what time is it");
    assert!(result.overall_success);
    assert!(result.friendly_response.contains("🕒"));
}

#[test]
fn email_draft_requires_confirmation() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("draft an email to the team");
    assert!(result.overall_success);
    assert!(result.requires_confirmation);
    let output = result.step_results[0].result.output.as_ref().unwrap();
    assert_eq!(output["generated_with"], "template");
    assert_eq!(output["recipient"], "team@company.com");
}

#[test]
fn command_result_serializes_with_wire_steps() {
    let dir = tempfile::TempDir::new().unwrap();
    let agent = agent_in(dir.path());

    let result = agent.process("what time is it");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["command"], "what time is it");
    assert_eq!(json["intent"]["intent"], "get_time");
    assert_eq!(json["step_results"][0]["action"], "get_time");
    assert_eq!(json["step_results"][0]["result"]["success"], true);
}
