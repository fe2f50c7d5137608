//! Intent model and the two-stage resolver pipeline.
//!
//! A raw command resolves to an [`Intent`]: the classified intent name plus an
//! ordered, non-empty execution plan. Resolution is two-stage — best-effort
//! LLM inference ([`llm::LlmIntentResolver`]) backed by the deterministic
//! [`pattern::PatternResolver`], which covers every supported intent on its
//! own and never fails.

pub mod deeplink;
pub mod llm;
pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Structured representation of what a command asks for.
///
/// Invariant: `steps` is never empty for a resolved command. When no
/// filename or parameter can be extracted, resolvers substitute a single
/// [`Action::AnswerQuestion`] step carrying a clarification message instead
/// of returning an empty plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Classified intent name (e.g. `summarize_file`, `open_url`).
    pub intent: String,
    /// What the command targets: a filename, query, resource name.
    #[serde(default)]
    pub target: Option<String>,
    /// Ordered execution plan.
    pub steps: Vec<Action>,
    /// Whether the caller should confirm before executing side effects.
    #[serde(default)]
    pub confirmation_required: bool,
    /// Assumptions the resolver made.
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Set when the resolver needs more information from the user.
    #[serde(default)]
    pub clarification_question: Option<String>,
}

impl Intent {
    /// Create an intent with the given name and plan.
    pub fn new(intent: impl Into<String>, steps: Vec<Action>) -> Self {
        Self {
            intent: intent.into(),
            target: None,
            steps,
            confirmation_required: false,
            assumptions: Vec::new(),
            clarification_question: None,
        }
    }

    /// Set the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Require confirmation before execution.
    pub fn with_confirmation(mut self) -> Self {
        self.confirmation_required = true;
        self
    }

    /// Record an assumption.
    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    /// Attach a clarification question.
    pub fn with_clarification(mut self, question: impl Into<String>) -> Self {
        self.clarification_question = Some(question.into());
        self
    }
}
