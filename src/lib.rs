//! # deskpilot
//!
//! Desktop assistant core: routes free-text commands to a closed set of
//! side-effecting actions.
//!
//! ## Architecture
//!
//! - **Intent resolution** (`intent`): two-stage parsing — best-effort LLM
//!   inference backed by a deterministic pattern resolver that covers every
//!   supported intent on its own and never fails
//! - **Action vocabulary** (`action`): closed enum of supported actions with
//!   typed parameters; unknown inference-sourced names become an explicit
//!   `Unrecognized` variant instead of errors
//! - **Execution** (`exec`): exhaustive-match dispatcher over the tool
//!   collaborators, plus the fail-fast step runner and result aggregation
//! - **Tools** (`tools`): file reading, whitelisted shell, email drafting,
//!   directory search, system control, question answering
//!
//! ## Library usage
//!
//! ```no_run
//! use deskpilot::config::AssistantConfig;
//! use deskpilot::exec::runner::Agent;
//!
//! let agent = Agent::new(AssistantConfig::default());
//! let result = agent.process("summarize my notes.txt file");
//! println!("{}", result.friendly_response);
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod exec;
pub mod intent;
pub mod llm;
pub mod paths;
pub mod tools;
