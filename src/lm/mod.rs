//! Text-generation backends.
//!
//! Every backend takes a system instruction plus a prompt and returns plain
//! text. Two are provided:
//!
//! - **OpenAI-compatible HTTP** (`openai`): chat completions over a blocking
//!   `ureq` agent.
//! - **Local command** (`command`): any tool that reads the prompt on stdin
//!   and writes the answer on stdout (`llm`, `ollama run`, scripts).
//!
//! Backends never retry; a failed call is returned to the caller as is.
mod command;
mod log;
mod openai;

pub use command::CommandBackend;
pub use log::{LmLog, LmLogBuilder};
pub use openai::OpenAiBackend;

use crate::config::BackendConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
}

/// Synchronous request/response text generation.
pub trait LmBackend {
    /// Generate text for `request`. Blocks until the backend answers.
    fn complete(&self, request: &LmRequest) -> Result<String>;

    /// Short backend label used in logs.
    fn name(&self) -> &'static str;
}

/// Kinds of LM invocations made while enriching a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LmInvocationKind {
    IntegrationDescription,
    ToolDescription,
}

impl std::fmt::Display for LmInvocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntegrationDescription => write!(f, "integration_description"),
            Self::ToolDescription => write!(f, "tool_description"),
        }
    }
}

/// Construct the backend selected by configuration.
pub fn build_backend(config: &BackendConfig) -> Box<dyn LmBackend> {
    match config {
        BackendConfig::Command { command } => Box::new(CommandBackend::new(command.clone())),
        BackendConfig::OpenAi {
            api_key,
            base_url,
            timeout,
        } => Box::new(OpenAiBackend::new(
            api_key.clone(),
            base_url.clone(),
            *timeout,
        )),
    }
}
