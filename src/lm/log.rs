//! LM invocation log.
//!
//! When enabled, every generation call appends one line of JSON to the log
//! file so a run can be audited after the fact:
//!
//! ```jsonl
//! {"schema_version":1,"ts":1707900000000,"kind":"integration_description","subject":"Gmail",...}
//! {"schema_version":1,"ts":1707900002100,"kind":"tool_description","subject":"Gmail/send_email",...}
//! ```
use super::LmInvocationKind;
use crate::util::{now_epoch_ms, truncate_string};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const LM_LOG_SCHEMA_VERSION: u32 = 1;

const PROMPT_PREVIEW_BYTES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LmOutcome {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmLogEntry {
    pub schema_version: u32,

    /// Unix timestamp in milliseconds when the call finished.
    pub ts: u64,

    pub kind: LmInvocationKind,

    /// Integration name, or `integration/tool` for tool descriptions.
    pub subject: String,

    pub model: String,

    pub duration_ms: u64,

    pub outcome: LmOutcome,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prompt_preview: Option<String>,
}

/// Builder that times a call from construction to `success`/`failed`.
pub struct LmLogBuilder {
    start: Instant,
    kind: LmInvocationKind,
    subject: String,
    model: String,
    prompt_preview: Option<String>,
}

impl LmLogBuilder {
    pub fn new(
        kind: LmInvocationKind,
        subject: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            start: Instant::now(),
            kind,
            subject: subject.into(),
            model: model.into(),
            prompt_preview: None,
        }
    }

    pub fn with_prompt_preview(mut self, prompt: &str) -> Self {
        let mut preview = truncate_string(prompt, PROMPT_PREVIEW_BYTES);
        if preview.len() < prompt.len() {
            preview.push_str("...");
        }
        self.prompt_preview = Some(preview);
        self
    }

    pub fn success(self) -> LmLogEntry {
        self.build(LmOutcome::Success, None)
    }

    pub fn failed(self, error: impl Into<String>) -> LmLogEntry {
        self.build(LmOutcome::Failed, Some(error.into()))
    }

    fn build(self, outcome: LmOutcome, error: Option<String>) -> LmLogEntry {
        LmLogEntry {
            schema_version: LM_LOG_SCHEMA_VERSION,
            ts: now_epoch_ms(),
            kind: self.kind,
            subject: self.subject,
            model: self.model,
            duration_ms: self.start.elapsed().as_millis() as u64,
            outcome,
            error,
            prompt_preview: self.prompt_preview,
        }
    }
}

/// Append-only JSONL sink.
#[derive(Debug, Clone)]
pub struct LmLog {
    path: PathBuf,
}

impl LmLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LmLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open lm log for append: {}", self.path.display()))?;
        let line = serde_json::to_string(entry).context("serialize lm log entry")?;
        writeln!(file, "{line}").context("write lm log entry")?;
        Ok(())
    }
}
