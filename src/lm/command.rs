//! Local LM command backend.
//!
//! The command line is split with shell-words and spawned per request. The
//! system instruction and prompt are written to stdin separated by a blank
//! line; stdout (trimmed) is the generated text. The requested model is
//! exported to the child as `INTEGRATIONS_LM_MODEL`.
use super::{LmBackend, LmRequest};
use crate::config::MODEL_ENV;
use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::time::Instant;

pub struct CommandBackend {
    command: String,
}

impl CommandBackend {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

impl LmBackend for CommandBackend {
    fn complete(&self, request: &LmRequest) -> Result<String> {
        let stdin_text = format!("{}\n\n{}\n", request.system, request.prompt);
        let text = invoke_lm_command(&self.command, &request.model, &stdin_text)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(anyhow!("LM command produced no output"));
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

fn invoke_lm_command(command: &str, model: &str, prompt: &str) -> Result<String> {
    let args =
        shell_words::split(command).with_context(|| format!("parse LM command: {command}"))?;
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("LM command is empty"))?;

    let start = Instant::now();
    let mut child = Command::new(program)
        .args(rest)
        .env(MODEL_ENV, model)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn LM command: {program}"))?;

    // A command may exit without reading its input; its exit status decides.
    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(prompt.as_bytes()) {
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("LM command closed stdin before reading the prompt");
            }
            result => result.context("write prompt to LM stdin")?,
        }
    }

    let output = child.wait_with_output().context("wait for LM command")?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::info!(
        backend = "command",
        elapsed_ms,
        prompt_bytes = prompt.len(),
        response_bytes = output.stdout.len(),
        "lm invoke complete"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "LM command failed with status {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8(output.stdout).context("decode LM stdout as UTF-8")
}
