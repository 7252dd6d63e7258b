//! Run configuration resolved from the environment.
//!
//! The CLI only carries paths, so backend selection, model, and logging
//! settings are read here once and passed down explicitly.
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const LM_COMMAND_ENV: &str = "INTEGRATIONS_LM_COMMAND";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "INTEGRATIONS_LM_MODEL";
pub const TIMEOUT_ENV: &str = "INTEGRATIONS_LM_TIMEOUT_SECS";
pub const VERBOSE_ENV: &str = "INTEGRATIONS_LM_VERBOSE";
pub const LM_LOG_ENV: &str = "INTEGRATIONS_LM_LOG";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which text-generation backend handles the description prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Local command fed the prompt on stdin.
    Command { command: String },
    /// OpenAI-compatible chat completions endpoint.
    OpenAi {
        api_key: String,
        base_url: String,
        timeout: Duration,
    },
}

/// Settings shared by every generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Model identifier sent with each request.
    pub model: String,
    /// Print prompt/response transcripts to stderr.
    pub verbose: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub backend: BackendConfig,
    pub generator: GeneratorConfig,
    /// JSONL file that receives one entry per LM call.
    pub lm_log: Option<PathBuf>,
}

/// Resolve configuration from the process environment.
pub fn load_config() -> Result<EnrichConfig> {
    resolve_config(env_lookup)
}

/// Process environment as a config lookup.
pub fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Resolve configuration through `lookup`; blank values count as unset.
///
/// The command backend wins when both a command and an API key are present.
pub fn resolve_config(lookup: impl Fn(&str) -> Option<String>) -> Result<EnrichConfig> {
    let get = |key: &str| lookup_value(&lookup, key);

    let backend = if let Some(command) = get(LM_COMMAND_ENV) {
        validate_command(&command)?;
        BackendConfig::Command { command }
    } else {
        let api_key = get(API_KEY_ENV).ok_or_else(|| {
            anyhow!("no LM backend configured: set {LM_COMMAND_ENV} or {API_KEY_ENV}")
        })?;
        let base_url = get(BASE_URL_ENV)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match get(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        BackendConfig::OpenAi {
            api_key,
            base_url,
            timeout,
        }
    };

    let generator = GeneratorConfig {
        model: get(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        verbose: verbose_requested(&lookup),
    };

    Ok(EnrichConfig {
        backend,
        generator,
        lm_log: get(LM_LOG_ENV).map(PathBuf::from),
    })
}

/// Whether verbose transcripts were requested, without resolving a backend.
///
/// Logging is initialized before the backend so configuration errors are
/// still reported through it.
pub fn verbose_requested(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup_value(&lookup, VERBOSE_ENV).is_some_and(|value| parse_flag(&value))
}

fn lookup_value(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_command(command: &str) -> Result<()> {
    let args = shell_words::split(command)
        .with_context(|| format!("parse {LM_COMMAND_ENV}: {command}"))?;
    if args.is_empty() {
        return Err(anyhow!("{LM_COMMAND_ENV} is empty"));
    }
    Ok(())
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("parse {TIMEOUT_ENV} (got {raw:?})"))?;
    if secs == 0 {
        return Err(anyhow!("{TIMEOUT_ENV} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
