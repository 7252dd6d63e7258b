//! CLI argument parsing for the catalog enrichment run.
//!
//! The surface is positional only; backend selection and model settings come
//! from the environment (see `config`).
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "complete-integrations",
    version,
    about = "Generate descriptions for integrations and their tools in a YAML catalog",
    after_help = "Environment:\n  INTEGRATIONS_LM_COMMAND       Local LM command (prompt on stdin, text on stdout)\n  OPENAI_API_KEY                API key for the OpenAI-compatible backend\n  OPENAI_BASE_URL               API base URL (default https://api.openai.com/v1)\n  INTEGRATIONS_LM_MODEL         Model identifier (default gpt-4)\n  INTEGRATIONS_LM_TIMEOUT_SECS  HTTP timeout in seconds (default 120)\n  INTEGRATIONS_LM_VERBOSE       Print prompt/response transcripts to stderr\n  INTEGRATIONS_LM_LOG           Append a JSONL record of every LM call\n\nExamples:\n  complete-integrations integrations.yaml\n  complete-integrations integrations.yaml integrations.out.yaml"
)]
pub struct RootArgs {
    /// YAML catalog to enrich
    #[arg(value_name = "INPUT_YAML")]
    pub input: PathBuf,

    /// Where to write the enriched catalog (stdout when omitted)
    #[arg(value_name = "OUTPUT_YAML")]
    pub output: Option<PathBuf>,
}
