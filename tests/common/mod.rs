//! Shared helpers for driving the `complete-integrations` binary.

use std::path::Path;
use std::process::{Command, Output};

/// LM command that ignores its prompt and answers with fixed text.
pub const FIXED_LM: &str = "sh -c 'cat >/dev/null; echo generated description'";

/// LM command that fails like an exhausted API quota.
pub const FAILING_LM: &str = "sh -c 'cat >/dev/null; echo quota exceeded >&2; exit 1'";

pub const GMAIL_CATALOG: &str = "\
- name: Gmail
  tools:
  - name: send_email
    arg_schena:
    - name: to
      description: recipient address
";

const CONFIG_VARS: &[&str] = &[
    "INTEGRATIONS_LM_COMMAND",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "INTEGRATIONS_LM_MODEL",
    "INTEGRATIONS_LM_TIMEOUT_SECS",
    "INTEGRATIONS_LM_VERBOSE",
    "INTEGRATIONS_LM_LOG",
    "RUST_LOG",
];

/// Run the binary in `cwd` with a clean configuration plus `envs`.
pub fn run_cli(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_complete-integrations"));
    command.current_dir(cwd).args(args);
    for var in CONFIG_VARS {
        command.env_remove(var);
    }
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("spawn complete-integrations")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Names of the entries directly under `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
