//! Description generation for integrations and their tools.
//!
//! Prompts are assembled from the templates in `prompts/` and sent through the
//! configured backend. Generated text is returned as a plain `String`, so it
//! serializes as an ordinary YAML string.
use crate::catalog::{render_arguments, Argument};
use crate::config::GeneratorConfig;
use crate::lm::{LmBackend, LmInvocationKind, LmLog, LmLogBuilder, LmRequest};
use anyhow::{Context, Result};

const INTEGRATION_SYSTEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/integration_system.md"
));
const INTEGRATION_PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/integration_prompt.md"
));
const TOOL_SYSTEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/tool_system.md"
));
const TOOL_PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/tool_prompt.md"
));

/// Source of generated descriptions consumed by the enricher.
pub trait DescriptionGenerator {
    fn describe_integration(&mut self, integration: &str) -> Result<String>;

    fn describe_tool(
        &mut self,
        integration: &str,
        tool: &str,
        args: &[Argument],
    ) -> Result<String>;
}

/// A system instruction and user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn integration_prompt(integration: &str) -> Prompt {
    Prompt {
        system: INTEGRATION_SYSTEM.trim().to_string(),
        user: render_template(
            INTEGRATION_PROMPT.trim(),
            &[("integration_name", integration)],
        ),
    }
}

pub fn tool_prompt(integration: &str, tool: &str, args: &[Argument]) -> Prompt {
    let arguments = render_arguments(args);
    Prompt {
        system: TOOL_SYSTEM.trim().to_string(),
        user: render_template(
            TOOL_PROMPT.trim(),
            &[
                ("integration_name", integration),
                ("tool_name", tool),
                ("arguments", &arguments),
            ],
        ),
    }
}

/// Substitute `{key}` placeholders in one pass.
///
/// Substituted values are never rescanned, so names containing braces are
/// inserted literally. Unknown placeholders are left as written.
fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// LM-backed generator. Holds the backend, the per-run generator settings,
/// and the optional call log.
pub struct Describer {
    backend: Box<dyn LmBackend>,
    config: GeneratorConfig,
    log: Option<LmLog>,
}

impl Describer {
    pub fn new(backend: Box<dyn LmBackend>, config: GeneratorConfig) -> Self {
        Self {
            backend,
            config,
            log: None,
        }
    }

    pub fn with_log(mut self, log: Option<LmLog>) -> Self {
        self.log = log;
        self
    }

    fn generate(&self, kind: LmInvocationKind, subject: &str, prompt: Prompt) -> Result<String> {
        let request = LmRequest {
            model: self.config.model.clone(),
            system: prompt.system,
            prompt: prompt.user,
        };
        if self.config.verbose {
            eprintln!(
                "[{kind}] {subject} ({} via {})\n  system: {}\n  prompt: {}",
                request.model,
                self.backend.name(),
                request.system,
                request.prompt
            );
        }

        let entry = self.log.as_ref().map(|_| {
            LmLogBuilder::new(kind, subject, &request.model).with_prompt_preview(&request.prompt)
        });
        let result = self.backend.complete(&request);
        if let (Some(log), Some(entry)) = (&self.log, entry) {
            let entry = match &result {
                Ok(_) => entry.success(),
                Err(err) => entry.failed(format!("{err:#}")),
            };
            log.append(&entry)?;
        }

        let text = result.with_context(|| format!("generate {kind} for {subject}"))?;
        if self.config.verbose {
            eprintln!("  response: {text}");
        }
        Ok(text)
    }
}

impl DescriptionGenerator for Describer {
    fn describe_integration(&mut self, integration: &str) -> Result<String> {
        self.generate(
            LmInvocationKind::IntegrationDescription,
            integration,
            integration_prompt(integration),
        )
    }

    fn describe_tool(
        &mut self,
        integration: &str,
        tool: &str,
        args: &[Argument],
    ) -> Result<String> {
        self.generate(
            LmInvocationKind::ToolDescription,
            &format!("{integration}/{tool}"),
            tool_prompt(integration, tool, args),
        )
    }
}
