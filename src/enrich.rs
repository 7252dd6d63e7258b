//! Catalog enrichment pass.
//!
//! Walks integrations in order, generating one description per integration
//! and one per tool, and migrates legacy `arg_schena` keys as it goes. The
//! pass stops at the first error; the caller never sees a partial catalog.
use crate::catalog::{
    migrate_arg_schema, record_name, set_description, tool_arguments, tools_mut, Catalog,
    DEFAULT_INTEGRATION_NAME, DEFAULT_TOOL_NAME,
};
use crate::describe::DescriptionGenerator;
use anyhow::{anyhow, Context, Result};

/// Counts reported after a successful pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichSummary {
    pub integrations: usize,
    pub tools: usize,
    pub renamed_arg_schemas: usize,
}

pub fn populate_integration_details(
    catalog: &mut Catalog,
    generator: &mut dyn DescriptionGenerator,
) -> Result<EnrichSummary> {
    let mut summary = EnrichSummary::default();

    for (idx, integration) in catalog.integrations_mut().iter_mut().enumerate() {
        let label = format!("integration #{}", idx + 1);
        let name = record_name(integration, DEFAULT_INTEGRATION_NAME).context(label.clone())?;
        let label = format!("{label} ({name})");

        let description = generator.describe_integration(&name)?;
        set_description(integration, description);
        summary.integrations += 1;

        let tools = tools_mut(integration).context(label.clone())?;
        for (tool_idx, tool) in tools.into_iter().flatten().enumerate() {
            let tool_label = format!("{label} tool #{}", tool_idx + 1);
            let tool = tool
                .as_mapping_mut()
                .ok_or_else(|| anyhow!("{tool_label} must be a mapping"))?;
            let tool_name = record_name(tool, DEFAULT_TOOL_NAME).context(tool_label.clone())?;
            let args = tool_arguments(tool)
                .with_context(|| format!("{tool_label} ({tool_name})"))?;

            let description = generator.describe_tool(&name, &tool_name, &args)?;
            set_description(tool, description);
            if migrate_arg_schema(tool) {
                summary.renamed_arg_schemas += 1;
            }
            summary.tools += 1;
        }

        eprintln!("Generated descriptions for {name}");
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "enrich_tests.rs"]
mod tests;
