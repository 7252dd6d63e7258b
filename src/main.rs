use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod config;
mod describe;
mod enrich;
mod lm;
mod output;
mod util;

use cli::RootArgs;
use describe::Describer;
use lm::LmLog;

fn main() -> Result<()> {
    let args = parse_args();
    init_tracing(config::verbose_requested(config::env_lookup));
    run(args)
}

/// Parse argv, exiting with status 1 and usage on any argument error.
fn parse_args() -> RootArgs {
    RootArgs::try_parse().unwrap_or_else(|err| {
        if matches!(
            err.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) {
            err.exit();
        }
        let _ = err.print();
        std::process::exit(1);
    })
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: RootArgs) -> Result<()> {
    let mut catalog = catalog::load_catalog(&args.input)?;
    let config = config::load_config()?;

    let backend = lm::build_backend(&config.backend);
    tracing::info!(
        backend = backend.name(),
        model = %config.generator.model,
        integrations = catalog.integrations().len(),
        "enriching catalog"
    );
    let log = config.lm_log.map(LmLog::new);
    if let Some(log) = &log {
        tracing::info!(path = %log.path().display(), "lm log enabled");
    }

    let mut describer = Describer::new(backend, config.generator).with_log(log);
    let summary = enrich::populate_integration_details(&mut catalog, &mut describer)?;
    tracing::info!(
        integrations = summary.integrations,
        tools = summary.tools,
        renamed_arg_schemas = summary.renamed_arg_schemas,
        "enrichment complete"
    );

    output::save_or_display(&catalog, args.output.as_deref())
}
