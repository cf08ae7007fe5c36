//! Entry point for the translation import command.

use std::process::ExitCode;

use i18n_import::bundle::ConfiguredBundles;
use i18n_import::cli::Cli;
use i18n_import::config::{
    self,
    ConfigError,
};
use i18n_import::import::{
    ImportError,
    ImportReport,
    ImportService,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(report) => {
            tracing::info!(
                "{} file(s) updated, {} unchanged",
                report.written_count(),
                report.unchanged_count()
            );
            if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves the workspace, loads its settings and runs the import.
fn run(cli: &Cli) -> Result<ImportReport, ImportError> {
    let workspace_root = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(ConfigError::IoError)?,
    };

    let mut settings = config::resolve_settings(&workspace_root)?;
    settings.anchor_to(&workspace_root);
    let registry = ConfiguredBundles::new(settings.bundles.clone());
    let service = ImportService::new(settings, registry);

    let mut options = cli.to_options()?;
    if options.source.is_relative() {
        options.source = workspace_root.join(&options.source);
    }
    service.run(&options)
}
