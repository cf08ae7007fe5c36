//! Command-line argument definitions using clap derive.

use std::path::PathBuf;

use clap::Parser;

use crate::import::ImportOptions;
use crate::input::{
    FilterError,
    NameFilter,
};

/// Import translations from a CSV export into the project bundles.
#[derive(Parser, Debug)]
#[command(name = "i18n-import")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Locales to import (comma-separated, or "all")
    pub locales: String,

    /// Path of the CSV file to import
    pub csv: PathBuf,

    /// Limit to these domains (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    pub domains: String,

    /// Limit to these bundles (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    pub bundles: String,

    /// Overwrite translation files instead of merging existing entries
    #[arg(long)]
    pub force: bool,

    /// Merge all records into the application-level translations
    #[arg(long)]
    pub merge: bool,

    /// Run as if started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Turns the raw arguments into import options.
    ///
    /// # Errors
    /// [`FilterError`] when a filter argument contains no names.
    pub fn to_options(&self) -> Result<ImportOptions, FilterError> {
        Ok(ImportOptions {
            source: self.csv.clone(),
            bundles: NameFilter::parse(&self.bundles)?,
            domains: NameFilter::parse(&self.domains)?,
            locales: NameFilter::parse(&self.locales)?,
            force: self.force,
            merge_into_app: self.merge,
        })
    }
}
