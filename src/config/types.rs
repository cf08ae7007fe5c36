use std::collections::HashMap;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::bundle::APP_BUNDLE;
use crate::store::DocumentFormat;
use crate::tree::ConflictPolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "bundles.AppBundle")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Workspace settings of the import command.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSettings {
    /// Separator between key path segments.
    pub key_separator: char,

    /// Escape character making the following separator literal.
    pub escape_char: char,

    /// What to do when a key path collides with an existing entry of
    /// the other shape.
    pub conflict_policy: ConflictPolicy,

    /// Extension (and thereby format) of the persisted documents.
    pub file_extension: String,

    /// Subdirectory of a resolved bundle holding its translation files.
    pub translations_subdir: String,

    /// Directory of the application-level translation files, used by
    /// the `app` pseudo-bundle.
    pub app_translations_path: PathBuf,

    /// Bundle name → bundle base directory.
    pub bundles: HashMap<String, PathBuf>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            key_separator: '.',
            escape_char: '\\',
            conflict_policy: ConflictPolicy::default(),
            file_extension: "yml".to_string(),
            translations_subdir: "translations".to_string(),
            app_translations_path: PathBuf::from("translations"),
            bundles: HashMap::new(),
        }
    }
}

impl ImportSettings {
    /// Resolves the relative paths of the settings against `root`.
    pub fn anchor_to(&mut self, root: &std::path::Path) {
        if self.app_translations_path.is_relative() {
            self.app_translations_path = root.join(&self.app_translations_path);
        }
        for path in self.bundles.values_mut() {
            if path.is_relative() {
                let anchored = root.join(&*path);
                *path = anchored;
            }
        }
    }

    /// # Errors
    /// - Separator and escape are the same character
    /// - Unsupported file extension
    /// - Empty path fields or bundle entries
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator == self.escape_char {
            errors.push(ValidationError::new(
                "keySeparator/escapeChar",
                "The separator and the escape character must differ",
            ));
        }

        if DocumentFormat::from_extension(&self.file_extension).is_none() {
            errors.push(ValidationError::new(
                "fileExtension",
                format!(
                    "Unsupported extension '{}'. Supported: \"yml\", \"yaml\", \"json\"",
                    self.file_extension
                ),
            ));
        }

        if self.translations_subdir.is_empty() {
            errors.push(ValidationError::new(
                "translationsSubdir",
                "The subdirectory cannot be empty. Example: \"translations\"",
            ));
        }

        if self.app_translations_path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "appTranslationsPath",
                "The path cannot be empty. Example: \"translations\"",
            ));
        }

        for (name, path) in &self.bundles {
            if name == APP_BUNDLE {
                errors.push(ValidationError::new(
                    format!("bundles.{name}"),
                    format!("'{APP_BUNDLE}' is reserved for the application-level translations"),
                ));
            }
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::new(
                    format!("bundles.{name}"),
                    "The bundle path cannot be empty",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
