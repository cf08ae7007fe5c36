//! Loading of existing translation documents.
//!
//! Existing documents follow the `<domain>.<locale>.<ext>` naming
//! convention inside a bundle's translations directory. They are parsed
//! per locale and folded into one locale-keyed tree per domain.

use std::collections::BTreeSet;
use std::path::Path;

use super::format::{
    DocumentFormat,
    StoreError,
};
use crate::input::NameFilter;
use crate::tree::{
    LocaleValues,
    Node,
    merge_locales,
};

/// Domains that have at least one existing document in `base_dir` for
/// one of the requested locales, restricted by the domain filter.
///
/// A missing directory simply has no domains.
///
/// # Errors
/// [`StoreError::Io`] when the directory cannot be listed.
pub fn discover_domains(
    base_dir: &Path,
    locales: &[String],
    extension: &str,
    domains: &NameFilter,
) -> Result<BTreeSet<String>, StoreError> {
    let mut found = BTreeSet::new();
    let entries = match std::fs::read_dir(base_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(found),
        Err(error) => return Err(error.into()),
    };

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some((domain, locale)) = split_document_name(name, extension) else {
            continue;
        };
        if locales.iter().any(|requested| requested == locale) && domains.matches(domain) {
            found.insert(domain.to_string());
        }
    }
    Ok(found)
}

/// Splits a document file name into its domain and locale parts.
/// `None` when the name does not follow `<domain>.<locale>.<ext>`.
fn split_document_name<'a>(name: &'a str, extension: &str) -> Option<(&'a str, &'a str)> {
    let stem = name.strip_suffix(extension)?.strip_suffix('.')?;
    let (domain, locale) = stem.rsplit_once('.')?;
    if domain.is_empty() || locale.is_empty() {
        return None;
    }
    Some((domain, locale))
}

/// Loads every existing document of `domain` for the requested locales
/// and folds them into a single locale-keyed tree. Missing files are
/// skipped; `None` when no document exists at all.
///
/// # Errors
/// [`StoreError`] when an existing document cannot be read or parsed.
pub fn load_existing(
    base_dir: &Path,
    domain: &str,
    locales: &[String],
    format: DocumentFormat,
    extension: &str,
) -> Result<Option<Node<LocaleValues>>, StoreError> {
    let mut folded: Option<Node<LocaleValues>> = None;
    for locale in locales {
        let path = base_dir.join(format!("{domain}.{locale}.{extension}"));
        if !path.exists() {
            continue;
        }

        tracing::debug!(path = %path.display(), "Loading existing translation document");
        let content = std::fs::read_to_string(&path)?;
        let tree = format.parse(&content)?.into_locale_tree(locale);
        folded = Some(match folded {
            Some(previous) => merge_locales(previous, tree),
            None => tree,
        });
    }
    Ok(folded)
}
