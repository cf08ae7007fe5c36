//! The import pipeline.
//!
//! One run collects the records of an import file, resolves the bundles
//! they belong to, merges them over the existing translation documents,
//! and rewrites every (bundle, domain, locale) document whose content
//! actually changed. Documents are processed sequentially; a failing
//! write only fails its own document.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::bundle::{
    APP_BUNDLE,
    BundleRegistry,
    RegistryError,
};
use crate::config::{
    ConfigError,
    ImportSettings,
};
use crate::input::{
    CsvError,
    CsvLoader,
    FilterError,
    NameFilter,
    TranslationRecord,
};
use crate::store::{
    DocumentFormat,
    StoreError,
    discover_domains,
    has_changed,
    load_existing,
};
use crate::tree::{
    LocaleValues,
    Node,
    TreeError,
    merge_locales,
    split_key,
};

/// Caller-side options of one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Path of the import file.
    pub source: PathBuf,
    /// Bundle filter.
    pub bundles: NameFilter,
    /// Domain filter.
    pub domains: NameFilter,
    /// Locale filter; with the `all` sentinel, the locales present in
    /// the imported records are used.
    pub locales: NameFilter,
    /// Skip loading existing documents and overwrite them outright.
    pub force: bool,
    /// Fold every record into the application-level pseudo-bundle.
    pub merge_into_app: bool,
}

/// Identifies one output document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentKey {
    /// Owning bundle name.
    pub bundle: String,
    /// Translation domain.
    pub domain: String,
    /// Locale of the document.
    pub locale: String,
}

impl DocumentKey {
    /// File name of the document, `<domain>.<locale>.<ext>`.
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}.{extension}", self.domain, self.locale)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.bundle, self.domain, self.locale)
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The document changed and was written.
    Written,
    /// The document matched the on-disk content; nothing was written.
    Unchanged,
    /// The document could not be written.
    Failed(String),
}

/// Per-document result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// The document this outcome belongs to.
    pub key: DocumentKey,
    /// Resolved path of the document.
    pub path: PathBuf,
    /// What happened.
    pub status: DocumentStatus,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// One outcome per processed document.
    pub outcomes: Vec<DocumentOutcome>,
}

impl ImportReport {
    /// Number of documents written.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == DocumentStatus::Written).count()
    }

    /// Number of documents left untouched.
    #[must_use]
    pub fn unchanged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == DocumentStatus::Unchanged).count()
    }

    /// Whether any document failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| matches!(o.status, DocumentStatus::Failed(_)))
    }
}

/// Fatal errors of a run; they abort before any document is written.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The workspace configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A caller-supplied filter is unusable.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// The import file is unusable.
    #[error(transparent)]
    Csv(#[from] CsvError),
    /// A bundle name could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A record key could not be assigned into its tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// An existing document could not be loaded.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The configured file extension has no supported format.
    #[error("Unsupported file extension '{extension}' in settings")]
    UnsupportedExtension {
        /// The configured extension.
        extension: String,
    },
}

/// Locale-keyed trees per (bundle, domain).
type BundleTrees = BTreeMap<String, BTreeMap<String, Node<LocaleValues>>>;

/// Drives one import run over an injected bundle registry.
#[derive(Debug, Clone)]
pub struct ImportService<R> {
    /// Workspace settings.
    settings: ImportSettings,
    /// Resolves bundle names to bundle directories.
    registry: R,
}

impl<R: BundleRegistry> ImportService<R> {
    /// Creates a service over the given settings and registry.
    #[must_use]
    pub fn new(settings: ImportSettings, registry: R) -> Self {
        Self { settings, registry }
    }

    /// Runs one import.
    ///
    /// # Errors
    /// [`ImportError`] for the fatal classes (unreadable import file,
    /// unknown bundle, structural conflict under the reject policy,
    /// unreadable existing document); all of them occur before any
    /// write. Per-document write failures are reported in the
    /// [`ImportReport`] instead.
    pub fn run(&self, options: &ImportOptions) -> Result<ImportReport, ImportError> {
        let format = DocumentFormat::from_extension(&self.settings.file_extension).ok_or_else(
            || ImportError::UnsupportedExtension {
                extension: self.settings.file_extension.clone(),
            },
        )?;

        let records = CsvLoader::load(
            &options.source,
            &options.bundles,
            &options.domains,
            &options.locales,
            options.merge_into_app,
        )?;
        if records.is_empty() {
            tracing::info!("No records matched the requested bundles, domains and locales");
            return Ok(ImportReport::default());
        }

        let locales = resolve_locales(&options.locales, &records);
        let base_dirs = self.resolve_base_dirs(&records)?;
        let mut trees = self.collect_trees(&records)?;
        if !options.force {
            self.merge_existing(&mut trees, &base_dirs, &locales, &options.domains, format)?;
        }

        Ok(self.write_documents(&trees, &base_dirs, &locales, format))
    }

    /// Resolves every bundle of the collected records to the directory
    /// holding its translation files.
    fn resolve_base_dirs(
        &self,
        records: &BTreeMap<String, Vec<TranslationRecord>>,
    ) -> Result<BTreeMap<String, PathBuf>, RegistryError> {
        let mut base_dirs = BTreeMap::new();
        for bundle in records.keys() {
            let dir = if bundle == APP_BUNDLE {
                self.settings.app_translations_path.clone()
            } else {
                self.registry.resolve(bundle)?.join(&self.settings.translations_subdir)
            };
            base_dirs.insert(bundle.clone(), dir);
        }
        Ok(base_dirs)
    }

    /// Folds the flat records into locale-keyed trees per
    /// (bundle, domain).
    fn collect_trees(
        &self,
        records: &BTreeMap<String, Vec<TranslationRecord>>,
    ) -> Result<BundleTrees, TreeError> {
        let mut trees: BundleTrees = BTreeMap::new();
        for (bundle, bundle_records) in records {
            let domains = trees.entry(bundle.clone()).or_default();
            for record in bundle_records {
                let segments = split_key(
                    &record.key,
                    self.settings.key_separator,
                    self.settings.escape_char,
                )?;
                domains
                    .entry(record.domain.clone())
                    .or_insert_with(Node::container)
                    .assign(&segments, record.values.clone(), self.settings.conflict_policy)?;
            }
        }
        Ok(trees)
    }

    /// Loads the existing documents of every affected (bundle, domain)
    /// and merges the imported entries over them. Domains that exist on
    /// disk but received no records are rewritten too (their keys get
    /// reordered canonically), matching the domain filter.
    fn merge_existing(
        &self,
        trees: &mut BundleTrees,
        base_dirs: &BTreeMap<String, PathBuf>,
        locales: &[String],
        domain_filter: &NameFilter,
        format: DocumentFormat,
    ) -> Result<(), StoreError> {
        for (bundle, base_dir) in base_dirs {
            let domains = trees.entry(bundle.clone()).or_default();
            let mut all_domains = discover_domains(
                base_dir,
                locales,
                &self.settings.file_extension,
                domain_filter,
            )?;
            all_domains.extend(domains.keys().cloned());

            for domain in all_domains {
                let existing = load_existing(
                    base_dir,
                    &domain,
                    locales,
                    format,
                    &self.settings.file_extension,
                )?;
                if let Some(existing) = existing {
                    let imported = domains.remove(&domain).unwrap_or_else(Node::container);
                    domains.insert(domain, merge_locales(existing, imported));
                }
            }
        }
        Ok(())
    }

    /// Projects every merged tree per locale, serializes it canonically
    /// and writes it when its content changed.
    fn write_documents(
        &self,
        trees: &BundleTrees,
        base_dirs: &BTreeMap<String, PathBuf>,
        locales: &[String],
        format: DocumentFormat,
    ) -> ImportReport {
        let mut report = ImportReport::default();
        for (bundle, domains) in trees {
            let Some(base_dir) = base_dirs.get(bundle) else {
                continue;
            };
            for (domain, tree) in domains {
                for locale in locales {
                    let key = DocumentKey {
                        bundle: bundle.clone(),
                        domain: domain.clone(),
                        locale: locale.clone(),
                    };
                    let Some(document) = tree.project_locale(locale) else {
                        tracing::debug!(document = %key, "No entries for locale, skipping");
                        continue;
                    };

                    let path = base_dir.join(key.file_name(&self.settings.file_extension));
                    let status = match write_if_changed(format, &document, &path) {
                        Ok(true) => {
                            tracing::info!("{} updated", path.display());
                            DocumentStatus::Written
                        }
                        Ok(false) => {
                            tracing::debug!(document = %key, "Content unchanged");
                            DocumentStatus::Unchanged
                        }
                        Err(error) => {
                            tracing::error!(document = %key, %error, "Failed to write document");
                            DocumentStatus::Failed(error.to_string())
                        }
                    };
                    report.outcomes.push(DocumentOutcome { key, path, status });
                }
            }
        }
        report
    }
}

/// The requested locales, or the locales present in the records when
/// the filter is the `all` sentinel. Ascending either way.
fn resolve_locales(
    filter: &NameFilter,
    records: &BTreeMap<String, Vec<TranslationRecord>>,
) -> Vec<String> {
    filter.names().map_or_else(
        || {
            let locales: BTreeSet<String> = records
                .values()
                .flatten()
                .flat_map(|record| record.values.keys().cloned())
                .collect();
            locales.into_iter().collect()
        },
        |names| names.into_iter().cloned().collect(),
    )
}

/// Serializes and writes the document unless the on-disk content is
/// already identical; `true` when a write happened.
fn write_if_changed(
    format: DocumentFormat,
    document: &Node<String>,
    path: &std::path::Path,
) -> Result<bool, StoreError> {
    let bytes = format.serialize(document)?;
    if !has_changed(path, &bytes) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    Ok(true)
}
