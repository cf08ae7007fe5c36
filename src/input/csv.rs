//! Tab-separated record source.
//!
//! The import file is the tabular export convention: a header row
//! `Bundle  Domain  Key  <locale>…` followed by one row per key, all
//! columns separated by tabs. An empty locale cell means the key has no
//! value for that locale.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use super::record::{
    NameFilter,
    TranslationRecord,
};
use crate::bundle::APP_BUNDLE;

/// Field separator of the import format.
const FIELD_SEPARATOR: char = '\t';

/// Number of fixed columns (`Bundle`, `Domain`, `Key`) before the
/// locale columns.
const FIXED_COLUMNS: usize = 3;

/// Errors raised while reading an import file.
#[derive(Error, Debug)]
pub enum CsvError {
    /// The file could not be read.
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is empty or its header row is unusable.
    #[error("Import file has no usable header row (expected 'Bundle\\tDomain\\tKey\\t<locale>…')")]
    MissingHeader,
    /// A data row does not fit the header.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number in the import file.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },
}

/// Reads translation records from a tab-separated import file.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader;

impl CsvLoader {
    /// Loads the records of `path`, grouped by bundle name.
    ///
    /// Records not matching the bundle or domain filter are dropped, and
    /// each record's values are restricted to the locales accepted by the
    /// locale filter; records left without values are dropped too. With
    /// `merge_into_app` set, every record is folded into the
    /// application-level pseudo-bundle.
    ///
    /// # Errors
    /// [`CsvError`] on unreadable files, a missing header or rows that
    /// do not fit the header.
    pub fn load(
        path: &Path,
        bundles: &NameFilter,
        domains: &NameFilter,
        locales: &NameFilter,
        merge_into_app: bool,
    ) -> Result<BTreeMap<String, Vec<TranslationRecord>>, CsvError> {
        let content = std::fs::read_to_string(path)?;
        let mut lines = content.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(CsvError::MissingHeader)?;
        let header_locales = parse_header(header)?;

        let mut records: BTreeMap<String, Vec<TranslationRecord>> = BTreeMap::new();
        for (index, line) in lines {
            let Some(record) = parse_row(line, index + 1, &header_locales, locales)? else {
                continue;
            };
            if !bundles.matches(&record.bundle) || !domains.matches(&record.domain) {
                continue;
            }

            let bundle = if merge_into_app { APP_BUNDLE.to_string() } else { record.bundle.clone() };
            records.entry(bundle.clone()).or_default().push(TranslationRecord { bundle, ..record });
        }

        tracing::debug!(
            bundles = records.len(),
            rows = records.values().map(Vec::len).sum::<usize>(),
            "Import file loaded"
        );
        Ok(records)
    }
}

/// Parses the header row into its locale column names.
fn parse_header(header: &str) -> Result<Vec<String>, CsvError> {
    let mut columns = header.split(FIELD_SEPARATOR);
    let fixed: Vec<&str> = columns.by_ref().take(FIXED_COLUMNS).collect();
    if fixed.len() < FIXED_COLUMNS {
        return Err(CsvError::MissingHeader);
    }

    let locales: Vec<String> = columns.map(ToString::to_string).collect();
    if locales.is_empty() || locales.iter().any(String::is_empty) {
        return Err(CsvError::MissingHeader);
    }
    Ok(locales)
}

/// Parses one data row; `None` when every locale cell is empty or
/// filtered out.
fn parse_row(
    line: &str,
    line_number: usize,
    header_locales: &[String],
    locale_filter: &NameFilter,
) -> Result<Option<TranslationRecord>, CsvError> {
    let mut cells = line.split(FIELD_SEPARATOR);

    let bundle = next_fixed_cell(&mut cells, line_number, "bundle")?;
    let domain = next_fixed_cell(&mut cells, line_number, "domain")?;
    let key = next_fixed_cell(&mut cells, line_number, "key")?;

    let value_cells: Vec<&str> = cells.collect();
    if value_cells.len() > header_locales.len() {
        return Err(CsvError::MalformedRow {
            line: line_number,
            reason: format!(
                "{} value cells but only {} locale columns",
                value_cells.len(),
                header_locales.len()
            ),
        });
    }

    // 行末の空セルは省略されていてもよい
    let values = header_locales
        .iter()
        .zip(value_cells)
        .filter(|(locale, cell)| !cell.is_empty() && locale_filter.matches(locale))
        .map(|(locale, cell)| (locale.clone(), cell.to_string()))
        .collect::<std::collections::HashMap<_, _>>();

    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(TranslationRecord { bundle, domain, key, values }))
}

/// Reads one of the fixed leading cells, rejecting missing or empty ones.
fn next_fixed_cell<'a>(
    cells: &mut impl Iterator<Item = &'a str>,
    line_number: usize,
    column: &str,
) -> Result<String, CsvError> {
    match cells.next() {
        Some(cell) if !cell.is_empty() => Ok(cell.to_string()),
        _ => Err(CsvError::MalformedRow {
            line: line_number,
            reason: format!("missing {column} column"),
        }),
    }
}
