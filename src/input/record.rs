//! Flat translation records and name filters.

use std::collections::{
    HashMap,
    HashSet,
};

use thiserror::Error;

/// Sentinel filter value matching every name.
pub const MATCH_ALL: &str = "all";

/// One imported row: a delimited key and its per-locale values, scoped
/// to a bundle and a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Name of the bundle owning the key.
    pub bundle: String,
    /// Translation domain within the bundle (e.g. "messages").
    pub domain: String,
    /// Delimited key path (e.g. "user.name").
    pub key: String,
    /// Locale → translated text.
    pub values: HashMap<String, String>,
}

/// A raw filter contained no usable names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Filter '{raw}' contains no names; use a comma-separated list or \"all\"")]
pub struct FilterError {
    /// The raw filter string as given by the caller.
    pub raw: String,
}

/// A name filter: either the `all` sentinel or an explicit name set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// Matches every name.
    All,
    /// Matches only the listed names.
    Names(HashSet<String>),
}

impl NameFilter {
    /// Parses a comma-separated name list; the literal `all` matches
    /// everything.
    ///
    /// # Errors
    /// [`FilterError`] when the list contains no names.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        if raw.trim() == MATCH_ALL {
            return Ok(Self::All);
        }

        let names: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect();
        if names.is_empty() {
            return Err(FilterError { raw: raw.to_string() });
        }
        Ok(Self::Names(names))
    }

    /// Whether the filter accepts `name`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Names(names) => names.contains(name),
        }
    }

    /// The explicit names, ascending; `None` for the `all` sentinel.
    #[must_use]
    pub fn names(&self) -> Option<Vec<&String>> {
        match self {
            Self::All => None,
            Self::Names(names) => {
                let mut names: Vec<&String> = names.iter().collect();
                names.sort_unstable();
                Some(names)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::sentinel("all", "anything", true)]
    #[case::sentinel_padded(" all ", "anything", true)]
    #[case::listed("en,fr", "fr", true)]
    #[case::not_listed("en,fr", "de", false)]
    #[case::padded_names("en, fr", "fr", true)]
    fn test_parse_and_match(#[case] raw: &str, #[case] name: &str, #[case] expected: bool) {
        let filter = NameFilter::parse(raw).unwrap();

        assert_eq!(filter.matches(name), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_commas(",,")]
    #[case::blank("   ")]
    fn test_parse_rejects_empty_filters(#[case] raw: &str) {
        let result = NameFilter::parse(raw);

        assert_eq!(result, Err(FilterError { raw: raw.to_string() }));
    }

    #[googletest::test]
    fn test_names_are_sorted() {
        let filter = NameFilter::parse("fr,de,en").unwrap();

        let names = filter.names().unwrap();

        expect_that!(names, elements_are![eq(&"de"), eq(&"en"), eq(&"fr")]);
    }

    #[googletest::test]
    fn test_all_has_no_names() {
        let filter = NameFilter::parse(MATCH_ALL).unwrap();

        expect_that!(filter.names(), none());
    }
}
