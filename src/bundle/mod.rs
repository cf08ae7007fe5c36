//! Bundle name resolution.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

/// Name of the application-level pseudo-bundle. It resolves to the
/// configured application translations directory instead of going
/// through the registry.
pub const APP_BUNDLE: &str = "app";

/// Errors raised while resolving bundle names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The bundle name is not registered.
    #[error("Unknown bundle '{name}'")]
    NotFound {
        /// The unresolved bundle name.
        name: String,
    },
}

/// Resolves a bundle name to the base directory of that bundle.
pub trait BundleRegistry {
    /// Resolves `name` to the bundle's base directory.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] for unregistered names.
    fn resolve(&self, name: &str) -> Result<PathBuf, RegistryError>;
}

/// Registry backed by the `bundles` map of the workspace configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredBundles {
    /// Bundle name → base directory.
    bundles: HashMap<String, PathBuf>,
}

impl ConfiguredBundles {
    /// Creates a registry over the given name → directory map.
    #[must_use]
    pub fn new(bundles: HashMap<String, PathBuf>) -> Self {
        Self { bundles }
    }
}

impl BundleRegistry for ConfiguredBundles {
    fn resolve(&self, name: &str) -> Result<PathBuf, RegistryError> {
        self.bundles
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }
}
