//! Persistence of translation documents.

mod change;
mod format;
mod loader;

pub use change::{
    fingerprint,
    has_changed,
};
pub use format::{
    DocumentFormat,
    StoreError,
};
pub use loader::{
    discover_domains,
    load_existing,
};
