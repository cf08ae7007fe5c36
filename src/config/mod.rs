//! Workspace configuration of the import command.
mod loader;
mod types;

pub use loader::resolve_settings;
pub use types::{
    ConfigError,
    ImportSettings,
    ValidationError,
};
