//! Translation record input.

mod csv;
mod record;

pub use csv::{
    CsvError,
    CsvLoader,
};
pub use record::{
    FilterError,
    MATCH_ALL,
    NameFilter,
    TranslationRecord,
};
