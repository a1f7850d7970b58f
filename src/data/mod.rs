//! Data module - dataset download and cleaning

mod cleaner;
mod loader;

pub use cleaner::{renamed, CleanError, DataCleaner, AGE_TOP_CODE, RAW_COLUMNS, RENAMES};
pub use loader::{DatasetLoader, LoaderError, GSS_2018_URL, MISSING_SENTINELS};
