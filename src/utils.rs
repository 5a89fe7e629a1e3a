use crate::constants::{DATA_DIR_ENV, DEFAULT_DATA_DIR, PRICES_SUBDIR, PROCESSED_SUBDIR};
use std::path::PathBuf;

/// Get data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Directory holding cached price series
pub fn get_prices_dir() -> PathBuf {
    get_data_dir().join(PRICES_SUBDIR)
}

/// Directory holding computed index results
pub fn get_processed_dir() -> PathBuf {
    get_data_dir().join(PROCESSED_SUBDIR)
}
