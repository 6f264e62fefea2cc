//! Utility functions

use crate::constants::APP_NAME;
use crate::types::Quote;
use std::path::PathBuf;

/// Get the app data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("cache")
}

/// Quote as shown in the quote card: `"text" — category`
pub fn format_quote(quote: &Quote) -> String {
    format!("\"{}\" — {}", quote.text, quote.category)
}

/// Count followed by the matching noun form
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}
