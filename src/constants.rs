//! Application constants and configuration

pub const APP_NAME: &str = "Quote Manager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mock server that echoes posts back without storing them
pub const QUOTES_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
pub const REMOTE_FETCH_LIMIT: usize = 5;
pub const SERVER_CATEGORY: &str = "Server";

pub const SYNC_INTERVAL_SECS: u64 = 30;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// Storage keys
pub const QUOTES_KEY: &str = "quotes";
pub const LAST_CATEGORY_KEY: &str = "lastSelectedCategory";
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

pub const ALL_CATEGORIES: &str = "all";
/// Prefix marking a stored category whose text would otherwise collide with
/// the "all" sentinel
pub const CATEGORY_ESCAPE_PREFIX: &str = "category:";
pub const EXPORT_FILE_NAME: &str = "quotes.json";
pub const DB_SCHEMA_VERSION: &str = "1";

/// Seed quotes used when nothing usable is persisted
pub const DEFAULT_QUOTES: &[(&str, &str)] = &[
    (
        "The best way to get started is to quit talking and begin doing.",
        "Motivation",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "Life",
    ),
    ("Stay hungry, stay foolish.", "Inspiration"),
];

// User-facing messages
pub const MSG_NO_QUOTES: &str = "No quotes available in this category.";
pub const MSG_QUOTE_ADDED: &str = "Quote added successfully!";
pub const MSG_FILL_BOTH: &str = "Please fill in both quote and category.";
pub const MSG_IMPORTED: &str = "Quotes imported successfully!";
pub const MSG_SYNCED: &str = "Quotes synced with server!";
