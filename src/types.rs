//! Common types and data structures

use crate::constants::{ALL_CATEGORIES, CATEGORY_ESCAPE_PREFIX, SERVER_CATEGORY};
use serde::{Deserialize, Serialize};

/// A single quote. The text doubles as its identity when merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

/// Category selection for the quote view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parse the stored form; `"all"` selects everything
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else if let Some(escaped) = value.strip_prefix(CATEGORY_ESCAPE_PREFIX) {
            Self::Category(escaped.to_string())
        } else {
            Self::Category(value.to_string())
        }
    }

    /// Stored form read back by `parse`. A category spelled like the
    /// sentinel, or like the escape prefix, gets the prefix added.
    pub fn to_stored(&self) -> String {
        match self {
            Self::All => ALL_CATEGORIES.to_string(),
            Self::Category(c) if c == ALL_CATEGORIES || c.starts_with(CATEGORY_ESCAPE_PREFIX) => {
                format!("{}{}", CATEGORY_ESCAPE_PREFIX, c)
            }
            Self::Category(c) => c.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(c) => c,
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(c) => quote.category == *c,
        }
    }

    /// Label shown in the category picker
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Category(c) => c,
        }
    }
}

/// How a notice is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Blocking modal that must be dismissed
    Alert,
    /// Transient toast
    Banner,
    /// Transient toast styled as a failure
    BannerError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            message: message.into(),
        }
    }

    pub fn banner(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Banner,
            message: message.into(),
        }
    }

    pub fn banner_error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::BannerError,
            message: message.into(),
        }
    }
}

/// Post entry returned by the remote placeholder API. Only the title is
/// used; `userId`, `id` and `body` are ignored.
#[derive(Debug, Deserialize)]
pub struct RemotePost {
    pub title: String,
}

impl From<RemotePost> for Quote {
    fn from(post: RemotePost) -> Self {
        Quote::new(post.title, SERVER_CATEGORY)
    }
}
