//! Two-part classification tags attached to every event.

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `primary[/secondary]` classification such as `apple/macos` or `holiday`.
///
/// Two notions of sameness exist and are kept apart on purpose:
///
/// - [`PartialEq`] is strict: both parts compare case-insensitively and a
///   missing secondary only equals another missing secondary.
/// - [`Category::matches`] is the query form: a query without a secondary
///   accepts every category with the same primary.
///
/// # Examples
///
/// ```
/// use today_core::category::Category;
///
/// let query: Category = "apple".parse().unwrap();
/// let tagged: Category = "apple/macos".parse().unwrap();
///
/// assert!(query.matches(&tagged));
/// assert!(!tagged.matches(&query));
/// assert_ne!(query, tagged);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category {
    primary: String,
    secondary: Option<String>,
}

impl Category {
    /// Create a category from its parts.
    ///
    /// An empty secondary is stored as absent.
    #[must_use]
    pub fn new(primary: impl Into<String>, secondary: Option<&str>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Parse `primary` or `primary/secondary`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MalformedCategory`] when the primary part is empty
    /// or the string has more than two parts.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut parts = text.split('/').map(str::trim);
        let primary = parts.next().unwrap_or_default();
        let secondary = parts.next();

        if primary.is_empty() || parts.next().is_some() {
            return Err(EventError::MalformedCategory(text.to_string()));
        }

        Ok(Self::new(primary, secondary))
    }

    /// The primary part.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// The secondary part, if any.
    #[must_use]
    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// Query match: `self` is the requested category, `other` the event's.
    ///
    /// When `self` has no secondary only the primaries are compared.
    /// Otherwise this is the same as `self == other`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        if self.secondary.is_none() {
            return same_text(&self.primary, &other.primary);
        }
        self == other
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        same_text(&self.primary, &other.primary)
            && match (&self.secondary, &other.secondary) {
                (Some(a), Some(b)) => same_text(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for Category {}

impl FromStr for Category {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Category {
    type Error = EventError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(&text)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{}/{secondary}", self.primary),
            None => f.write_str(&self.primary),
        }
    }
}
