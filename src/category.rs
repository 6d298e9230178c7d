//! Categories group expenses and give them a display color.

use serde::{Deserialize, Serialize};

use crate::Error;

/// API identifier for a category.
pub type CategoryId = i64;

/// The color given to new categories when none is picked.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366f1";

/// A user defined expense category, as returned by the API.
///
/// Names are unique per user. Expenses refer to categories by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The API ID.
    pub id: CategoryId,
    /// The name expenses use to refer to this category.
    pub name: String,
    /// A `#rrggbb` display color.
    pub color: String,
}

/// Form data for category creation and editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    /// The category name.
    pub name: String,
    /// A `#rrggbb` display color.
    pub color: String,
}

impl CategoryDraft {
    /// Create a draft with the default color.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
        }
    }

    /// Trim the name, lower case the color and check both.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] or [Error::InvalidColor].
    pub fn validate(self) -> Result<Self, Error> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        let color = self.color.trim().to_lowercase();

        if !is_hex_color(&color) {
            return Err(Error::InvalidColor(self.color));
        }

        Ok(Self {
            name: name.to_owned(),
            color,
        })
    }
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            color: category.color.clone(),
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
