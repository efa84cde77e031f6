use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of feedback categories.
///
/// Serialized with the labels shown to users: `"UI"`, `"Performance"`,
/// `"Feature"` and `"Bug"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Look and feel.
    #[serde(rename = "UI")]
    Ui,
    /// Speed and resource usage.
    Performance,
    /// New functionality.
    Feature,
    /// Something is broken.
    Bug,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Ui,
        Category::Performance,
        Category::Feature,
        Category::Bug,
    ];

    /// The label used in JSON and for category ordering.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ui => "UI",
            Self::Performance => "Performance",
            Self::Feature => "Feature",
            Self::Bug => "Bug",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: UI, Performance, Feature, Bug)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive match on the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Category filter applied before sorting.
///
/// Serialized as `"all"` or as a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CategoryFilter {
    /// Every item passes.
    #[default]
    All,
    /// Only items with exactly this category pass.
    Only(Category),
}

impl CategoryFilter {
    const ALL_LABEL: &'static str = "all";

    /// Whether an item with `category` passes the filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Only(category) => f.write_str(category.label()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::ALL_LABEL) {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = ParseCategoryError;

    /// Exact labels only: stored documents are not normalized.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::ALL_LABEL {
            return Ok(Self::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.label() == value)
            .map(Self::Only)
            .ok_or(ParseCategoryError(value))
    }
}
