//! The closed set of expense categories and the category filter.
//!
//! Categories group transactions for filtering and aggregation. The set is
//! fixed and ordered; names that do not match a known category map to
//! [Category::Other].

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The label shown for the filter option that matches every category.
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// An expense category, e.g. 'Food', 'Transport', 'Bills'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Education,
    /// The fallback for anything that is not one of the other categories.
    #[default]
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// The display name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    /// Look up a category by name, ignoring case and surrounding whitespace.
    ///
    /// Unrecognized names map to [Category::Other].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();

        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
            .unwrap_or(Category::Other)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;

        Ok(name
            .as_deref()
            .map(Category::from_name)
            .unwrap_or(Category::Other))
    }
}

/// Restricts a transaction list to one category, or lets every category through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CategoryFilter {
    /// Matches every transaction.
    #[default]
    All,
    /// Matches transactions with exactly this category.
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter from the label shown to the user.
    ///
    /// [ALL_CATEGORIES_LABEL] and the empty string select [CategoryFilter::All],
    /// anything else is looked up with [Category::from_name].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();

        if label.is_empty() || label.eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from_name(label))
        }
    }

    /// The label shown to the user for this filter.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES_LABEL,
            CategoryFilter::Only(category) => category.name(),
        }
    }

    /// Every filter option in display order, with [CategoryFilter::All] first.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect()
    }

    /// Whether `category` passes this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}
