use std::str::FromStr;

use super::domain::PublicationSource;

/// Category scope for the source-manager listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(trimmed.to_string()))
        }
    }
}

/// Case-insensitive substring search over name or category, scoped by category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl SourceFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            category: CategoryFilter::All,
        }
    }

    pub fn matches(&self, source: &PublicationSource) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = source.name.to_lowercase().contains(&needle)
            || source.category.to_lowercase().contains(&needle);
        let matches_category = match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => &source.category == category,
        };
        matches_search && matches_category
    }
}
