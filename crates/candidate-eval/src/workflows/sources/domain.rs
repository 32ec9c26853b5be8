use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for registry entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A validated registry entry. `name` and `category` are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSource {
    pub id: SourceId,
    pub name: String,
    pub category: String,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PublicationSource {
    /// Re-check an entry read back from storage, where it may have been edited by hand.
    pub(crate) fn revalidate(self) -> Result<Self, SourceValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(SourceValidationError::EmptyId);
        }
        let id = self.id.clone();
        SourceDraft::from(self).validate(id)
    }
}

/// Administrator input for `upsert`. A missing `id` means "new entry".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceDraft {
    #[serde(default)]
    pub id: Option<SourceId>,
    pub name: String,
    pub category: String,
    pub points: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl SourceDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>, points: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            points,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(SourceId(id.into()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the registry invariants and produce an entry under `id`.
    pub(crate) fn validate(
        self,
        id: SourceId,
    ) -> Result<PublicationSource, SourceValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SourceValidationError::EmptyName);
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(SourceValidationError::EmptyCategory);
        }

        if self.points < 0 {
            return Err(SourceValidationError::NegativePoints(self.points));
        }
        let points = u32::try_from(self.points)
            .map_err(|_| SourceValidationError::PointsOutOfRange(self.points))?;

        let description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(PublicationSource {
            id,
            name: name.to_string(),
            category: category.to_string(),
            points,
            description,
        })
    }
}

impl From<PublicationSource> for SourceDraft {
    fn from(source: PublicationSource) -> Self {
        Self {
            id: Some(source.id),
            name: source.name,
            category: source.category,
            points: i64::from(source.points),
            description: source.description,
        }
    }
}

/// Reasons an `upsert` is rejected. Nothing is written when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceValidationError {
    #[error("source name must not be empty")]
    EmptyName,
    #[error("source category must not be empty")]
    EmptyCategory,
    #[error("source points must be zero or greater (found {0})")]
    NegativePoints(i64),
    #[error("source points {0} exceed the supported range")]
    PointsOutOfRange(i64),
    #[error("source id must not be empty")]
    EmptyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_and_drops_blank_description() {
        let source = SourceDraft::new("  Nature ", " Top-tier Journal ", 25)
            .with_description("   ")
            .validate(SourceId::from("1"))
            .expect("valid draft");

        assert_eq!(source.name, "Nature");
        assert_eq!(source.category, "Top-tier Journal");
        assert_eq!(source.points, 25);
        assert!(source.description.is_none());
    }

    #[test]
    fn validate_rejects_each_broken_invariant() {
        let id = SourceId::from("x");
        assert_eq!(
            SourceDraft::new(" ", "Workshop", 5).validate(id.clone()),
            Err(SourceValidationError::EmptyName)
        );
        assert_eq!(
            SourceDraft::new("Workshop Paper", "", 5)
                .validate(id.clone()),
            Err(SourceValidationError::EmptyCategory)
        );
        assert_eq!(
            SourceDraft::new("Workshop Paper", "Workshop", -1)
                .validate(id.clone()),
            Err(SourceValidationError::NegativePoints(-1))
        );
        assert_eq!(
            SourceDraft::new("Workshop Paper", "Workshop", i64::from(u32::MAX) + 1).validate(id),
            Err(SourceValidationError::PointsOutOfRange(i64::from(u32::MAX) + 1))
        );
    }

    #[test]
    fn zero_points_are_allowed() {
        let source = SourceDraft::new("Unranked", "Other", 0)
            .validate(SourceId::from("z"))
            .expect("zero is a valid point value");
        assert_eq!(source.points, 0);
    }
}
