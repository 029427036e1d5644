//! Content entity (post) as seen by the thumbnail core.

use serde::{Deserialize, Serialize};

/// Unique identifier for a content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of the attachment used as an entity's source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceImageId(pub u64);

impl SourceImageId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Parses a stored meta value. Zero and non-numeric values are not ids.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(id) => Some(Self(id)),
        }
    }
}

impl std::fmt::Display for SourceImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SourceImageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Publication status of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// Publicly visible.
    #[default]
    Publish,
    /// Not yet published.
    Draft,
    /// Moved to the trash.
    Trash,
}

/// Snapshot of the host-side entity fields the thumbnail core cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInfo {
    /// Entity identifier.
    pub id: EntityId,
    /// Entity kind (`"post"`, `"page"`, custom kinds).
    pub kind: String,
    /// Publication status.
    pub status: EntityStatus,
    /// True when the entity is a stored revision of another entity.
    pub is_revision: bool,
}

impl EntityInfo {
    /// Creates a published, non-revision entity of the given kind.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            status: EntityStatus::Publish,
            is_revision: false,
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the entity as a revision.
    #[must_use]
    pub const fn as_revision(mut self) -> Self {
        self.is_revision = true;
        self
    }

    /// Returns true if thumbnails may be generated for this entity.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.is_revision && self.status != EntityStatus::Trash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_image_id_parse() {
        assert_eq!(SourceImageId::parse("7"), Some(SourceImageId(7)));
        assert_eq!(SourceImageId::parse(" 9 "), Some(SourceImageId(9)));
        assert_eq!(SourceImageId::parse("0"), None);
        assert_eq!(SourceImageId::parse(""), None);
        assert_eq!(SourceImageId::parse("abc"), None);
    }

    #[test]
    fn test_eligibility() {
        assert!(EntityInfo::new(1, "post").is_eligible());
        assert!(
            EntityInfo::new(1, "post")
                .with_status(EntityStatus::Draft)
                .is_eligible()
        );
        assert!(
            !EntityInfo::new(1, "post")
                .with_status(EntityStatus::Trash)
                .is_eligible()
        );
        assert!(!EntityInfo::new(1, "post").as_revision().is_eligible());
    }
}
