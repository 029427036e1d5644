//! Entity metadata events dispatched by the host.

use super::entities::{EntityId, SourceImageId};
use super::meta_keys;

/// A metadata write or deletion reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent {
    /// A meta key was added to an entity.
    MetaAdded {
        /// Entity the meta belongs to.
        entity: EntityId,
        /// Meta key.
        key: String,
        /// New value.
        value: String,
    },
    /// An existing meta key was updated.
    MetaUpdated {
        /// Entity the meta belongs to.
        entity: EntityId,
        /// Meta key.
        key: String,
        /// New value.
        value: String,
    },
    /// A meta key was deleted.
    MetaDeleted {
        /// Entity the meta belonged to.
        entity: EntityId,
        /// Meta key.
        key: String,
    },
}

/// What the thumbnail core should do about a [`MetaEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceImageChange {
    /// The source image was set or replaced.
    Changed {
        /// Entity concerned.
        entity: EntityId,
        /// New source image, if the value parsed as one.
        source: Option<SourceImageId>,
    },
    /// The source image was removed.
    Removed {
        /// Entity concerned.
        entity: EntityId,
    },
}

impl MetaEvent {
    /// Creates an added event.
    #[must_use]
    pub fn added(
        entity: impl Into<EntityId>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MetaAdded {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an updated event.
    #[must_use]
    pub fn updated(
        entity: impl Into<EntityId>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MetaUpdated {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a deleted event.
    #[must_use]
    pub fn deleted(entity: impl Into<EntityId>, key: impl Into<String>) -> Self {
        Self::MetaDeleted {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Returns the entity the event refers to.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        match self {
            Self::MetaAdded { entity, .. }
            | Self::MetaUpdated { entity, .. }
            | Self::MetaDeleted { entity, .. } => *entity,
        }
    }

    /// Returns the meta key of the event.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::MetaAdded { key, .. }
            | Self::MetaUpdated { key, .. }
            | Self::MetaDeleted { key, .. } => key,
        }
    }

    /// Narrows the event to a source image change. Other keys yield `None`.
    #[must_use]
    pub fn source_image_change(&self) -> Option<SourceImageChange> {
        if self.key() != meta_keys::SOURCE_IMAGE {
            return None;
        }
        Some(match self {
            Self::MetaAdded { entity, value, .. } | Self::MetaUpdated { entity, value, .. } => {
                SourceImageChange::Changed {
                    entity: *entity,
                    source: SourceImageId::parse(value),
                }
            }
            Self::MetaDeleted { entity, .. } => SourceImageChange::Removed { entity: *entity },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrelated_key_is_ignored() {
        let event = MetaEvent::updated(42, "_edit_lock", "1700000000:1");
        assert_eq!(event.source_image_change(), None);
    }

    #[test]
    fn test_source_image_update() {
        let event = MetaEvent::updated(42, meta_keys::SOURCE_IMAGE, "7");
        assert_eq!(
            event.source_image_change(),
            Some(SourceImageChange::Changed {
                entity: EntityId(42),
                source: Some(SourceImageId(7)),
            })
        );
    }

    #[test]
    fn test_source_image_deleted() {
        let event = MetaEvent::deleted(42, meta_keys::SOURCE_IMAGE);
        assert_eq!(
            event.source_image_change(),
            Some(SourceImageChange::Removed {
                entity: EntityId(42)
            })
        );
        assert_eq!(event.entity(), EntityId(42));
    }
}
