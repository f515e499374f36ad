//! The base record shape shared by every entity.
//!
//! Every stored record carries an identifier, creation and update
//! timestamps, an optional soft-delete marker and the schema revision that
//! produced it. Deletion is always logical: records are never removed, only
//! marked with `deleted_at`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::registry::EntityKind;

/// Field-shape revision produced by this build.
pub const SCHEMA_VERSION: u32 = 1;

fn current_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Identity, timestamps and soft-delete state of a record.
///
/// Flattened into every entity when serialized, so the wire form has
/// `id`, `created_at`, `updated_at`, `deleted_at` and `_schema_version`
/// at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. `Some` means the record is logically deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "_schema_version", default = "current_schema_version")]
    pub schema_version: u32,
}

impl EntityMeta {
    /// Fresh metadata: new id, `created_at == updated_at == now`.
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Bump `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Soft-delete. Re-deleting keeps the original timestamp.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now.max(self.created_at));
            self.touch(now);
        }
    }

    pub fn restore(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.take().is_some() {
            self.touch(now);
        }
    }

    /// Reject records written by a newer schema revision.
    pub fn check_schema_version(&self) -> FastcoResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(FastcoError::UnsupportedSchemaVersion {
                found: self.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    pub fn validate(&self, kind: EntityKind) -> FastcoResult<()> {
        if self.updated_at < self.created_at {
            return Err(FastcoError::validation(format!(
                "{kind}.updated_at must not precede created_at"
            )));
        }
        if let Some(deleted_at) = self.deleted_at
            && deleted_at < self.created_at
        {
            return Err(FastcoError::validation(format!(
                "{kind}.deleted_at must not precede created_at"
            )));
        }
        if self.schema_version == 0 {
            return Err(FastcoError::validation(format!(
                "{kind}._schema_version must be at least 1"
            )));
        }
        self.check_schema_version()
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A record rooted at the base shape.
///
/// Implementors are plain values: cloning yields an independent copy and
/// mutation only ever touches that copy.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Schema kind of the family root, used for storage and error messages.
    const ROOT: EntityKind;

    /// Runtime variant of this record.
    fn kind(&self) -> EntityKind;

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    /// Entity-specific field checks. Base-shape checks run in
    /// [`Entity::validate`].
    fn validate_fields(&self) -> FastcoResult<()>;

    fn id(&self) -> Uuid {
        self.meta().id
    }

    /// Record of the same family this one hangs under, for self-referential
    /// hierarchies. Stores refuse writes that would make the chain cyclic.
    fn parent_id(&self) -> Option<Uuid> {
        None
    }

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted()
    }

    fn validate(&self) -> FastcoResult<()> {
        self.meta().validate(self.kind())?;
        self.validate_fields()
    }

    /// Storage table of this entity's family.
    fn table() -> &'static str {
        Self::ROOT.table().unwrap_or("entity")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_meta_is_live_and_current() {
        let meta = EntityMeta::new();
        assert!(!meta.is_deleted());
        assert_eq!(meta.created_at, meta.updated_at);
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        meta.validate(EntityKind::Document).unwrap();
    }

    #[test]
    fn mark_deleted_sets_flag_and_bumps_updated_at() {
        let start = Utc::now();
        let mut meta = EntityMeta::new_at(start);
        let later = start + Duration::seconds(30);
        meta.mark_deleted(later);
        assert!(meta.is_deleted());
        assert_eq!(meta.deleted_at, Some(later));
        assert_eq!(meta.updated_at, later);

        // Second delete keeps the first timestamp.
        meta.mark_deleted(later + Duration::seconds(30));
        assert_eq!(meta.deleted_at, Some(later));
    }

    #[test]
    fn restore_clears_flag() {
        let start = Utc::now();
        let mut meta = EntityMeta::new_at(start);
        meta.mark_deleted(start + Duration::seconds(1));
        meta.restore(start + Duration::seconds(2));
        assert!(!meta.is_deleted());
        assert_eq!(meta.updated_at, start + Duration::seconds(2));
    }

    #[test]
    fn touch_never_precedes_creation() {
        let start = Utc::now();
        let mut meta = EntityMeta::new_at(start);
        meta.touch(start - Duration::hours(1));
        assert_eq!(meta.updated_at, start);
    }

    #[test]
    fn rejects_inverted_timestamps() {
        let start = Utc::now();
        let mut meta = EntityMeta::new_at(start);
        meta.updated_at = start - Duration::seconds(1);
        assert!(matches!(
            meta.validate(EntityKind::Card),
            Err(FastcoError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_newer_schema_version() {
        let mut meta = EntityMeta::new();
        meta.schema_version = SCHEMA_VERSION + 1;
        assert!(matches!(
            meta.validate(EntityKind::Card),
            Err(FastcoError::UnsupportedSchemaVersion { .. })
        ));
    }

    #[test]
    fn schema_version_defaults_when_absent() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        });
        let meta: EntityMeta = serde_json::from_value(json).unwrap();
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert!(!meta.is_deleted());
    }
}
