//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. One generic trait covers every
//! entity family; implementations store each family in its own table and
//! never physically remove records.

use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::Entity;

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Which records a listing returns with respect to soft deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    /// Only records without `deleted_at`.
    #[default]
    Active,
    /// Only soft-deleted records.
    Deleted,
    /// Raw listing, deleted records included.
    All,
}

impl ListFilter {
    pub fn admits(self, is_deleted: bool) -> bool {
        match self {
            ListFilter::Active => !is_deleted,
            ListFilter::Deleted => is_deleted,
            ListFilter::All => true,
        }
    }
}

pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Validate and store a new record. Fails with `AlreadyExists` if the
    /// id is taken.
    fn insert(&self, entity: E) -> impl Future<Output = FastcoResult<E>> + Send;

    /// Fetch a record whether or not it is soft-deleted.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FastcoResult<E>> + Send;

    /// Validate and overwrite a record. `created_at` and `deleted_at` are
    /// kept from the stored copy; `updated_at` is bumped.
    fn update(&self, entity: E) -> impl Future<Output = FastcoResult<E>> + Send;

    /// Mark a record deleted. Deleting twice keeps the first timestamp.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = FastcoResult<E>> + Send;

    /// Clear the soft-delete marker.
    fn restore(&self, id: Uuid) -> impl Future<Output = FastcoResult<E>> + Send;

    fn list(
        &self,
        filter: ListFilter,
        pagination: Pagination,
    ) -> impl Future<Output = FastcoResult<PaginatedResult<E>>> + Send;

    /// Fetch a record, treating soft-deleted records as missing.
    fn get_active(&self, id: Uuid) -> impl Future<Output = FastcoResult<E>> + Send {
        async move {
            let entity = self.get_by_id(id).await?;
            if entity.is_deleted() {
                return Err(FastcoError::not_found(entity.kind().name(), id));
            }
            Ok(entity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_hides_deleted() {
        let filter = ListFilter::default();
        assert!(filter.admits(false));
        assert!(!filter.admits(true));
        assert!(ListFilter::All.admits(true));
        assert!(!ListFilter::Deleted.admits(false));
    }
}
