//! SurrealDB implementation of [`EntityRepository`] shared by every entity
//! family.
//!
//! Records live in the family's table under `type::record(table, id)`. The
//! serialized entity is stored whole in `body`; `kind`, `schema_version`
//! and the timestamps are mirrored into typed columns on every write.

use std::marker::PhantomData;

use chrono::Utc;
use fastco_core::error::{FastcoError, FastcoResult};
use fastco_core::models::account::{Account, Platform};
use fastco_core::models::bank::{Bank, BankAccount, Card};
use fastco_core::models::credential::AuthCredentialSecret;
use fastco_core::models::document::{Action, Document};
use fastco_core::models::engagement::{
    CustomerSupportCase, Discount, Feedback, Review, Subscription,
};
use fastco_core::models::legal_entity::LegalEntity;
use fastco_core::models::order::{Order, OrderItem};
use fastco_core::models::product::{Inventory, Product, ProductCategory, SubscriptionTier};
use fastco_core::relations;
use fastco_core::repository::{EntityRepository, ListFilter, PaginatedResult, Pagination};
use fastco_core::{Entity, SCHEMA_VERSION};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row; only the body is read back.
#[derive(Debug, SurrealValue)]
struct EntityRow {
    body: serde_json::Value,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Decode a stored body, rejecting shapes written by a newer build.
fn decode<E: Entity>(body: serde_json::Value) -> FastcoResult<E> {
    let version = body
        .get("_schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(u64::from(SCHEMA_VERSION));
    if version > u64::from(SCHEMA_VERSION) {
        return Err(FastcoError::UnsupportedSchemaVersion {
            found: u32::try_from(version).unwrap_or(u32::MAX),
            supported: SCHEMA_VERSION,
        });
    }
    let entity = serde_json::from_value(body).map_err(DbError::from)?;
    Ok(entity)
}

/// Map a failed write. A `CREATE` that loses a race with another insert of
/// the same id surfaces as `AlreadyExists`, like the pre-check does.
fn write_error<E: Entity>(verb: &str, id: &str, err: impl std::fmt::Display) -> FastcoError {
    let message = err.to_string();
    if verb == "CREATE" && message.contains("already exists") {
        return FastcoError::AlreadyExists {
            entity: E::ROOT.name().into(),
            id: id.into(),
        };
    }
    DbError::Query(message).into()
}

fn where_clause(filter: ListFilter) -> &'static str {
    match filter {
        ListFilter::Active => "WHERE deleted_at = NONE",
        ListFilter::Deleted => "WHERE deleted_at != NONE",
        ListFilter::All => "",
    }
}

/// Generic SurrealDB repository for one entity family.
#[derive(Clone)]
pub struct SurrealEntityRepository<C: Connection, E> {
    db: Surreal<C>,
    _entity: PhantomData<fn() -> E>,
}

impl<C: Connection, E: Entity> SurrealEntityRepository<C, E> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    fn not_found(id: Uuid) -> FastcoError {
        FastcoError::not_found(E::ROOT.name(), id)
    }

    /// Load a record by id, deleted or not.
    async fn fetch(&self, id: Uuid) -> FastcoResult<Option<E>> {
        let query = format!("SELECT * FROM type::record('{}', $id)", E::table());

        let mut result = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter().next().map(|row| decode(row.body)).transpose()
    }

    /// Write the full record with `verb` (`CREATE` or `UPDATE`), keeping the
    /// typed columns in step with the body.
    async fn write(&self, verb: &str, entity: &E) -> FastcoResult<E> {
        let meta = entity.meta();
        let id_str = meta.id.to_string();
        let body = serde_json::to_value(entity)?;

        let query = format!(
            "{verb} type::record('{}', $id) SET \
             kind = $kind, \
             schema_version = $schema_version, \
             body = $body, \
             created_at = $created_at, \
             updated_at = $updated_at, \
             deleted_at = $deleted_at",
            E::table()
        );

        let result = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("kind", entity.kind().name()))
            .bind(("schema_version", meta.schema_version))
            .bind(("body", body))
            .bind(("created_at", meta.created_at))
            .bind(("updated_at", meta.updated_at))
            .bind(("deleted_at", meta.deleted_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| write_error::<E>(verb, &id_str, e))?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: E::ROOT.name().into(),
            id: id_str,
        })?;

        decode(row.body)
    }
}

impl<C: Connection, E: Entity> EntityRepository<E> for SurrealEntityRepository<C, E> {
    async fn insert(&self, entity: E) -> FastcoResult<E> {
        entity.validate()?;

        if self.fetch(entity.id()).await?.is_some() {
            return Err(FastcoError::AlreadyExists {
                entity: E::ROOT.name().into(),
                id: entity.id().to_string(),
            });
        }
        relations::ensure_acyclic(self, &entity).await?;

        self.write("CREATE", &entity).await
    }

    async fn get_by_id(&self, id: Uuid) -> FastcoResult<E> {
        self.fetch(id).await?.ok_or_else(|| Self::not_found(id))
    }

    async fn update(&self, mut entity: E) -> FastcoResult<E> {
        let id = entity.id();
        let stored = self.fetch(id).await?.ok_or_else(|| Self::not_found(id))?;

        let meta = entity.meta_mut();
        meta.created_at = stored.meta().created_at;
        meta.deleted_at = stored.meta().deleted_at;
        meta.schema_version = SCHEMA_VERSION;
        meta.touch(Utc::now());

        entity.validate()?;
        relations::ensure_acyclic(self, &entity).await?;
        self.write("UPDATE", &entity).await
    }

    async fn soft_delete(&self, id: Uuid) -> FastcoResult<E> {
        let mut entity = self.get_by_id(id).await?;
        if entity.is_deleted() {
            return Ok(entity);
        }

        entity.meta_mut().mark_deleted(Utc::now());
        debug!(entity = E::ROOT.name(), %id, "Soft-deleting record");
        self.write("UPDATE", &entity).await
    }

    async fn restore(&self, id: Uuid) -> FastcoResult<E> {
        let mut entity = self.get_by_id(id).await?;
        if !entity.is_deleted() {
            return Ok(entity);
        }

        entity.meta_mut().restore(Utc::now());
        debug!(entity = E::ROOT.name(), %id, "Restoring record");
        self.write("UPDATE", &entity).await
    }

    async fn list(
        &self,
        filter: ListFilter,
        pagination: Pagination,
    ) -> FastcoResult<PaginatedResult<E>> {
        let table = E::table();
        let filter_sql = where_clause(filter);

        let count_query = format!("SELECT count() AS total FROM {table} {filter_sql} GROUP ALL");
        let mut count_result = self
            .db
            .query(&count_query)
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT * FROM {table} {filter_sql} \
             ORDER BY created_at ASC, id ASC \
             LIMIT $limit START $offset"
        );
        let mut result = self
            .db
            .query(&query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| decode(row.body))
            .collect::<FastcoResult<Vec<E>>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

pub type LegalEntityRepository<C> = SurrealEntityRepository<C, LegalEntity>;
pub type DocumentRepository<C> = SurrealEntityRepository<C, Document>;
pub type ActionRepository<C> = SurrealEntityRepository<C, Action>;
pub type AccountRepository<C> = SurrealEntityRepository<C, Account>;
pub type PlatformRepository<C> = SurrealEntityRepository<C, Platform>;
pub type CredentialSecretRepository<C> = SurrealEntityRepository<C, AuthCredentialSecret>;
pub type BankRepository<C> = SurrealEntityRepository<C, Bank>;
pub type BankAccountRepository<C> = SurrealEntityRepository<C, BankAccount>;
pub type CardRepository<C> = SurrealEntityRepository<C, Card>;
pub type ProductRepository<C> = SurrealEntityRepository<C, Product>;
pub type SubscriptionTierRepository<C> = SurrealEntityRepository<C, SubscriptionTier>;
pub type ProductCategoryRepository<C> = SurrealEntityRepository<C, ProductCategory>;
pub type InventoryRepository<C> = SurrealEntityRepository<C, Inventory>;
pub type OrderRepository<C> = SurrealEntityRepository<C, Order>;
pub type OrderItemRepository<C> = SurrealEntityRepository<C, OrderItem>;
pub type ReviewRepository<C> = SurrealEntityRepository<C, Review>;
pub type DiscountRepository<C> = SurrealEntityRepository<C, Discount>;
pub type SubscriptionRepository<C> = SurrealEntityRepository<C, Subscription>;
pub type SupportCaseRepository<C> = SurrealEntityRepository<C, CustomerSupportCase>;
pub type FeedbackRepository<C> = SurrealEntityRepository<C, Feedback>;
