//! Relationship resolution over the repository layer.
//!
//! Single references fail with `NotFound` when the target is missing or
//! soft-deleted. List references fail on missing targets but skip
//! soft-deleted ones, so relation lists always read as "active" sets.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::account::Account;
use crate::models::base::Entity;
use crate::models::legal_entity::LegalEntity;
use crate::models::order::{Order, OrderItem};
use crate::models::product::ProductCategory;
use crate::registry::EntityKind;
use crate::repository::EntityRepository;

/// Dereference a single id.
pub async fn resolve<E, R>(repo: &R, id: Uuid) -> FastcoResult<E>
where
    E: Entity,
    R: EntityRepository<E>,
{
    repo.get_active(id).await
}

/// Dereference a list of ids, preserving order and skipping soft-deleted
/// targets.
pub async fn resolve_all<E, R>(repo: &R, ids: &[Uuid]) -> FastcoResult<Vec<E>>
where
    E: Entity,
    R: EntityRepository<E>,
{
    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        let entity = repo.get_by_id(*id).await?;
        if !entity.is_deleted() {
            resolved.push(entity);
        }
    }
    Ok(resolved)
}

/// Active `BankUserAccount` accounts of a company.
pub async fn company_bank_user_accounts<R>(
    accounts: &R,
    company: &LegalEntity,
) -> FastcoResult<Vec<Account>>
where
    R: EntityRepository<Account>,
{
    let relations = company.as_company().ok_or_else(|| {
        FastcoError::validation(format!(
            "{} {} is not a Company",
            company.kind(),
            company.meta.id
        ))
    })?;
    let loaded = resolve_all(accounts, &relations.account_ids).await?;
    Ok(relations
        .bank_user_accounts(&loaded)
        .into_iter()
        .cloned()
        .collect())
}

fn cycle(id: Uuid) -> FastcoError {
    FastcoError::CycleDetected {
        entity: EntityKind::ProductCategory.to_string(),
        id: id.to_string(),
    }
}

/// Check that `entity`'s parent chain, as currently stored, ends at a root.
///
/// Every parent must exist (deleted or not) and the walk must never come
/// back to `entity` or revisit a record. Run before persisting any entity
/// that reports a [`Entity::parent_id`].
pub async fn ensure_acyclic<E, R>(repo: &R, entity: &E) -> FastcoResult<()>
where
    E: Entity,
    R: EntityRepository<E>,
{
    let mut seen = HashSet::from([entity.id()]);
    let mut next = entity.parent_id();
    while let Some(id) = next {
        if !seen.insert(id) {
            return Err(FastcoError::CycleDetected {
                entity: E::ROOT.to_string(),
                id: entity.id().to_string(),
            });
        }
        next = repo.get_by_id(id).await?.parent_id();
    }
    Ok(())
}

/// Ids of `start`'s ancestors, nearest first.
///
/// `parent_of` returns the parent id of a category. Fails with
/// `CycleDetected` if the walk revisits a category.
pub fn category_ancestry<F>(start: &ProductCategory, mut parent_of: F) -> FastcoResult<Vec<Uuid>>
where
    F: FnMut(Uuid) -> FastcoResult<Option<Uuid>>,
{
    let mut seen = HashSet::from([start.meta.id]);
    let mut chain = Vec::new();
    let mut next = start.parent_category_id;
    while let Some(id) = next {
        if !seen.insert(id) {
            return Err(cycle(id));
        }
        chain.push(id);
        next = parent_of(id)?;
    }
    Ok(chain)
}

/// The parent of a category: `None` for a root.
pub async fn category_parent<R>(
    repo: &R,
    category: &ProductCategory,
) -> FastcoResult<Option<ProductCategory>>
where
    R: EntityRepository<ProductCategory>,
{
    match category.parent_category_id {
        Some(parent_id) => Ok(Some(resolve(repo, parent_id).await?)),
        None => Ok(None),
    }
}

/// All ancestors of a category, nearest first, ending at the root.
pub async fn category_ancestors<R>(
    repo: &R,
    category: &ProductCategory,
) -> FastcoResult<Vec<ProductCategory>>
where
    R: EntityRepository<ProductCategory>,
{
    let mut seen = HashSet::from([category.meta.id]);
    let mut chain: Vec<ProductCategory> = Vec::new();
    let mut next = category.parent_category_id;
    while let Some(id) = next {
        if !seen.insert(id) {
            return Err(cycle(id));
        }
        let parent: ProductCategory = resolve(repo, id).await?;
        next = parent.parent_category_id;
        chain.push(parent);
    }
    Ok(chain)
}

/// Re-parent a category, rejecting assignments that would close a cycle.
pub async fn assign_parent_category<R>(
    repo: &R,
    category_id: Uuid,
    parent_id: Option<Uuid>,
) -> FastcoResult<ProductCategory>
where
    R: EntityRepository<ProductCategory>,
{
    let mut category: ProductCategory = resolve(repo, category_id).await?;

    if let Some(parent_id) = parent_id {
        if parent_id == category_id {
            return Err(cycle(category_id));
        }
        // The new parent must be live, not merely stored.
        resolve::<ProductCategory, R>(repo, parent_id).await?;
    }

    category.parent_category_id = parent_id;
    ensure_acyclic(repo, &category).await?;
    repo.update(category).await
}

/// Recompute and persist an order's total from its active items.
pub async fn refresh_order_total<O, I>(
    orders: &O,
    items: &I,
    order_id: Uuid,
) -> FastcoResult<Order>
where
    O: EntityRepository<Order>,
    I: EntityRepository<OrderItem>,
{
    let mut order: Order = resolve(orders, order_id).await?;
    let loaded = resolve_all(items, &order.item_ids).await?;
    order.recalculate_total(&loaded)?;
    orders.update(order).await
}
