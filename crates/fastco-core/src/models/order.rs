//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::{Entity, EntityMeta};
use crate::registry::EntityKind;
use crate::validation;

/// A purchase placed by a customer account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub customer_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    pub item_ids: Vec<Uuid>,
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    /// Unit price at the time of purchase.
    pub price: Decimal,
}

impl OrderItem {
    /// `price * quantity`. Fails instead of wrapping when the product does
    /// not fit in a `Decimal`.
    pub fn line_total(&self) -> FastcoResult<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                FastcoError::validation(format!(
                    "OrderItem {} line total overflows",
                    self.meta.id
                ))
            })
    }
}

impl Order {
    pub fn new(customer_id: Uuid, status: impl Into<String>) -> Self {
        let meta = EntityMeta::new();
        Self {
            order_date: meta.created_at,
            meta,
            customer_id,
            status: status.into(),
            total_amount: Decimal::ZERO,
            item_ids: Vec::new(),
        }
    }

    /// Sum of the active items that belong to this order.
    pub fn total_from_items(&self, items: &[OrderItem]) -> FastcoResult<Decimal> {
        items
            .iter()
            .filter(|item| item.order_id == self.meta.id && !item.meta.is_deleted())
            .try_fold(Decimal::ZERO, |total, item| {
                total.checked_add(item.line_total()?).ok_or_else(|| {
                    FastcoError::validation(format!("Order {} total overflows", self.meta.id))
                })
            })
    }

    /// Replace `total_amount` with the sum of `items`. On overflow the
    /// stored total is left untouched.
    pub fn recalculate_total(&mut self, items: &[OrderItem]) -> FastcoResult<()> {
        self.total_amount = self.total_from_items(items)?;
        Ok(())
    }
}

impl Entity for Order {
    const ROOT: EntityKind = EntityKind::Order;

    fn kind(&self) -> EntityKind {
        EntityKind::Order
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Order;
        validation::require_text(kind, "status", &self.status)?;
        validation::require_non_negative(kind, "total_amount", self.total_amount)
    }
}

impl Entity for OrderItem {
    const ROOT: EntityKind = EntityKind::OrderItem;

    fn kind(&self) -> EntityKind {
        EntityKind::OrderItem
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        if self.quantity == 0 {
            return Err(FastcoError::validation("OrderItem.quantity must be positive"));
        }
        validation::require_non_negative(EntityKind::OrderItem, "price", self.price)
    }
}
