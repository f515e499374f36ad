//! Catalog sub-domain: products, subscription tiers, categories and
//! inventory.
//!
//! Prices are `rust_decimal::Decimal` and serialize as strings, so no
//! precision is lost across the schema boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::{Entity, EntityMeta};
use crate::registry::{BILLING_CYCLES, EntityKind, PRODUCT_TYPES};
use crate::validation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Physical,
    Digital,
    Service,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Physical => PRODUCT_TYPES[0],
            ProductType::Digital => PRODUCT_TYPES[1],
            ProductType::Service => PRODUCT_TYPES[2],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Weekly => BILLING_CYCLES[0],
            BillingCycle::Monthly => BILLING_CYCLES[1],
            BillingCycle::Quarterly => BILLING_CYCLES[2],
            BillingCycle::Yearly => BILLING_CYCLES[3],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sku: String,
    pub category_id: Uuid,
    pub product_type: ProductType,
    #[serde(flatten)]
    pub variant: ProductVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum ProductVariant {
    #[serde(rename = "Product")]
    Standard,
    Service(Service),
    #[serde(rename = "SaaSProduct")]
    SaasProduct(SaasProduct),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    /// Length of one session, in minutes.
    pub duration: u32,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaasProduct {
    pub subscription_tier_ids: Vec<Uuid>,
    pub features: Vec<String>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Decimal,
        category_id: Uuid,
        product_type: ProductType,
        variant: ProductVariant,
    ) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            description: String::new(),
            price,
            sku: sku.into(),
            category_id,
            product_type,
            variant,
        }
    }

    pub fn as_service(&self) -> Option<&Service> {
        match &self.variant {
            ProductVariant::Service(service) => Some(service),
            _ => None,
        }
    }

    pub fn as_saas(&self) -> Option<&SaasProduct> {
        match &self.variant {
            ProductVariant::SaasProduct(saas) => Some(saas),
            _ => None,
        }
    }
}

impl Entity for Product {
    const ROOT: EntityKind = EntityKind::Product;

    fn kind(&self) -> EntityKind {
        match self.variant {
            ProductVariant::Standard => EntityKind::Product,
            ProductVariant::Service(_) => EntityKind::Service,
            ProductVariant::SaasProduct(_) => EntityKind::SaasProduct,
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = self.kind();
        validation::require_text(kind, "name", &self.name)?;
        validation::require_text(kind, "sku", &self.sku)?;
        validation::require_non_negative(kind, "price", self.price)?;
        if let ProductVariant::Service(service) = &self.variant
            && service.duration == 0
        {
            return Err(FastcoError::validation(
                "Service.duration must be positive",
            ));
        }
        Ok(())
    }
}

/// A pricing level of a SaaS product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionTier {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub price: Decimal,
    pub billing_cycle: BillingCycle,
    pub features: Vec<String>,
}

impl Entity for SubscriptionTier {
    const ROOT: EntityKind = EntityKind::SubscriptionTier;

    fn kind(&self) -> EntityKind {
        EntityKind::SubscriptionTier
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::SubscriptionTier;
        validation::require_text(kind, "name", &self.name)?;
        validation::require_non_negative(kind, "price", self.price)
    }
}

/// A node in the category tree. Roots have no parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductCategory {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    pub parent_category_id: Option<Uuid>,
}

impl ProductCategory {
    pub fn new(name: impl Into<String>, parent_category_id: Option<Uuid>) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            description: String::new(),
            parent_category_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_category_id.is_none()
    }
}

impl Entity for ProductCategory {
    const ROOT: EntityKind = EntityKind::ProductCategory;

    fn kind(&self) -> EntityKind {
        EntityKind::ProductCategory
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_category_id
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_text(EntityKind::ProductCategory, "name", &self.name)?;
        if self.parent_category_id == Some(self.meta.id) {
            return Err(FastcoError::CycleDetected {
                entity: EntityKind::ProductCategory.to_string(),
                id: self.meta.id.to_string(),
            });
        }
        Ok(())
    }
}

/// Stock of a product at one location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub product_id: Uuid,
    pub quantity: u32,
    pub location: String,
}

impl Inventory {
    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

impl Entity for Inventory {
    const ROOT: EntityKind = EntityKind::Inventory;

    fn kind(&self) -> EntityKind {
        EntityKind::Inventory
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_text(EntityKind::Inventory, "location", &self.location)
    }
}
