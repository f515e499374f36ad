//! Account and platform domain models.
//!
//! An account is a login-capable identity on a [`Platform`]. Plain
//! accounts also stand for identities at external OAuth providers, which
//! OAuth credential secrets point at.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FastcoResult;
use crate::models::base::{Entity, EntityMeta};
use crate::registry::EntityKind;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub username: String,
    pub email: String,
    /// Credential secrets usable to sign in to this account.
    pub credential_ids: Vec<Uuid>,
    pub platform_id: Uuid,
    #[serde(flatten)]
    pub variant: AccountVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum AccountVariant {
    #[serde(rename = "Account")]
    Generic,
    Customer(Customer),
    BankUserAccount(BankUserAccount),
}

/// Purchase history of a customer account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub order_ids: Vec<Uuid>,
    pub review_ids: Vec<Uuid>,
    pub subscription_ids: Vec<Uuid>,
}

/// An online-banking login at a specific bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankUserAccount {
    pub bank_id: Uuid,
    pub bank_account_ids: Vec<Uuid>,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        platform_id: Uuid,
        variant: AccountVariant,
    ) -> Self {
        Self {
            meta: EntityMeta::new(),
            username: username.into(),
            email: email.into(),
            credential_ids: Vec::new(),
            platform_id,
            variant,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match &self.variant {
            AccountVariant::Customer(customer) => Some(customer),
            _ => None,
        }
    }

    pub fn as_bank_user(&self) -> Option<&BankUserAccount> {
        match &self.variant {
            AccountVariant::BankUserAccount(bank_user) => Some(bank_user),
            _ => None,
        }
    }
}

impl Entity for Account {
    const ROOT: EntityKind = EntityKind::Account;

    fn kind(&self) -> EntityKind {
        match self.variant {
            AccountVariant::Generic => EntityKind::Account,
            AccountVariant::Customer(_) => EntityKind::Customer,
            AccountVariant::BankUserAccount(_) => EntityKind::BankUserAccount,
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
        validation::require_text(kind, "username", &self.username)?;
        validation::require_email(kind, "email", &self.email)
    }
}

/// A third-party integration target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Platform {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub web_url: String,
    /// Location of the platform's OpenAPI document.
    pub openapi_url: String,
}

impl Entity for Platform {
    const ROOT: EntityKind = EntityKind::Platform;

    fn kind(&self) -> EntityKind {
        EntityKind::Platform
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Platform;
        validation::require_text(kind, "name", &self.name)?;
        validation::require_url(kind, "logo_url", &self.logo_url)?;
        validation::require_url(kind, "web_url", &self.web_url)?;
        validation::require_url(kind, "openapi_url", &self.openapi_url)
    }
}
