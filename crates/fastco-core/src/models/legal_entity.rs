//! Legal entity domain model.
//!
//! A legal entity is either a person ([`LegalEntityVariant::Human`]) or an
//! organization ([`LegalEntityVariant::Company`]). Companies reference the
//! documents, products, accounts and member entities they own by id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::account::Account;
use crate::models::base::{Entity, EntityMeta};
use crate::registry::EntityKind;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalEntity {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(flatten)]
    pub variant: LegalEntityVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum LegalEntityVariant {
    Human,
    Company(Company),
}

/// Company-specific relations. Membership may include other companies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub document_ids: Vec<Uuid>,
    pub product_ids: Vec<Uuid>,
    pub account_ids: Vec<Uuid>,
    pub member_ids: Vec<Uuid>,
}

impl Company {
    /// The company's accounts whose runtime variant is `BankUserAccount`.
    ///
    /// `accounts` is any loaded set of accounts; only those linked through
    /// `account_ids` are considered. Soft-deleted accounts are not filtered
    /// here.
    pub fn bank_user_accounts<'a>(&self, accounts: &'a [Account]) -> Vec<&'a Account> {
        accounts
            .iter()
            .filter(|account| self.account_ids.contains(&account.meta.id))
            .filter(|account| account.as_bank_user().is_some())
            .collect()
    }
}

impl LegalEntity {
    pub fn human(name: impl Into<String>) -> Self {
        Self::with_variant(name, LegalEntityVariant::Human)
    }

    pub fn company(name: impl Into<String>, company: Company) -> Self {
        Self::with_variant(name, LegalEntityVariant::Company(company))
    }

    fn with_variant(name: impl Into<String>, variant: LegalEntityVariant) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            variant,
        }
    }

    pub fn as_company(&self) -> Option<&Company> {
        match &self.variant {
            LegalEntityVariant::Company(company) => Some(company),
            LegalEntityVariant::Human => None,
        }
    }

    pub fn as_company_mut(&mut self) -> Option<&mut Company> {
        match &mut self.variant {
            LegalEntityVariant::Company(company) => Some(company),
            LegalEntityVariant::Human => None,
        }
    }
}

impl Entity for LegalEntity {
    const ROOT: EntityKind = EntityKind::LegalEntity;

    fn kind(&self) -> EntityKind {
        match self.variant {
            LegalEntityVariant::Human => EntityKind::Human,
            LegalEntityVariant::Company(_) => EntityKind::Company,
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
        if let Some(email) = &self.email {
            validation::require_email(kind, "email", email)?;
        }
        validation::optional_text(kind, "phone", self.phone.as_deref())?;
        validation::optional_text(kind, "address", self.address.as_deref())?;

        if let Some(company) = self.as_company()
            && company.member_ids.contains(&self.meta.id)
        {
            return Err(FastcoError::validation(format!(
                "Company {} lists itself as a member",
                self.meta.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{AccountVariant, BankUserAccount, Customer};

    fn account(variant: AccountVariant) -> Account {
        Account::new("user", "user@example.com", Uuid::new_v4(), variant)
    }

    #[test]
    fn human_with_only_required_fields() {
        let human = LegalEntity::human("Ada Lovelace");
        assert_eq!(human.kind(), EntityKind::Human);
        assert!(!human.is_deleted());
        human.validate().unwrap();
    }

    #[test]
    fn bank_user_accounts_filters_by_variant() {
        let customer = account(AccountVariant::Customer(Customer::default()));
        let bank_user = account(AccountVariant::BankUserAccount(BankUserAccount {
            bank_id: Uuid::new_v4(),
            bank_account_ids: vec![],
        }));
        let accounts = vec![customer.clone(), bank_user.clone()];

        let company = Company {
            account_ids: vec![customer.meta.id, bank_user.meta.id],
            ..Default::default()
        };

        let found = company.bank_user_accounts(&accounts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].meta.id, bank_user.meta.id);
    }

    #[test]
    fn bank_user_accounts_ignores_unlinked_accounts() {
        let bank_user = account(AccountVariant::BankUserAccount(BankUserAccount {
            bank_id: Uuid::new_v4(),
            bank_account_ids: vec![],
        }));
        let company = Company::default();
        assert!(company.bank_user_accounts(&[bank_user]).is_empty());
    }

    #[test]
    fn company_cannot_be_its_own_member() {
        let mut company = LegalEntity::company("ACME", Company::default());
        let own_id = company.meta.id;
        company.as_company_mut().unwrap().member_ids.push(own_id);
        assert!(matches!(
            company.validate(),
            Err(FastcoError::Validation { .. })
        ));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut human = LegalEntity::human("Grace");
        human.email = Some("not-an-email".into());
        assert!(human.validate().is_err());
    }
}
