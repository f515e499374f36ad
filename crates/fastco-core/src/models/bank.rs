//! Banking sub-domain: banks, bank accounts and cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::{Entity, EntityMeta};
use crate::registry::EntityKind;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bank {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub address: String,
}

impl Entity for Bank {
    const ROOT: EntityKind = EntityKind::Bank;

    fn kind(&self) -> EntityKind {
        EntityKind::Bank
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_text(EntityKind::Bank, "name", &self.name)
    }
}

/// A deposit account owned by a bank user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankAccount {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub address: String,
    pub number: String,
    pub routing_number: String,
    pub bank_user_account_id: Uuid,
    #[serde(flatten)]
    pub variant: BankAccountVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum BankAccountVariant {
    CheckingAccount(CheckingAccount),
    SavingsAccount(SavingsAccount),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckingAccount {
    pub card_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavingsAccount {
    pub fdic_code: String,
    pub fdic_sub_code: String,
    pub fdic_sub_code_description: String,
}

impl BankAccount {
    pub fn as_checking(&self) -> Option<&CheckingAccount> {
        match &self.variant {
            BankAccountVariant::CheckingAccount(checking) => Some(checking),
            BankAccountVariant::SavingsAccount(_) => None,
        }
    }

    pub fn as_savings(&self) -> Option<&SavingsAccount> {
        match &self.variant {
            BankAccountVariant::SavingsAccount(savings) => Some(savings),
            BankAccountVariant::CheckingAccount(_) => None,
        }
    }
}

impl Entity for BankAccount {
    const ROOT: EntityKind = EntityKind::BankAccount;

    fn kind(&self) -> EntityKind {
        match self.variant {
            BankAccountVariant::CheckingAccount(_) => EntityKind::CheckingAccount,
            BankAccountVariant::SavingsAccount(_) => EntityKind::SavingsAccount,
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
        validation::require_text(kind, "number", &self.number)?;
        validation::require_text(kind, "routing_number", &self.routing_number)?;
        if let BankAccountVariant::SavingsAccount(savings) = &self.variant {
            validation::require_text(kind, "fdic_code", &savings.fdic_code)?;
        }
        Ok(())
    }
}

/// A payment card issued against a checking account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Cardholder name.
    pub name: String,
    pub address: String,
    pub number: String,
    pub expiration_date: DateTime<Utc>,
    pub cvv: String,
    pub bank_account_id: Uuid,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl Card {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }

    /// Card number with all but the last four digits hidden.
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.number.chars().collect();
        let visible = digits.len().saturating_sub(4);
        digits
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

impl Entity for Card {
    const ROOT: EntityKind = EntityKind::Card;

    fn kind(&self) -> EntityKind {
        EntityKind::Card
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Card;
        validation::require_text(kind, "name", &self.name)?;
        if !all_digits(&self.number) || !(12..=19).contains(&self.number.len()) {
            return Err(FastcoError::validation(
                "Card.number must be 12 to 19 digits",
            ));
        }
        if !all_digits(&self.cvv) || !(3..=4).contains(&self.cvv.len()) {
            return Err(FastcoError::validation("Card.cvv must be 3 or 4 digits"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn card(number: &str, cvv: &str) -> Card {
        Card {
            meta: EntityMeta::new(),
            name: "J DOE".into(),
            address: "1 Main St".into(),
            number: number.into(),
            expiration_date: Utc::now() + Duration::days(365),
            cvv: cvv.into(),
            bank_account_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn card_number_shape() {
        card("4242424242424242", "123").validate().unwrap();
        assert!(card("4242-4242", "123").validate().is_err());
        assert!(card("4242424242424242", "12a").validate().is_err());
    }

    #[test]
    fn masking_keeps_last_four() {
        assert_eq!(card("4242424242424242", "123").masked_number(), "************4242");
        assert_eq!(card("42", "123").masked_number(), "42");
    }

    #[test]
    fn expiry() {
        let c = card("4242424242424242", "123");
        assert!(!c.is_expired_at(Utc::now()));
        assert!(c.is_expired_at(c.expiration_date + Duration::seconds(1)));
    }

    #[test]
    fn bank_account_variants() {
        let savings = BankAccount {
            meta: EntityMeta::new(),
            name: "Rainy day".into(),
            address: "1 Main St".into(),
            number: "000123".into(),
            routing_number: "021000021".into(),
            bank_user_account_id: Uuid::new_v4(),
            variant: BankAccountVariant::SavingsAccount(SavingsAccount {
                fdic_code: "FDIC-1".into(),
                fdic_sub_code: "A".into(),
                fdic_sub_code_description: "Standard".into(),
            }),
        };
        assert_eq!(savings.kind(), EntityKind::SavingsAccount);
        assert!(savings.as_checking().is_none());
        assert!(savings.as_savings().is_some());
        savings.validate().unwrap();
    }
}
