//! Customer-interaction records: reviews, discounts, subscriptions,
//! support cases and feedback.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FastcoError, FastcoResult};
use crate::models::base::{Entity, EntityMeta};
use crate::models::product::BillingCycle;
use crate::registry::{EntityKind, FEEDBACK_TYPES};
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub comment: String,
    pub review_date: DateTime<Utc>,
}

impl Entity for Review {
    const ROOT: EntityKind = EntityKind::Review;

    fn kind(&self) -> EntityKind {
        EntityKind::Review
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        validation::require_range(EntityKind::Review, "rating", self.rating.into(), 1, 5)
    }
}

/// A percentage discount valid between two dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discount {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub code: String,
    pub description: String,
    pub percentage: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub applicable_product_ids: Vec<Uuid>,
}

impl Discount {
    /// Inclusive on both ends. Soft-deleted discounts are never active.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.meta.is_deleted() && self.start_date <= now && now <= self.end_date
    }

    pub fn applies_to(&self, product_id: Uuid) -> bool {
        self.applicable_product_ids.contains(&product_id)
    }

    /// `price` reduced by the discount percentage, rounded to cents.
    pub fn apply(&self, price: Decimal) -> FastcoResult<Decimal> {
        Decimal::ONE_HUNDRED
            .checked_sub(self.percentage)
            .and_then(|rest| rest.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|factor| price.checked_mul(factor))
            .map(|discounted| discounted.round_dp(2))
            .ok_or_else(|| {
                FastcoError::validation(format!("Discount {} overflows on {price}", self.code))
            })
    }
}

impl Entity for Discount {
    const ROOT: EntityKind = EntityKind::Discount;

    fn kind(&self) -> EntityKind {
        EntityKind::Discount
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Discount;
        validation::require_text(kind, "code", &self.code)?;
        validation::require_percentage(kind, "percentage", self.percentage)?;
        validation::require_ordered(kind, "start_date", self.start_date, "end_date", self.end_date)
    }
}

/// A customer's subscription to one tier of a SaaS product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub customer_id: Uuid,
    pub saas_product_id: Uuid,
    pub tier_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub billing_frequency: BillingCycle,
}

impl Subscription {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.meta.is_deleted() && self.start_date <= now && now < self.end_date
    }
}

impl Entity for Subscription {
    const ROOT: EntityKind = EntityKind::Subscription;

    fn kind(&self) -> EntityKind {
        EntityKind::Subscription
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Subscription;
        validation::require_text(kind, "status", &self.status)?;
        validation::require_ordered(kind, "start_date", self.start_date, "end_date", self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerSupportCase {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub issue_description: String,
    pub status: String,
    pub created_date: DateTime<Utc>,
    pub resolved_date: Option<DateTime<Utc>>,
}

impl CustomerSupportCase {
    pub fn is_resolved(&self) -> bool {
        self.resolved_date.is_some()
    }

    pub fn resolve(&mut self, now: DateTime<Utc>, status: impl Into<String>) {
        self.resolved_date = Some(now.max(self.created_date));
        self.status = status.into();
        self.meta.touch(now);
    }
}

impl Entity for CustomerSupportCase {
    const ROOT: EntityKind = EntityKind::CustomerSupportCase;

    fn kind(&self) -> EntityKind {
        EntityKind::CustomerSupportCase
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::CustomerSupportCase;
        validation::require_text(kind, "issue_description", &self.issue_description)?;
        validation::require_text(kind, "status", &self.status)?;
        if let Some(resolved) = self.resolved_date {
            validation::require_ordered(
                kind,
                "created_date",
                self.created_date,
                "resolved_date",
                resolved,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Bug,
    FeatureRequest,
    General,
}

impl FeedbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Bug => FEEDBACK_TYPES[0],
            FeedbackType::FeatureRequest => FEEDBACK_TYPES[1],
            FeedbackType::General => FEEDBACK_TYPES[2],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub feedback_type: FeedbackType,
    pub description: String,
    pub submitted_date: DateTime<Utc>,
    pub status: String,
}

impl Entity for Feedback {
    const ROOT: EntityKind = EntityKind::Feedback;

    fn kind(&self) -> EntityKind {
        EntityKind::Feedback
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    fn validate_fields(&self) -> FastcoResult<()> {
        let kind = EntityKind::Feedback;
        validation::require_text(kind, "description", &self.description)?;
        validation::require_text(kind, "status", &self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn discount(percentage: Decimal) -> Discount {
        let now = Utc::now();
        Discount {
            meta: EntityMeta::new(),
            code: "SPRING".into(),
            description: "Spring sale".into(),
            percentage,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
            applicable_product_ids: vec![],
        }
    }

    #[test]
    fn discount_window_and_application() {
        let mut d = discount(Decimal::new(25, 0));
        let product = Uuid::new_v4();
        d.applicable_product_ids.push(product);

        assert!(d.is_active_at(Utc::now()));
        assert!(!d.is_active_at(d.end_date + Duration::seconds(1)));
        assert!(d.applies_to(product));
        assert!(!d.applies_to(Uuid::new_v4()));
        assert_eq!(d.apply(Decimal::new(4000, 2)).unwrap(), Decimal::new(3000, 2));

        // An unvalidated negative percentage can push the price past the
        // representable range.
        let surcharge = discount(Decimal::new(-100, 0));
        assert!(matches!(
            surcharge.apply(Decimal::MAX),
            Err(FastcoError::Validation { .. })
        ));

        d.meta.mark_deleted(Utc::now());
        assert!(!d.is_active_at(Utc::now()));
    }

    #[test]
    fn discount_over_hundred_percent_is_invalid() {
        assert!(discount(Decimal::new(101, 0)).validate().is_err());
        discount(Decimal::new(100, 0)).validate().unwrap();
    }

    #[test]
    fn review_rating_bounds() {
        let mut review = Review {
            meta: EntityMeta::new(),
            product_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            rating: 5,
            comment: String::new(),
            review_date: Utc::now(),
        };
        review.validate().unwrap();
        review.rating = 0;
        assert!(review.validate().is_err());
    }

    #[test]
    fn support_case_resolution() {
        let now = Utc::now();
        let mut case = CustomerSupportCase {
            meta: EntityMeta::new_at(now),
            customer_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            issue_description: "Login loop".into(),
            status: "open".into(),
            created_date: now,
            resolved_date: None,
        };
        assert!(!case.is_resolved());
        case.resolve(now + Duration::hours(2), "closed");
        assert!(case.is_resolved());
        assert_eq!(case.status, "closed");
        case.validate().unwrap();
    }

    #[test]
    fn subscription_window_is_half_open() {
        let now = Utc::now();
        let sub = Subscription {
            meta: EntityMeta::new(),
            customer_id: Uuid::new_v4(),
            saas_product_id: Uuid::new_v4(),
            tier_id: Uuid::new_v4(),
            start_date: now,
            end_date: now + Duration::days(30),
            status: "active".into(),
            billing_frequency: BillingCycle::Monthly,
        };
        assert!(sub.is_active_at(now));
        assert!(!sub.is_active_at(sub.end_date));
    }

    #[test]
    fn feedback_type_strings() {
        assert_eq!(
            serde_json::to_value(FeedbackType::FeatureRequest).unwrap(),
            "feature_request"
        );
        assert_eq!(FeedbackType::Bug.as_str(), "bug");
    }
}
