//! Entity schema registry.
//!
//! A static dictionary from entity-type name to its field shape and its
//! single-inheritance chain rooted at [`EntityKind::BaseEntity`]. Field
//! names here are the serialized names of the model types in
//! [`crate::models`]; the two are kept in lockstep by tests.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::FastcoError;
use crate::models::base::SCHEMA_VERSION;

/// Allowed values of `Product.product_type`.
pub const PRODUCT_TYPES: &[&str] = &["physical", "digital", "service"];

/// Allowed values of billing cycles and billing frequencies.
pub const BILLING_CYCLES: &[&str] = &["weekly", "monthly", "quarterly", "yearly"];

/// Allowed values of `Feedback.feedback_type`.
pub const FEEDBACK_TYPES: &[&str] = &["bug", "feature_request", "general"];

/// Every entity type in the schema, abstract ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    BaseEntity,
    LegalEntity,
    Human,
    Company,
    Document,
    Action,
    DocumentSubmission,
    Account,
    Customer,
    BankUserAccount,
    Platform,
    AuthCredentialSecret,
    PasswordCredentialSecret,
    MfaCredentialSecret,
    OAuthCredentialSecret,
    GoogleOAuthCredentialSecret,
    AppleOAuthCredentialSecret,
    FacebookOAuthCredentialSecret,
    TwitterOAuthCredentialSecret,
    EmailMagicLinkCredentialSecret,
    Bank,
    BankAccount,
    CheckingAccount,
    SavingsAccount,
    Card,
    Product,
    Service,
    SaasProduct,
    SubscriptionTier,
    ProductCategory,
    Inventory,
    Order,
    OrderItem,
    Review,
    Discount,
    Subscription,
    CustomerSupportCase,
    Feedback,
}

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    Id,
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
    TextList,
    /// Text restricted to the listed values.
    Enum(&'static [&'static str]),
    /// Identifier of another entity.
    Ref(EntityKind),
    /// Identifiers of other entities; order is not significant.
    RefList(EntityKind),
}

/// A single named, typed field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub required: bool,
}

impl FieldDef {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Field tables
// ---------------------------------------------------------------------------

use FieldType::{
    Boolean, Decimal, Enum, Id, Integer, Ref, RefList, Text, TextList, Timestamp,
};

static BASE_ENTITY_FIELDS: &[FieldDef] = &[
    FieldDef::required("id", Id),
    FieldDef::required("created_at", Timestamp),
    FieldDef::required("updated_at", Timestamp),
    FieldDef::optional("deleted_at", Timestamp),
    FieldDef::required("_schema_version", Integer),
];

static LEGAL_ENTITY_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::optional("email", Text),
    FieldDef::optional("phone", Text),
    FieldDef::optional("address", Text),
];

static COMPANY_FIELDS: &[FieldDef] = &[
    FieldDef::required("document_ids", RefList(EntityKind::Document)),
    FieldDef::required("product_ids", RefList(EntityKind::Product)),
    FieldDef::required("account_ids", RefList(EntityKind::Account)),
    FieldDef::required("member_ids", RefList(EntityKind::LegalEntity)),
];

static DOCUMENT_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("type", Text),
    FieldDef::required("content", Text),
];

static ACTION_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("description", Text),
];

static DOCUMENT_SUBMISSION_FIELDS: &[FieldDef] = &[
    FieldDef::required("document_id", Ref(EntityKind::Document)),
    FieldDef::required("submitted_by_id", Ref(EntityKind::LegalEntity)),
];

static ACCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::required("username", Text),
    FieldDef::required("email", Text),
    FieldDef::required(
        "credential_ids",
        RefList(EntityKind::AuthCredentialSecret),
    ),
    FieldDef::required("platform_id", Ref(EntityKind::Platform)),
];

static CUSTOMER_FIELDS: &[FieldDef] = &[
    FieldDef::required("order_ids", RefList(EntityKind::Order)),
    FieldDef::required("review_ids", RefList(EntityKind::Review)),
    FieldDef::required("subscription_ids", RefList(EntityKind::Subscription)),
];

static BANK_USER_ACCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::required("bank_id", Ref(EntityKind::Bank)),
    FieldDef::required("bank_account_ids", RefList(EntityKind::BankAccount)),
];

static PLATFORM_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("description", Text),
    FieldDef::required("logo_url", Text),
    FieldDef::required("web_url", Text),
    FieldDef::required("openapi_url", Text),
];

static PASSWORD_CREDENTIAL_FIELDS: &[FieldDef] = &[FieldDef::required("password_hash", Text)];

static MFA_CREDENTIAL_FIELDS: &[FieldDef] = &[FieldDef::required("mfa_secret", Text)];

static GOOGLE_OAUTH_FIELDS: &[FieldDef] = &[FieldDef::required(
    "google_account_id",
    Ref(EntityKind::Account),
)];

static APPLE_OAUTH_FIELDS: &[FieldDef] = &[FieldDef::required(
    "apple_account_id",
    Ref(EntityKind::Account),
)];

static FACEBOOK_OAUTH_FIELDS: &[FieldDef] = &[FieldDef::required(
    "facebook_account_id",
    Ref(EntityKind::Account),
)];

static TWITTER_OAUTH_FIELDS: &[FieldDef] = &[FieldDef::required(
    "twitter_account_id",
    Ref(EntityKind::Account),
)];

static BANK_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("address", Text),
];

static BANK_ACCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("address", Text),
    FieldDef::required("number", Text),
    FieldDef::required("routing_number", Text),
    FieldDef::required(
        "bank_user_account_id",
        Ref(EntityKind::BankUserAccount),
    ),
];

static CHECKING_ACCOUNT_FIELDS: &[FieldDef] =
    &[FieldDef::required("card_ids", RefList(EntityKind::Card))];

static SAVINGS_ACCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::required("fdic_code", Text),
    FieldDef::required("fdic_sub_code", Text),
    FieldDef::required("fdic_sub_code_description", Text),
];

static CARD_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("address", Text),
    FieldDef::required("number", Text),
    FieldDef::required("expiration_date", Timestamp),
    FieldDef::required("cvv", Text),
    FieldDef::required("bank_account_id", Ref(EntityKind::BankAccount)),
];

static PRODUCT_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("description", Text),
    FieldDef::required("price", Decimal),
    FieldDef::required("sku", Text),
    FieldDef::required("category_id", Ref(EntityKind::ProductCategory)),
    FieldDef::required("product_type", Enum(PRODUCT_TYPES)),
];

static SERVICE_FIELDS: &[FieldDef] = &[
    FieldDef::required("duration", Integer),
    FieldDef::required("is_recurring", Boolean),
];

static SAAS_PRODUCT_FIELDS: &[FieldDef] = &[
    FieldDef::required(
        "subscription_tier_ids",
        RefList(EntityKind::SubscriptionTier),
    ),
    FieldDef::required("features", TextList),
];

static SUBSCRIPTION_TIER_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("price", Decimal),
    FieldDef::required("billing_cycle", Enum(BILLING_CYCLES)),
    FieldDef::required("features", TextList),
];

static PRODUCT_CATEGORY_FIELDS: &[FieldDef] = &[
    FieldDef::required("name", Text),
    FieldDef::required("description", Text),
    FieldDef::optional(
        "parent_category_id",
        Ref(EntityKind::ProductCategory),
    ),
];

static INVENTORY_FIELDS: &[FieldDef] = &[
    FieldDef::required("product_id", Ref(EntityKind::Product)),
    FieldDef::required("quantity", Integer),
    FieldDef::required("location", Text),
];

static ORDER_FIELDS: &[FieldDef] = &[
    FieldDef::required("customer_id", Ref(EntityKind::Customer)),
    FieldDef::required("order_date", Timestamp),
    FieldDef::required("status", Text),
    FieldDef::required("total_amount", Decimal),
    FieldDef::required("item_ids", RefList(EntityKind::OrderItem)),
];

static ORDER_ITEM_FIELDS: &[FieldDef] = &[
    FieldDef::required("order_id", Ref(EntityKind::Order)),
    FieldDef::required("product_id", Ref(EntityKind::Product)),
    FieldDef::required("quantity", Integer),
    FieldDef::required("price", Decimal),
];

static REVIEW_FIELDS: &[FieldDef] = &[
    FieldDef::required("product_id", Ref(EntityKind::Product)),
    FieldDef::required("customer_id", Ref(EntityKind::Customer)),
    FieldDef::required("rating", Integer),
    FieldDef::required("comment", Text),
    FieldDef::required("review_date", Timestamp),
];

static DISCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::required("code", Text),
    FieldDef::required("description", Text),
    FieldDef::required("percentage", Decimal),
    FieldDef::required("start_date", Timestamp),
    FieldDef::required("end_date", Timestamp),
    FieldDef::required("applicable_product_ids", RefList(EntityKind::Product)),
];

static SUBSCRIPTION_FIELDS: &[FieldDef] = &[
    FieldDef::required("customer_id", Ref(EntityKind::Customer)),
    FieldDef::required("saas_product_id", Ref(EntityKind::SaasProduct)),
    FieldDef::required("tier_id", Ref(EntityKind::SubscriptionTier)),
    FieldDef::required("start_date", Timestamp),
    FieldDef::required("end_date", Timestamp),
    FieldDef::required("status", Text),
    FieldDef::required("billing_frequency", Enum(BILLING_CYCLES)),
];

static CUSTOMER_SUPPORT_CASE_FIELDS: &[FieldDef] = &[
    FieldDef::required("customer_id", Ref(EntityKind::Customer)),
    FieldDef::required("product_id", Ref(EntityKind::Product)),
    FieldDef::required("issue_description", Text),
    FieldDef::required("status", Text),
    FieldDef::required("created_date", Timestamp),
    FieldDef::optional("resolved_date", Timestamp),
];

static FEEDBACK_FIELDS: &[FieldDef] = &[
    FieldDef::required("customer_id", Ref(EntityKind::Customer)),
    FieldDef::required("product_id", Ref(EntityKind::Product)),
    FieldDef::required("feedback_type", Enum(FEEDBACK_TYPES)),
    FieldDef::required("description", Text),
    FieldDef::required("submitted_date", Timestamp),
    FieldDef::required("status", Text),
];

/// Roots of the closed variant families. Records of these families carry
/// a `kind` tag naming their runtime variant.
const FAMILY_ROOTS: &[EntityKind] = &[
    EntityKind::LegalEntity,
    EntityKind::Action,
    EntityKind::Account,
    EntityKind::AuthCredentialSecret,
    EntityKind::BankAccount,
    EntityKind::Product,
];

impl EntityKind {
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::BaseEntity,
        EntityKind::LegalEntity,
        EntityKind::Human,
        EntityKind::Company,
        EntityKind::Document,
        EntityKind::Action,
        EntityKind::DocumentSubmission,
        EntityKind::Account,
        EntityKind::Customer,
        EntityKind::BankUserAccount,
        EntityKind::Platform,
        EntityKind::AuthCredentialSecret,
        EntityKind::PasswordCredentialSecret,
        EntityKind::MfaCredentialSecret,
        EntityKind::OAuthCredentialSecret,
        EntityKind::GoogleOAuthCredentialSecret,
        EntityKind::AppleOAuthCredentialSecret,
        EntityKind::FacebookOAuthCredentialSecret,
        EntityKind::TwitterOAuthCredentialSecret,
        EntityKind::EmailMagicLinkCredentialSecret,
        EntityKind::Bank,
        EntityKind::BankAccount,
        EntityKind::CheckingAccount,
        EntityKind::SavingsAccount,
        EntityKind::Card,
        EntityKind::Product,
        EntityKind::Service,
        EntityKind::SaasProduct,
        EntityKind::SubscriptionTier,
        EntityKind::ProductCategory,
        EntityKind::Inventory,
        EntityKind::Order,
        EntityKind::OrderItem,
        EntityKind::Review,
        EntityKind::Discount,
        EntityKind::Subscription,
        EntityKind::CustomerSupportCase,
        EntityKind::Feedback,
    ];

    /// Canonical schema name, also used as the `kind` tag value.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::BaseEntity => "BaseEntity",
            EntityKind::LegalEntity => "LegalEntity",
            EntityKind::Human => "Human",
            EntityKind::Company => "Company",
            EntityKind::Document => "Document",
            EntityKind::Action => "Action",
            EntityKind::DocumentSubmission => "DocumentSubmission",
            EntityKind::Account => "Account",
            EntityKind::Customer => "Customer",
            EntityKind::BankUserAccount => "BankUserAccount",
            EntityKind::Platform => "Platform",
            EntityKind::AuthCredentialSecret => "AuthCredentialSecret",
            EntityKind::PasswordCredentialSecret => "PasswordCredentialSecret",
            EntityKind::MfaCredentialSecret => "MFACredentialSecret",
            EntityKind::OAuthCredentialSecret => "OAuthCredentialSecret",
            EntityKind::GoogleOAuthCredentialSecret => "GoogleOAuthCredentialSecret",
            EntityKind::AppleOAuthCredentialSecret => "AppleOAuthCredentialSecret",
            EntityKind::FacebookOAuthCredentialSecret => "FacebookOAuthCredentialSecret",
            EntityKind::TwitterOAuthCredentialSecret => "TwitterOAuthCredentialSecret",
            EntityKind::EmailMagicLinkCredentialSecret => "EmailMagicLinkCredentialSecret",
            EntityKind::Bank => "Bank",
            EntityKind::BankAccount => "BankAccount",
            EntityKind::CheckingAccount => "CheckingAccount",
            EntityKind::SavingsAccount => "SavingsAccount",
            EntityKind::Card => "Card",
            EntityKind::Product => "Product",
            EntityKind::Service => "Service",
            EntityKind::SaasProduct => "SaaSProduct",
            EntityKind::SubscriptionTier => "SubscriptionTier",
            EntityKind::ProductCategory => "ProductCategory",
            EntityKind::Inventory => "Inventory",
            EntityKind::Order => "Order",
            EntityKind::OrderItem => "OrderItem",
            EntityKind::Review => "Review",
            EntityKind::Discount => "Discount",
            EntityKind::Subscription => "Subscription",
            EntityKind::CustomerSupportCase => "CustomerSupportCase",
            EntityKind::Feedback => "Feedback",
        }
    }

    pub fn from_name(name: &str) -> Option<EntityKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// The single supertype. `None` only for [`EntityKind::BaseEntity`].
    pub const fn supertype(self) -> Option<EntityKind> {
        match self {
            EntityKind::BaseEntity => None,
            EntityKind::Human | EntityKind::Company => Some(EntityKind::LegalEntity),
            EntityKind::DocumentSubmission => Some(EntityKind::Action),
            EntityKind::Customer | EntityKind::BankUserAccount => Some(EntityKind::Account),
            EntityKind::PasswordCredentialSecret
            | EntityKind::MfaCredentialSecret
            | EntityKind::OAuthCredentialSecret
            | EntityKind::GoogleOAuthCredentialSecret
            | EntityKind::AppleOAuthCredentialSecret
            | EntityKind::FacebookOAuthCredentialSecret
            | EntityKind::TwitterOAuthCredentialSecret
            | EntityKind::EmailMagicLinkCredentialSecret => {
                Some(EntityKind::AuthCredentialSecret)
            }
            EntityKind::CheckingAccount | EntityKind::SavingsAccount => {
                Some(EntityKind::BankAccount)
            }
            EntityKind::Service | EntityKind::SaasProduct => Some(EntityKind::Product),
            _ => Some(EntityKind::BaseEntity),
        }
    }

    /// Abstract kinds are never the runtime variant of a record.
    pub const fn is_abstract(self) -> bool {
        matches!(
            self,
            EntityKind::BaseEntity
                | EntityKind::LegalEntity
                | EntityKind::AuthCredentialSecret
                | EntityKind::BankAccount
        )
    }

    /// Fields declared on this kind itself, excluding inherited ones.
    pub fn own_fields(self) -> &'static [FieldDef] {
        match self {
            EntityKind::BaseEntity => BASE_ENTITY_FIELDS,
            EntityKind::LegalEntity => LEGAL_ENTITY_FIELDS,
            EntityKind::Company => COMPANY_FIELDS,
            EntityKind::Document => DOCUMENT_FIELDS,
            EntityKind::Action => ACTION_FIELDS,
            EntityKind::DocumentSubmission => DOCUMENT_SUBMISSION_FIELDS,
            EntityKind::Account => ACCOUNT_FIELDS,
            EntityKind::Customer => CUSTOMER_FIELDS,
            EntityKind::BankUserAccount => BANK_USER_ACCOUNT_FIELDS,
            EntityKind::Platform => PLATFORM_FIELDS,
            EntityKind::PasswordCredentialSecret => PASSWORD_CREDENTIAL_FIELDS,
            EntityKind::MfaCredentialSecret => MFA_CREDENTIAL_FIELDS,
            EntityKind::GoogleOAuthCredentialSecret => GOOGLE_OAUTH_FIELDS,
            EntityKind::AppleOAuthCredentialSecret => APPLE_OAUTH_FIELDS,
            EntityKind::FacebookOAuthCredentialSecret => FACEBOOK_OAUTH_FIELDS,
            EntityKind::TwitterOAuthCredentialSecret => TWITTER_OAUTH_FIELDS,
            EntityKind::Bank => BANK_FIELDS,
            EntityKind::BankAccount => BANK_ACCOUNT_FIELDS,
            EntityKind::CheckingAccount => CHECKING_ACCOUNT_FIELDS,
            EntityKind::SavingsAccount => SAVINGS_ACCOUNT_FIELDS,
            EntityKind::Card => CARD_FIELDS,
            EntityKind::Product => PRODUCT_FIELDS,
            EntityKind::Service => SERVICE_FIELDS,
            EntityKind::SaasProduct => SAAS_PRODUCT_FIELDS,
            EntityKind::SubscriptionTier => SUBSCRIPTION_TIER_FIELDS,
            EntityKind::ProductCategory => PRODUCT_CATEGORY_FIELDS,
            EntityKind::Inventory => INVENTORY_FIELDS,
            EntityKind::Order => ORDER_FIELDS,
            EntityKind::OrderItem => ORDER_ITEM_FIELDS,
            EntityKind::Review => REVIEW_FIELDS,
            EntityKind::Discount => DISCOUNT_FIELDS,
            EntityKind::Subscription => SUBSCRIPTION_FIELDS,
            EntityKind::CustomerSupportCase => CUSTOMER_SUPPORT_CASE_FIELDS,
            EntityKind::Feedback => FEEDBACK_FIELDS,
            EntityKind::Human
            | EntityKind::AuthCredentialSecret
            | EntityKind::OAuthCredentialSecret
            | EntityKind::EmailMagicLinkCredentialSecret => &[],
        }
    }

    /// This kind followed by its supertypes, ending at `BaseEntity`.
    pub fn lineage(self) -> Vec<EntityKind> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.supertype() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Supertypes of this kind, nearest first.
    pub fn ancestors(self) -> Vec<EntityKind> {
        let mut chain = self.lineage();
        chain.remove(0);
        chain
    }

    /// Reflexive: every kind is a subtype of itself.
    pub fn is_subtype_of(self, other: EntityKind) -> bool {
        self.lineage().contains(&other)
    }

    /// Direct subtypes of this kind.
    pub fn variants(self) -> Vec<EntityKind> {
        Self::ALL
            .iter()
            .copied()
            .filter(|kind| kind.supertype() == Some(self))
            .collect()
    }

    /// The complete field set, inherited fields first.
    pub fn fields(self) -> Vec<&'static FieldDef> {
        self.lineage()
            .into_iter()
            .rev()
            .flat_map(|kind| kind.own_fields().iter())
            .collect()
    }

    pub fn field(self, name: &str) -> Option<&'static FieldDef> {
        self.fields().into_iter().find(|field| field.name == name)
    }

    /// Root of the variant family this kind belongs to, if any.
    pub fn family(self) -> Option<EntityKind> {
        self.lineage()
            .into_iter()
            .find(|kind| FAMILY_ROOTS.contains(kind))
    }

    /// Storage table shared by every kind of the same family.
    pub fn table(self) -> Option<&'static str> {
        let owner = self.family().unwrap_or(self);
        match owner {
            EntityKind::BaseEntity => None,
            EntityKind::LegalEntity => Some("legal_entity"),
            EntityKind::Document => Some("document"),
            EntityKind::Action => Some("action"),
            EntityKind::Account => Some("account"),
            EntityKind::Platform => Some("platform"),
            EntityKind::AuthCredentialSecret => Some("credential_secret"),
            EntityKind::Bank => Some("bank"),
            EntityKind::BankAccount => Some("bank_account"),
            EntityKind::Card => Some("card"),
            EntityKind::Product => Some("product"),
            EntityKind::SubscriptionTier => Some("subscription_tier"),
            EntityKind::ProductCategory => Some("product_category"),
            EntityKind::Inventory => Some("inventory"),
            EntityKind::Order => Some("customer_order"),
            EntityKind::OrderItem => Some("order_item"),
            EntityKind::Review => Some("review"),
            EntityKind::Discount => Some("discount"),
            EntityKind::Subscription => Some("subscription"),
            EntityKind::CustomerSupportCase => Some("support_case"),
            EntityKind::Feedback => Some("feedback"),
            // Family members resolve through their root above.
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = FastcoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::from_name(s)
            .ok_or_else(|| FastcoError::validation(format!("unknown entity kind: {s}")))
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Registry descriptors
// ---------------------------------------------------------------------------

/// Serializable description of one entity kind.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub supertype: Option<EntityKind>,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub family: Option<EntityKind>,
    pub table: Option<&'static str>,
    pub variants: Vec<EntityKind>,
    /// Full field set, inherited fields first.
    pub fields: Vec<FieldDef>,
}

/// The complete schema as one document.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDocument {
    pub schema_version: u32,
    pub entities: Vec<EntityDescriptor>,
}

/// Lookup facade over the static schema tables.
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn kinds() -> &'static [EntityKind] {
        EntityKind::ALL
    }

    pub fn lookup(name: &str) -> Option<EntityKind> {
        EntityKind::from_name(name)
    }

    pub fn describe(kind: EntityKind) -> EntityDescriptor {
        EntityDescriptor {
            name: kind.name(),
            supertype: kind.supertype(),
            is_abstract: kind.is_abstract(),
            family: kind.family(),
            table: kind.table(),
            variants: kind.variants(),
            fields: kind.fields().into_iter().copied().collect(),
        }
    }

    pub fn document() -> SchemaDocument {
        SchemaDocument {
            schema_version: SCHEMA_VERSION,
            entities: EntityKind::ALL.iter().map(|k| Self::describe(*k)).collect(),
        }
    }

    /// Distinct storage tables, in declaration order.
    pub fn tables() -> Vec<&'static str> {
        let mut tables: Vec<&'static str> = Vec::new();
        for table in EntityKind::ALL.iter().filter_map(|k| k.table()) {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }

    /// Concrete kinds stored in `table`.
    pub fn kinds_in_table(table: &str) -> Vec<EntityKind> {
        EntityKind::ALL
            .iter()
            .copied()
            .filter(|k| !k.is_abstract() && k.table() == Some(table))
            .collect()
    }
}
