//! Schema definitions and migration runner for SurrealDB.
//!
//! Every entity family gets one SCHEMAFULL table. The full serialized
//! entity lives in `body`; `kind`, `schema_version` and the three
//! timestamps are lifted into typed columns so listings can filter and
//! order without touching the body. `kind` is checked against the
//! concrete variants the table may hold.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "entity_tables",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Legal entities (people and companies)
-- =======================================================================
DEFINE TABLE legal_entity SCHEMAFULL;
DEFINE FIELD kind ON TABLE legal_entity TYPE string \
    ASSERT $value IN ['Human', 'Company'];
DEFINE FIELD schema_version ON TABLE legal_entity TYPE int;
DEFINE FIELD body ON TABLE legal_entity TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE legal_entity TYPE datetime;
DEFINE FIELD updated_at ON TABLE legal_entity TYPE datetime;
DEFINE FIELD deleted_at ON TABLE legal_entity TYPE option<datetime>;
DEFINE INDEX idx_legal_entity_kind ON TABLE legal_entity COLUMNS kind;

-- =======================================================================
-- Documents
-- =======================================================================
DEFINE TABLE document SCHEMAFULL;
DEFINE FIELD kind ON TABLE document TYPE string \
    ASSERT $value IN ['Document'];
DEFINE FIELD schema_version ON TABLE document TYPE int;
DEFINE FIELD body ON TABLE document TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE document TYPE datetime;
DEFINE FIELD updated_at ON TABLE document TYPE datetime;
DEFINE FIELD deleted_at ON TABLE document TYPE option<datetime>;

-- =======================================================================
-- Actions
-- =======================================================================
DEFINE TABLE action SCHEMAFULL;
DEFINE FIELD kind ON TABLE action TYPE string \
    ASSERT $value IN ['Action', 'DocumentSubmission'];
DEFINE FIELD schema_version ON TABLE action TYPE int;
DEFINE FIELD body ON TABLE action TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE action TYPE datetime;
DEFINE FIELD updated_at ON TABLE action TYPE datetime;
DEFINE FIELD deleted_at ON TABLE action TYPE option<datetime>;
DEFINE INDEX idx_action_kind ON TABLE action COLUMNS kind;

-- =======================================================================
-- Accounts
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD kind ON TABLE account TYPE string \
    ASSERT $value IN ['Account', 'Customer', 'BankUserAccount'];
DEFINE FIELD schema_version ON TABLE account TYPE int;
DEFINE FIELD body ON TABLE account TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE account TYPE datetime;
DEFINE FIELD updated_at ON TABLE account TYPE datetime;
DEFINE FIELD deleted_at ON TABLE account TYPE option<datetime>;
DEFINE INDEX idx_account_kind ON TABLE account COLUMNS kind;

-- =======================================================================
-- Platforms
-- =======================================================================
DEFINE TABLE platform SCHEMAFULL;
DEFINE FIELD kind ON TABLE platform TYPE string \
    ASSERT $value IN ['Platform'];
DEFINE FIELD schema_version ON TABLE platform TYPE int;
DEFINE FIELD body ON TABLE platform TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE platform TYPE datetime;
DEFINE FIELD updated_at ON TABLE platform TYPE datetime;
DEFINE FIELD deleted_at ON TABLE platform TYPE option<datetime>;

-- =======================================================================
-- Credential secrets
-- =======================================================================
DEFINE TABLE credential_secret SCHEMAFULL;
DEFINE FIELD kind ON TABLE credential_secret TYPE string \
    ASSERT $value IN ['PasswordCredentialSecret', \
    'MFACredentialSecret', 'OAuthCredentialSecret', \
    'GoogleOAuthCredentialSecret', 'AppleOAuthCredentialSecret', \
    'FacebookOAuthCredentialSecret', 'TwitterOAuthCredentialSecret', \
    'EmailMagicLinkCredentialSecret'];
DEFINE FIELD schema_version ON TABLE credential_secret TYPE int;
DEFINE FIELD body ON TABLE credential_secret TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE credential_secret TYPE datetime;
DEFINE FIELD updated_at ON TABLE credential_secret TYPE datetime;
DEFINE FIELD deleted_at ON TABLE credential_secret TYPE option<datetime>;
DEFINE INDEX idx_credential_secret_kind ON TABLE credential_secret COLUMNS kind;

-- =======================================================================
-- Banks
-- =======================================================================
DEFINE TABLE bank SCHEMAFULL;
DEFINE FIELD kind ON TABLE bank TYPE string \
    ASSERT $value IN ['Bank'];
DEFINE FIELD schema_version ON TABLE bank TYPE int;
DEFINE FIELD body ON TABLE bank TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE bank TYPE datetime;
DEFINE FIELD updated_at ON TABLE bank TYPE datetime;
DEFINE FIELD deleted_at ON TABLE bank TYPE option<datetime>;

-- =======================================================================
-- Bank accounts
-- =======================================================================
DEFINE TABLE bank_account SCHEMAFULL;
DEFINE FIELD kind ON TABLE bank_account TYPE string \
    ASSERT $value IN ['CheckingAccount', 'SavingsAccount'];
DEFINE FIELD schema_version ON TABLE bank_account TYPE int;
DEFINE FIELD body ON TABLE bank_account TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE bank_account TYPE datetime;
DEFINE FIELD updated_at ON TABLE bank_account TYPE datetime;
DEFINE FIELD deleted_at ON TABLE bank_account TYPE option<datetime>;
DEFINE INDEX idx_bank_account_kind ON TABLE bank_account COLUMNS kind;

-- =======================================================================
-- Cards
-- =======================================================================
DEFINE TABLE card SCHEMAFULL;
DEFINE FIELD kind ON TABLE card TYPE string \
    ASSERT $value IN ['Card'];
DEFINE FIELD schema_version ON TABLE card TYPE int;
DEFINE FIELD body ON TABLE card TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE card TYPE datetime;
DEFINE FIELD updated_at ON TABLE card TYPE datetime;
DEFINE FIELD deleted_at ON TABLE card TYPE option<datetime>;

-- =======================================================================
-- Products
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD kind ON TABLE product TYPE string \
    ASSERT $value IN ['Product', 'Service', 'SaaSProduct'];
DEFINE FIELD schema_version ON TABLE product TYPE int;
DEFINE FIELD body ON TABLE product TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE product TYPE datetime;
DEFINE FIELD updated_at ON TABLE product TYPE datetime;
DEFINE FIELD deleted_at ON TABLE product TYPE option<datetime>;
DEFINE INDEX idx_product_kind ON TABLE product COLUMNS kind;

-- =======================================================================
-- Subscription tiers
-- =======================================================================
DEFINE TABLE subscription_tier SCHEMAFULL;
DEFINE FIELD kind ON TABLE subscription_tier TYPE string \
    ASSERT $value IN ['SubscriptionTier'];
DEFINE FIELD schema_version ON TABLE subscription_tier TYPE int;
DEFINE FIELD body ON TABLE subscription_tier TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE subscription_tier TYPE datetime;
DEFINE FIELD updated_at ON TABLE subscription_tier TYPE datetime;
DEFINE FIELD deleted_at ON TABLE subscription_tier TYPE option<datetime>;

-- =======================================================================
-- Product categories
-- =======================================================================
DEFINE TABLE product_category SCHEMAFULL;
DEFINE FIELD kind ON TABLE product_category TYPE string \
    ASSERT $value IN ['ProductCategory'];
DEFINE FIELD schema_version ON TABLE product_category TYPE int;
DEFINE FIELD body ON TABLE product_category TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE product_category TYPE datetime;
DEFINE FIELD updated_at ON TABLE product_category TYPE datetime;
DEFINE FIELD deleted_at ON TABLE product_category TYPE option<datetime>;

-- =======================================================================
-- Inventory
-- =======================================================================
DEFINE TABLE inventory SCHEMAFULL;
DEFINE FIELD kind ON TABLE inventory TYPE string \
    ASSERT $value IN ['Inventory'];
DEFINE FIELD schema_version ON TABLE inventory TYPE int;
DEFINE FIELD body ON TABLE inventory TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE inventory TYPE datetime;
DEFINE FIELD updated_at ON TABLE inventory TYPE datetime;
DEFINE FIELD deleted_at ON TABLE inventory TYPE option<datetime>;

-- =======================================================================
-- Orders
-- =======================================================================
DEFINE TABLE customer_order SCHEMAFULL;
DEFINE FIELD kind ON TABLE customer_order TYPE string \
    ASSERT $value IN ['Order'];
DEFINE FIELD schema_version ON TABLE customer_order TYPE int;
DEFINE FIELD body ON TABLE customer_order TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE customer_order TYPE datetime;
DEFINE FIELD updated_at ON TABLE customer_order TYPE datetime;
DEFINE FIELD deleted_at ON TABLE customer_order TYPE option<datetime>;

-- =======================================================================
-- Order items
-- =======================================================================
DEFINE TABLE order_item SCHEMAFULL;
DEFINE FIELD kind ON TABLE order_item TYPE string \
    ASSERT $value IN ['OrderItem'];
DEFINE FIELD schema_version ON TABLE order_item TYPE int;
DEFINE FIELD body ON TABLE order_item TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE order_item TYPE datetime;
DEFINE FIELD updated_at ON TABLE order_item TYPE datetime;
DEFINE FIELD deleted_at ON TABLE order_item TYPE option<datetime>;

-- =======================================================================
-- Reviews
-- =======================================================================
DEFINE TABLE review SCHEMAFULL;
DEFINE FIELD kind ON TABLE review TYPE string \
    ASSERT $value IN ['Review'];
DEFINE FIELD schema_version ON TABLE review TYPE int;
DEFINE FIELD body ON TABLE review TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE review TYPE datetime;
DEFINE FIELD updated_at ON TABLE review TYPE datetime;
DEFINE FIELD deleted_at ON TABLE review TYPE option<datetime>;

-- =======================================================================
-- Discounts
-- =======================================================================
DEFINE TABLE discount SCHEMAFULL;
DEFINE FIELD kind ON TABLE discount TYPE string \
    ASSERT $value IN ['Discount'];
DEFINE FIELD schema_version ON TABLE discount TYPE int;
DEFINE FIELD body ON TABLE discount TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE discount TYPE datetime;
DEFINE FIELD updated_at ON TABLE discount TYPE datetime;
DEFINE FIELD deleted_at ON TABLE discount TYPE option<datetime>;

-- =======================================================================
-- Subscriptions
-- =======================================================================
DEFINE TABLE subscription SCHEMAFULL;
DEFINE FIELD kind ON TABLE subscription TYPE string \
    ASSERT $value IN ['Subscription'];
DEFINE FIELD schema_version ON TABLE subscription TYPE int;
DEFINE FIELD body ON TABLE subscription TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE subscription TYPE datetime;
DEFINE FIELD updated_at ON TABLE subscription TYPE datetime;
DEFINE FIELD deleted_at ON TABLE subscription TYPE option<datetime>;

-- =======================================================================
-- Customer support cases
-- =======================================================================
DEFINE TABLE support_case SCHEMAFULL;
DEFINE FIELD kind ON TABLE support_case TYPE string \
    ASSERT $value IN ['CustomerSupportCase'];
DEFINE FIELD schema_version ON TABLE support_case TYPE int;
DEFINE FIELD body ON TABLE support_case TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE support_case TYPE datetime;
DEFINE FIELD updated_at ON TABLE support_case TYPE datetime;
DEFINE FIELD deleted_at ON TABLE support_case TYPE option<datetime>;

-- =======================================================================
-- Feedback
-- =======================================================================
DEFINE TABLE feedback SCHEMAFULL;
DEFINE FIELD kind ON TABLE feedback TYPE string \
    ASSERT $value IN ['Feedback'];
DEFINE FIELD schema_version ON TABLE feedback TYPE int;
DEFINE FIELD body ON TABLE feedback TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE feedback TYPE datetime;
DEFINE FIELD updated_at ON TABLE feedback TYPE datetime;
DEFINE FIELD deleted_at ON TABLE feedback TYPE option<datetime>;
";

/// Run all pending migrations against the given database.
///
/// Applied versions are recorded in `_migration`, so running this twice
/// is a no-op the second time.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Raw DDL for version 1, for callers that manage migrations themselves.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
