//! Integration tests for the generic entity repository using in-memory
//! SurrealDB.

use chrono::Duration;
use fastco_core::models::account::{Account, AccountVariant, BankUserAccount, Customer};
use fastco_core::models::credential::AuthCredentialSecret;
use fastco_core::models::product::{
    Product, ProductCategory, ProductType, ProductVariant, SaasProduct, Service,
};
use fastco_core::repository::{EntityRepository, ListFilter, Pagination};
use fastco_core::{Entity, EntityKind, FastcoError};
use fastco_db::repository::{
    AccountRepository, CredentialSecretRepository, ProductCategoryRepository, ProductRepository,
};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fastco_db::run_migrations(&db).await.unwrap();
    db
}

fn bank_user(username: &str) -> Account {
    Account::new(
        username,
        format!("{username}@example.com"),
        Uuid::new_v4(),
        AccountVariant::BankUserAccount(BankUserAccount {
            bank_id: Uuid::new_v4(),
            bank_account_ids: vec![Uuid::new_v4()],
        }),
    )
}

fn product(name: &str) -> Product {
    Product::new(
        name,
        format!("SKU-{name}"),
        Decimal::new(1000, 2),
        Uuid::new_v4(),
        ProductType::Physical,
        ProductVariant::Standard,
    )
}

// -----------------------------------------------------------------------
// Basic CRUD
// -----------------------------------------------------------------------

#[tokio::test]
async fn insert_and_get_account() {
    let db = setup().await;
    let repo = AccountRepository::new(db);

    let account = bank_user("teller");
    let stored = repo.insert(account.clone()).await.unwrap();
    assert_eq!(stored, account);

    let fetched = repo.get_by_id(account.id()).await.unwrap();
    assert_eq!(fetched, account);
    assert_eq!(fetched.kind(), EntityKind::BankUserAccount);
    assert!(!fetched.is_deleted());
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
    let db = setup().await;
    let repo = AccountRepository::new(db);

    let account = bank_user("dup");
    repo.insert(account.clone()).await.unwrap();

    let err = repo.insert(account).await.unwrap_err();
    assert!(matches!(err, FastcoError::AlreadyExists { .. }));
}

#[tokio::test]
async fn invalid_entity_is_not_stored() {
    let db = setup().await;
    let repo = AccountRepository::new(db);

    let mut account = bank_user("bad");
    account.email = "not-an-email".into();
    let err = repo.insert(account.clone()).await.unwrap_err();
    assert!(matches!(err, FastcoError::Validation { .. }));

    let err = repo.get_by_id(account.id()).await.unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { ref entity, .. } if entity == "Product"));
}

#[tokio::test]
async fn update_keeps_created_at_and_bumps_updated_at() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let original = repo.insert(product("Lamp")).await.unwrap();

    let mut changed = original.clone();
    changed.price = Decimal::new(1250, 2);
    changed.meta.created_at = original.meta.created_at - Duration::days(30);

    let updated = repo.update(changed).await.unwrap();
    assert_eq!(updated.price, Decimal::new(1250, 2));
    assert_eq!(updated.meta.created_at, original.meta.created_at);
    assert!(updated.meta.updated_at >= original.meta.updated_at);

    let fetched = repo.get_by_id(original.id()).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let err = repo.update(product("Ghost")).await.unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));
}

#[tokio::test]
async fn variant_change_is_persisted() {
    let db = setup().await;
    let repo = AccountRepository::new(db);

    let mut account = repo.insert(bank_user("switcher")).await.unwrap();
    account.variant = AccountVariant::Customer(Customer::default());
    repo.update(account.clone()).await.unwrap();

    let fetched = repo.get_by_id(account.id()).await.unwrap();
    assert_eq!(fetched.kind(), EntityKind::Customer);
    assert!(fetched.as_customer().is_some());
}

// -----------------------------------------------------------------------
// Soft delete
// -----------------------------------------------------------------------

#[tokio::test]
async fn soft_delete_hides_record_from_active_listing() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let keep = repo.insert(product("Keep")).await.unwrap();
    let gone = repo.insert(product("Gone")).await.unwrap();

    let deleted = repo.soft_delete(gone.id()).await.unwrap();
    assert!(deleted.is_deleted());

    let active = repo
        .list(ListFilter::Active, Pagination::default())
        .await
        .unwrap();
    assert_eq!(active.total, 1);
    assert_eq!(active.items[0].id(), keep.id());

    let removed = repo
        .list(ListFilter::Deleted, Pagination::default())
        .await
        .unwrap();
    assert_eq!(removed.total, 1);
    assert_eq!(removed.items[0].id(), gone.id());

    let all = repo
        .list(ListFilter::All, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    // Still addressable by id, but not as an active record.
    let raw = repo.get_by_id(gone.id()).await.unwrap();
    assert!(raw.is_deleted());
    let err = repo.get_active(gone.id()).await.unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));
}

#[tokio::test]
async fn soft_delete_is_idempotent() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let item = repo.insert(product("Twice")).await.unwrap();
    let first = repo.soft_delete(item.id()).await.unwrap();
    let second = repo.soft_delete(item.id()).await.unwrap();
    assert_eq!(first.meta.deleted_at, second.meta.deleted_at);
}

#[tokio::test]
async fn restore_brings_record_back() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let item = repo.insert(product("Phoenix")).await.unwrap();
    repo.soft_delete(item.id()).await.unwrap();

    let restored = repo.restore(item.id()).await.unwrap();
    assert!(!restored.is_deleted());
    assert!(repo.get_active(item.id()).await.is_ok());

    let active = repo
        .list(ListFilter::Active, Pagination::default())
        .await
        .unwrap();
    assert_eq!(active.total, 1);
}

#[tokio::test]
async fn update_cannot_undelete() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    let item = repo.insert(product("Stubborn")).await.unwrap();
    let deleted = repo.soft_delete(item.id()).await.unwrap();

    let mut edit = deleted.clone();
    edit.meta.deleted_at = None;
    edit.name = "Renamed".into();
    let updated = repo.update(edit).await.unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.meta.deleted_at, deleted.meta.deleted_at);
}

// -----------------------------------------------------------------------
// Listing
// -----------------------------------------------------------------------

#[tokio::test]
async fn list_paginates_in_creation_order() {
    let db = setup().await;
    let repo = ProductCategoryRepository::new(db);

    let names = ["a", "b", "c", "d", "e"];
    for name in names {
        repo.insert(ProductCategory::new(name, None)).await.unwrap();
    }

    let page = repo
        .list(
            ListFilter::Active,
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    let got: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(got, vec!["a", "b"]);

    let tail = repo
        .list(
            ListFilter::Active,
            Pagination {
                offset: 4,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(tail.items.len(), 1);
    assert_eq!(tail.items[0].name, "e");
}

#[tokio::test]
async fn family_members_share_a_table() {
    let db = setup().await;
    let repo = ProductRepository::new(db);

    repo.insert(product("Widget")).await.unwrap();
    repo.insert(Product::new(
        "Consulting",
        "SKU-C",
        Decimal::new(15000, 2),
        Uuid::new_v4(),
        ProductType::Service,
        ProductVariant::Service(Service {
            duration: 90,
            is_recurring: false,
        }),
    ))
    .await
    .unwrap();
    repo.insert(Product::new(
        "Cloud",
        "SKU-S",
        Decimal::new(2900, 2),
        Uuid::new_v4(),
        ProductType::Digital,
        ProductVariant::SaasProduct(SaasProduct::default()),
    ))
    .await
    .unwrap();

    let all = repo
        .list(ListFilter::All, Pagination::default())
        .await
        .unwrap();
    let kinds: Vec<EntityKind> = all.items.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Product,
            EntityKind::Service,
            EntityKind::SaasProduct
        ]
    );
    let service = all.items[1].as_service().unwrap();
    assert_eq!(service.duration, 90);
}

// -----------------------------------------------------------------------
// Stored shape
// -----------------------------------------------------------------------

#[tokio::test]
async fn newer_schema_version_is_rejected_on_read() {
    let db = setup().await;
    let repo = ProductRepository::new(db.clone());

    let future = product("FromTheFuture");
    let mut body = serde_json::to_value(&future).unwrap();
    body["_schema_version"] = 2.into();

    db.query(
        "CREATE type::record('product', $id) SET \
         kind = 'Product', schema_version = 2, body = $body, \
         created_at = $created_at, updated_at = $updated_at",
    )
    .bind(("id", future.id().to_string()))
    .bind(("body", body))
    .bind(("created_at", future.meta.created_at))
    .bind(("updated_at", future.meta.updated_at))
    .await
    .unwrap()
    .check()
    .unwrap();

    let err = repo.get_by_id(future.id()).await.unwrap_err();
    assert!(matches!(
        err,
        FastcoError::UnsupportedSchemaVersion {
            found: 2,
            supported: 1
        }
    ));
}

#[tokio::test]
async fn password_secret_survives_storage() {
    let db = setup().await;
    let repo = CredentialSecretRepository::new(db);

    let secret = AuthCredentialSecret::password("correct horse", None).unwrap();
    repo.insert(secret.clone()).await.unwrap();

    let fetched = repo.get_by_id(secret.id()).await.unwrap();
    assert_eq!(fetched.kind(), EntityKind::PasswordCredentialSecret);
    assert!(fetched.verify_password("correct horse", None).unwrap());
    assert!(!fetched.verify_password("wrong", None).unwrap());
}
