//! Relationship resolution against SurrealDB-backed repositories.

use fastco_core::models::account::{Account, AccountVariant, BankUserAccount, Customer};
use fastco_core::models::legal_entity::{Company, LegalEntity};
use fastco_core::models::order::{Order, OrderItem};
use fastco_core::models::product::ProductCategory;
use fastco_core::relations;
use fastco_core::repository::EntityRepository;
use fastco_core::{Entity, EntityMeta, FastcoError};
use fastco_db::repository::{
    AccountRepository, OrderItemRepository, OrderRepository, ProductCategoryRepository,
};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fastco_db::run_migrations(&db).await.unwrap();
    db
}

fn account(username: &str, variant: AccountVariant) -> Account {
    Account::new(
        username,
        format!("{username}@example.com"),
        Uuid::new_v4(),
        variant,
    )
}

fn bank_user_variant() -> AccountVariant {
    AccountVariant::BankUserAccount(BankUserAccount {
        bank_id: Uuid::new_v4(),
        bank_account_ids: vec![],
    })
}

#[tokio::test]
async fn company_bank_user_accounts_filters_by_variant() {
    let db = setup().await;
    let accounts = AccountRepository::new(db);

    let shopper = accounts
        .insert(account("shopper", AccountVariant::Customer(Customer::default())))
        .await
        .unwrap();
    let teller = accounts
        .insert(account("teller", bank_user_variant()))
        .await
        .unwrap();

    let company = LegalEntity::company(
        "ACME",
        Company {
            account_ids: vec![shopper.id(), teller.id()],
            ..Company::default()
        },
    );

    let found = relations::company_bank_user_accounts(&accounts, &company)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), teller.id());
}

#[tokio::test]
async fn company_bank_user_accounts_skips_deleted_accounts() {
    let db = setup().await;
    let accounts = AccountRepository::new(db);

    let old = accounts
        .insert(account("old", bank_user_variant()))
        .await
        .unwrap();
    let current = accounts
        .insert(account("current", bank_user_variant()))
        .await
        .unwrap();
    accounts.soft_delete(old.id()).await.unwrap();

    let company = LegalEntity::company(
        "Bank Co",
        Company {
            account_ids: vec![old.id(), current.id()],
            ..Company::default()
        },
    );

    let found = relations::company_bank_user_accounts(&accounts, &company)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), current.id());
}

#[tokio::test]
async fn human_has_no_company_relations() {
    let db = setup().await;
    let accounts = AccountRepository::new(db);

    let err = relations::company_bank_user_accounts(&accounts, &LegalEntity::human("Ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::Validation { .. }));
}

#[tokio::test]
async fn resolving_a_deleted_target_is_not_found() {
    let db = setup().await;
    let accounts = AccountRepository::new(db);

    let target = accounts
        .insert(account("ghost", bank_user_variant()))
        .await
        .unwrap();
    accounts.soft_delete(target.id()).await.unwrap();

    let err = relations::resolve(&accounts, target.id()).await.unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));

    let err = relations::resolve_all(&accounts, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));
}

#[tokio::test]
async fn category_parent_and_ancestors() {
    let db = setup().await;
    let repo = ProductCategoryRepository::new(db);

    let root = repo
        .insert(ProductCategory::new("Home", None))
        .await
        .unwrap();
    let mid = repo
        .insert(ProductCategory::new("Kitchen", Some(root.id())))
        .await
        .unwrap();
    let leaf = repo
        .insert(ProductCategory::new("Knives", Some(mid.id())))
        .await
        .unwrap();

    let parent = relations::category_parent(&repo, &leaf).await.unwrap();
    assert_eq!(parent.map(|p| p.id()), Some(mid.id()));
    assert!(
        relations::category_parent(&repo, &root)
            .await
            .unwrap()
            .is_none()
    );

    let ancestors = relations::category_ancestors(&repo, &leaf).await.unwrap();
    let ids: Vec<Uuid> = ancestors.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![mid.id(), root.id()]);
}

#[tokio::test]
async fn assigning_a_descendant_as_parent_is_a_cycle() {
    let db = setup().await;
    let repo = ProductCategoryRepository::new(db);

    let root = repo
        .insert(ProductCategory::new("Garden", None))
        .await
        .unwrap();
    let child = repo
        .insert(ProductCategory::new("Tools", Some(root.id())))
        .await
        .unwrap();

    let err = relations::assign_parent_category(&repo, root.id(), Some(child.id()))
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::CycleDetected { .. }));

    let err = relations::assign_parent_category(&repo, root.id(), Some(root.id()))
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::CycleDetected { .. }));

    // The stored tree is unchanged.
    assert!(repo.get_by_id(root.id()).await.unwrap().is_root());

    // A legal move still works.
    let other = repo
        .insert(ProductCategory::new("Outdoor", None))
        .await
        .unwrap();
    let moved = relations::assign_parent_category(&repo, child.id(), Some(other.id()))
        .await
        .unwrap();
    assert_eq!(moved.parent_category_id, Some(other.id()));
}

#[tokio::test]
async fn store_refuses_category_cycles_on_plain_writes() {
    let db = setup().await;
    let repo = ProductCategoryRepository::new(db);

    let root = repo
        .insert(ProductCategory::new("Pets", None))
        .await
        .unwrap();
    let child = repo
        .insert(ProductCategory::new("Cats", Some(root.id())))
        .await
        .unwrap();

    let mut looped = root.clone();
    looped.parent_category_id = Some(child.id());
    let err = repo.update(looped).await.unwrap_err();
    assert!(matches!(err, FastcoError::CycleDetected { .. }));
    assert!(repo.get_by_id(root.id()).await.unwrap().is_root());

    // A forward reference could later close a loop, so the parent must exist.
    let err = repo
        .insert(ProductCategory::new("Orphan", Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::NotFound { .. }));

    // Re-parenting onto an unrelated branch is still fine.
    let dogs = repo
        .insert(ProductCategory::new("Dogs", Some(root.id())))
        .await
        .unwrap();
    let mut moved = child.clone();
    moved.parent_category_id = Some(dogs.id());
    let moved = repo.update(moved).await.unwrap();
    assert_eq!(moved.parent_category_id, Some(dogs.id()));
}

#[tokio::test]
async fn refresh_order_total_reports_overflow() {
    let db = setup().await;
    let orders = OrderRepository::new(db.clone());
    let items = OrderItemRepository::new(db);

    let mut order = Order::new(Uuid::new_v4(), "pending");
    let huge = OrderItem {
        meta: EntityMeta::new(),
        order_id: order.id(),
        product_id: Uuid::new_v4(),
        quantity: 2,
        price: Decimal::MAX,
    };
    order.item_ids = vec![huge.id()];
    items.insert(huge).await.unwrap();
    orders.insert(order.clone()).await.unwrap();

    let err = relations::refresh_order_total(&orders, &items, order.id())
        .await
        .unwrap_err();
    assert!(matches!(err, FastcoError::Validation { .. }));
    assert_eq!(
        orders.get_by_id(order.id()).await.unwrap().total_amount,
        Decimal::ZERO
    );
}

#[tokio::test]
async fn order_total_follows_active_items() {
    let db = setup().await;
    let orders = OrderRepository::new(db.clone());
    let items = OrderItemRepository::new(db);

    let mut order = Order::new(Uuid::new_v4(), "pending");
    let order_id = order.id();
    let line = |quantity: u32, cents: i64| OrderItem {
        meta: EntityMeta::new(),
        order_id,
        product_id: Uuid::new_v4(),
        quantity,
        price: Decimal::new(cents, 2),
    };
    let first = line(2, 1500);
    let second = line(1, 999);
    order.item_ids = vec![first.id(), second.id()];

    items.insert(first.clone()).await.unwrap();
    items.insert(second.clone()).await.unwrap();
    orders.insert(order.clone()).await.unwrap();

    let refreshed = relations::refresh_order_total(&orders, &items, order.id())
        .await
        .unwrap();
    assert_eq!(refreshed.total_amount, Decimal::new(3999, 2));

    items.soft_delete(second.id()).await.unwrap();
    let refreshed = relations::refresh_order_total(&orders, &items, order.id())
        .await
        .unwrap();
    assert_eq!(refreshed.total_amount, Decimal::new(3000, 2));
    assert_eq!(
        orders.get_by_id(order.id()).await.unwrap().total_amount,
        Decimal::new(3000, 2)
    );
}
