//! SurrealDB repository implementations.

mod entity;

pub use entity::{
    AccountRepository, ActionRepository, BankAccountRepository, BankRepository, CardRepository,
    CredentialSecretRepository, DiscountRepository, DocumentRepository, FeedbackRepository,
    InventoryRepository, LegalEntityRepository, OrderItemRepository, OrderRepository,
    PlatformRepository, ProductCategoryRepository, ProductRepository, ReviewRepository,
    SubscriptionRepository, SubscriptionTierRepository, SupportCaseRepository,
    SurrealEntityRepository,
};
