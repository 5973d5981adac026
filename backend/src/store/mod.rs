//! Persistence collaborator
//!
//! The computation layer works on in-memory snapshots; this module is the
//! only place those snapshots are durably committed. Snapshot collections
//! (ingredients, products, orders, customers) use full-snapshot save
//! semantics: every save transmits the whole collection and rows absent
//! from it are deleted, so no stale rows survive a shrink. Log-style
//! collections (purchase records, stock transactions, other expenses) are
//! keyed by id with append/update/delete operations.
//!
//! A load of an empty or missing collection returns an empty vector; it
//! must never reintroduce seed data into a collection the user cleared.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use shared::{
    Customer, Ingredient, Order, OtherExpense, Product, PurchaseRecord, StockTransaction,
};

use crate::error::AppResult;

/// Snapshot collections, used as coalescing keys by the debounced writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Ingredients,
    Products,
    Orders,
    Customers,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Ingredients => "ingredients",
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Customers => "customers",
        }
    }
}

/// Storage interface the session depends on
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    // Snapshot collections
    async fn load_ingredients(&self) -> AppResult<Vec<Ingredient>>;
    async fn save_ingredients(&self, ingredients: &[Ingredient]) -> AppResult<()>;

    async fn load_products(&self) -> AppResult<Vec<Product>>;
    async fn save_products(&self, products: &[Product]) -> AppResult<()>;

    async fn load_orders(&self) -> AppResult<Vec<Order>>;
    async fn save_orders(&self, orders: &[Order]) -> AppResult<()>;

    async fn load_customers(&self) -> AppResult<Vec<Customer>>;
    async fn save_customers(&self, customers: &[Customer]) -> AppResult<()>;

    // Log-style collections
    async fn load_purchase_records(&self) -> AppResult<Vec<PurchaseRecord>>;
    async fn upsert_purchase_record(&self, record: &PurchaseRecord) -> AppResult<()>;
    async fn delete_purchase_record(&self, id: Uuid) -> AppResult<()>;

    async fn load_stock_transactions(&self) -> AppResult<Vec<StockTransaction>>;
    async fn append_stock_transaction(&self, tx: &StockTransaction) -> AppResult<()>;
    async fn delete_stock_transaction(&self, id: Uuid) -> AppResult<()>;

    async fn load_other_expenses(&self) -> AppResult<Vec<OtherExpense>>;
    async fn upsert_other_expense(&self, expense: &OtherExpense) -> AppResult<()>;
    async fn delete_other_expense(&self, id: Uuid) -> AppResult<()>;
}
