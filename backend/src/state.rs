//! In-memory working state of a session
//!
//! The snapshot collections live here as the source of truth while the
//! process runs; the store is read once at session open and written behind
//! through the debounced writer. The log-style collections (purchases,
//! stock transactions, expenses) are not cached and go through the store
//! directly.

use std::sync::Arc;

use tokio::sync::RwLock;

use shared::{Customer, Ingredient, Order, Product};

use crate::error::AppResult;
use crate::store::SnapshotStore;

#[derive(Debug, Default)]
pub struct SessionState {
    pub ingredients: RwLock<Vec<Ingredient>>,
    pub products: RwLock<Vec<Product>>,
    pub orders: RwLock<Vec<Order>>,
    pub customers: RwLock<Vec<Customer>>,
}

impl SessionState {
    /// Load every snapshot collection from the store
    ///
    /// A missing or empty collection loads as an empty vector; nothing is
    /// ever seeded back into a collection the user cleared.
    pub async fn load(store: &dyn SnapshotStore) -> AppResult<Arc<Self>> {
        let state = SessionState {
            ingredients: RwLock::new(store.load_ingredients().await?),
            products: RwLock::new(store.load_products().await?),
            orders: RwLock::new(store.load_orders().await?),
            customers: RwLock::new(store.load_customers().await?),
        };
        Ok(Arc::new(state))
    }
}
