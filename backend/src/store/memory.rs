//! In-memory store used by tests and as a fallback when no database is
//! configured

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{
    Customer, Ingredient, Order, OtherExpense, Product, PurchaseRecord, StockTransaction,
};

use crate::error::AppResult;

use super::SnapshotStore;

#[derive(Debug, Default)]
struct MemoryState {
    ingredients: Vec<Ingredient>,
    products: Vec<Product>,
    orders: Vec<Order>,
    customers: Vec<Customer>,
    purchase_records: Vec<PurchaseRecord>,
    stock_transactions: Vec<StockTransaction>,
    other_expenses: Vec<OtherExpense>,
}

/// A `SnapshotStore` backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        Ok(self.state.read().await.ingredients.clone())
    }

    async fn save_ingredients(&self, ingredients: &[Ingredient]) -> AppResult<()> {
        self.state.write().await.ingredients = ingredients.to_vec();
        Ok(())
    }

    async fn load_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.state.read().await.products.clone())
    }

    async fn save_products(&self, products: &[Product]) -> AppResult<()> {
        self.state.write().await.products = products.to_vec();
        Ok(())
    }

    async fn load_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.state.read().await.orders.clone())
    }

    async fn save_orders(&self, orders: &[Order]) -> AppResult<()> {
        self.state.write().await.orders = orders.to_vec();
        Ok(())
    }

    async fn load_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.state.read().await.customers.clone())
    }

    async fn save_customers(&self, customers: &[Customer]) -> AppResult<()> {
        self.state.write().await.customers = customers.to_vec();
        Ok(())
    }

    async fn load_purchase_records(&self) -> AppResult<Vec<PurchaseRecord>> {
        Ok(self.state.read().await.purchase_records.clone())
    }

    async fn upsert_purchase_record(&self, record: &PurchaseRecord) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.purchase_records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => state.purchase_records.push(record.clone()),
        }
        Ok(())
    }

    async fn delete_purchase_record(&self, id: Uuid) -> AppResult<()> {
        self.state.write().await.purchase_records.retain(|r| r.id != id);
        Ok(())
    }

    async fn load_stock_transactions(&self) -> AppResult<Vec<StockTransaction>> {
        Ok(self.state.read().await.stock_transactions.clone())
    }

    async fn append_stock_transaction(&self, tx: &StockTransaction) -> AppResult<()> {
        self.state.write().await.stock_transactions.push(tx.clone());
        Ok(())
    }

    async fn delete_stock_transaction(&self, id: Uuid) -> AppResult<()> {
        self.state
            .write()
            .await
            .stock_transactions
            .retain(|t| t.id != id);
        Ok(())
    }

    async fn load_other_expenses(&self) -> AppResult<Vec<OtherExpense>> {
        Ok(self.state.read().await.other_expenses.clone())
    }

    async fn upsert_other_expense(&self, expense: &OtherExpense) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.other_expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => *existing = expense.clone(),
            None => state.other_expenses.push(expense.clone()),
        }
        Ok(())
    }

    async fn delete_other_expense(&self, id: Uuid) -> AppResult<()> {
        self.state.write().await.other_expenses.retain(|e| e.id != id);
        Ok(())
    }
}
