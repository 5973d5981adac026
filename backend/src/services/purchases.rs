//! Purchase records, operating expenses, and purchase planning

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared::planner::{plan_purchases, ShortfallLine};
use shared::validation::validate_positive_quantity;
use shared::{
    OtherExpense, OtherExpenseInput, ProductIndex, PurchaseRecord, PurchaseRecordInput,
};

use crate::error::{AppError, AppResult};
use crate::state::SessionState;
use crate::store::SnapshotStore;

/// Service for cash-outflow records and the shopping list
///
/// Log writes go straight through the store; the log-style collections are
/// keyed by id and do not use the debounced snapshot path.
#[derive(Clone)]
pub struct PurchaseService {
    state: Arc<SessionState>,
    store: Arc<dyn SnapshotStore>,
}

impl PurchaseService {
    pub fn new(state: Arc<SessionState>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { state, store }
    }

    pub async fn list_purchase_records(&self) -> AppResult<Vec<PurchaseRecord>> {
        self.store.load_purchase_records().await
    }

    /// Record an ingredient purchase
    ///
    /// Purchase records are a cash-flow log only; stock is adjusted through
    /// stock transactions, never from here.
    pub async fn record_purchase(&self, input: PurchaseRecordInput) -> AppResult<PurchaseRecord> {
        validate_positive_quantity(input.quantity)
            .map_err(|e| AppError::validation("quantity", e))?;

        let record = PurchaseRecord {
            id: Uuid::new_v4(),
            ingredient_id: input.ingredient_id,
            quantity: input.quantity,
            price: input.price,
            purchase_date: input.purchase_date,
            supplier: input.supplier,
            notes: input.notes,
            created_at: Utc::now(),
        };

        self.store.upsert_purchase_record(&record).await?;
        info!(record_id = %record.id, ingredient_id = %record.ingredient_id, "purchase recorded");
        Ok(record)
    }

    pub async fn delete_purchase_record(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_purchase_record(id).await?;
        info!(record_id = %id, "purchase record deleted");
        Ok(())
    }

    pub async fn list_expenses(&self) -> AppResult<Vec<OtherExpense>> {
        self.store.load_other_expenses().await
    }

    pub async fn record_expense(&self, input: OtherExpenseInput) -> AppResult<OtherExpense> {
        validate_positive_quantity(input.amount)
            .map_err(|e| AppError::validation("amount", e))?;

        let expense = OtherExpense {
            id: Uuid::new_v4(),
            category: input.category,
            amount: input.amount,
            description: input.description,
            expense_date: input.expense_date,
            created_at: Utc::now(),
        };

        self.store.upsert_other_expense(&expense).await?;
        info!(expense_id = %expense.id, category = %expense.category, "expense recorded");
        Ok(expense)
    }

    pub async fn delete_expense(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_other_expense(id).await?;
        info!(expense_id = %id, "expense deleted");
        Ok(())
    }

    /// Shopping list: ingredient shortfalls across all open orders
    pub async fn plan(&self) -> AppResult<Vec<ShortfallLine>> {
        let orders = self.state.orders.read().await;
        let products = self.state.products.read().await;
        let ingredients = self.state.ingredients.read().await;

        Ok(plan_purchases(
            &orders,
            &ProductIndex::new(&products),
            &ingredients,
        ))
    }
}
