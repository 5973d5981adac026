//! Ingredient catalog and stock ledger service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared::validation::{validate_ingredient, validate_positive_quantity};
use shared::{ledger, Ingredient, IngredientInput, StockTransaction, StockTransactionInput};

use crate::debounce::{DebouncedWriter, SavePayload};
use crate::error::{AppError, AppResult};
use crate::state::SessionState;
use crate::store::SnapshotStore;

/// Service for the ingredient catalog and manual stock movements
#[derive(Clone)]
pub struct InventoryService {
    state: Arc<SessionState>,
    store: Arc<dyn SnapshotStore>,
    writer: DebouncedWriter,
}

impl InventoryService {
    pub fn new(
        state: Arc<SessionState>,
        store: Arc<dyn SnapshotStore>,
        writer: DebouncedWriter,
    ) -> Self {
        Self {
            state,
            store,
            writer,
        }
    }

    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        Ok(self.state.ingredients.read().await.clone())
    }

    /// Ingredients whose stock sits below their alert threshold
    pub async fn low_stock(&self) -> AppResult<Vec<Ingredient>> {
        let ingredients = self.state.ingredients.read().await;
        Ok(ingredients
            .iter()
            .filter(|i| i.is_below_threshold())
            .cloned()
            .collect())
    }

    pub async fn create_ingredient(&self, input: IngredientInput) -> AppResult<Ingredient> {
        validate_ingredient(&input).map_err(|e| AppError::validation("ingredient", e))?;

        let now = Utc::now();
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: input.name,
            purchase_unit: input.purchase_unit,
            usage_unit: input.usage_unit,
            purchase_price: input.purchase_price,
            purchase_quantity: input.purchase_quantity,
            current_stock: input.current_stock,
            min_threshold: input.min_threshold,
            created_at: now,
            updated_at: now,
        };

        let mut ingredients = self.state.ingredients.write().await;
        ingredients.push(ingredient.clone());
        self.writer
            .schedule(SavePayload::Ingredients(ingredients.clone()));

        info!(ingredient_id = %ingredient.id, name = %ingredient.name, "ingredient created");
        Ok(ingredient)
    }

    pub async fn update_ingredient(
        &self,
        id: Uuid,
        input: IngredientInput,
    ) -> AppResult<Ingredient> {
        validate_ingredient(&input).map_err(|e| AppError::validation("ingredient", e))?;

        let mut ingredients = self.state.ingredients.write().await;
        let ingredient = ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Ingredient {id}")))?;

        ingredient.name = input.name;
        ingredient.purchase_unit = input.purchase_unit;
        ingredient.usage_unit = input.usage_unit;
        ingredient.purchase_price = input.purchase_price;
        ingredient.purchase_quantity = input.purchase_quantity;
        ingredient.current_stock = input.current_stock;
        ingredient.min_threshold = input.min_threshold;
        ingredient.updated_at = Utc::now();

        let updated = ingredient.clone();
        self.writer
            .schedule(SavePayload::Ingredients(ingredients.clone()));
        Ok(updated)
    }

    pub async fn delete_ingredient(&self, id: Uuid) -> AppResult<()> {
        let mut ingredients = self.state.ingredients.write().await;
        let before = ingredients.len();
        ingredients.retain(|i| i.id != id);
        if ingredients.len() == before {
            return Err(AppError::NotFound(format!("Ingredient {id}")));
        }

        self.writer
            .schedule(SavePayload::Ingredients(ingredients.clone()));
        info!(ingredient_id = %id, "ingredient deleted");
        Ok(())
    }

    pub async fn list_stock_transactions(&self) -> AppResult<Vec<StockTransaction>> {
        self.store.load_stock_transactions().await
    }

    /// Record a manual stock movement and apply it to the ledger
    pub async fn record_stock_transaction(
        &self,
        input: StockTransactionInput,
    ) -> AppResult<StockTransaction> {
        validate_positive_quantity(input.quantity)
            .map_err(|e| AppError::validation("quantity", e))?;

        let now = Utc::now();
        let tx = StockTransaction {
            id: Uuid::new_v4(),
            ingredient_id: input.ingredient_id,
            kind: input.kind,
            quantity: input.quantity,
            reason: input.reason,
            notes: input.notes,
            transaction_date: now,
            created_at: now,
        };

        let mut ingredients = self.state.ingredients.write().await;
        if !ledger::apply_transaction(&mut ingredients, &tx) {
            return Err(AppError::NotFound(format!(
                "Ingredient {}",
                tx.ingredient_id
            )));
        }

        // The transaction log is append-only and written through directly;
        // only the ingredient snapshot goes through the debounced path
        self.store.append_stock_transaction(&tx).await?;
        self.writer
            .schedule(SavePayload::Ingredients(ingredients.clone()));

        info!(
            transaction_id = %tx.id,
            ingredient_id = %tx.ingredient_id,
            kind = tx.kind.as_str(),
            "stock transaction recorded"
        );
        Ok(tx)
    }

    /// Delete a stock transaction, applying the inverse movement so the
    /// ledger does not drift
    pub async fn delete_stock_transaction(&self, id: Uuid) -> AppResult<()> {
        let transactions = self.store.load_stock_transactions().await?;
        let tx = transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Stock transaction {id}")))?;

        let mut ingredients = self.state.ingredients.write().await;
        ledger::reverse_transaction(&mut ingredients, tx);

        self.store.delete_stock_transaction(id).await?;
        self.writer
            .schedule(SavePayload::Ingredients(ingredients.clone()));

        info!(transaction_id = %id, "stock transaction deleted");
        Ok(())
    }
}
