//! Ingredient models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Unit;

/// A raw ingredient tracked by the shop
///
/// Ingredients are bought in `purchase_unit` (e.g. kilograms) but consumed
/// by recipes in `usage_unit` (e.g. grams). `current_stock` and
/// `min_threshold` are always expressed in the usage unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub purchase_unit: Unit,
    pub usage_unit: Unit,
    /// Price paid for `purchase_quantity` units of `purchase_unit`
    pub purchase_price: Decimal,
    pub purchase_quantity: Decimal,
    /// On-hand stock in usage units; may go negative after order deduction
    pub current_stock: Decimal,
    /// Low-stock alert level, in usage units
    pub min_threshold: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn is_below_threshold(&self) -> bool {
        self.current_stock < self.min_threshold
    }
}

/// Input for creating or updating an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub purchase_unit: Unit,
    pub usage_unit: Unit,
    pub purchase_price: Decimal,
    pub purchase_quantity: Decimal,
    pub current_stock: Decimal,
    pub min_threshold: Decimal,
}
