//! Product and recipe models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a product's bill of materials
///
/// `quantity` is expressed in the referenced ingredient's usage unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeLine {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
}

/// A sellable product defined by its recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub selling_price: Decimal,
    pub category: String,
    /// Ingredient references must be unique within one recipe; callers
    /// reject duplicate adds before they reach the engine
    pub recipe: Vec<RecipeLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn recipe_line(&self, ingredient_id: Uuid) -> Option<&RecipeLine> {
        self.recipe.iter().find(|l| l.ingredient_id == ingredient_id)
    }
}

/// Input for creating or updating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub selling_price: Decimal,
    pub category: String,
    pub recipe: Vec<RecipeLine>,
}
