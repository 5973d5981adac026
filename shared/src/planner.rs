//! Purchase planning
//!
//! Projects aggregate ingredient demand for all open orders against current
//! stock and reports what has to be bought. Read-only: the ledger is never
//! mutated here.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ingredient, Order};
use crate::snapshot::{IngredientIndex, ProductIndex};
use crate::types::Unit;

/// One ingredient the shop has to buy before open orders can be fulfilled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortfallLine {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit: Unit,
    /// Aggregate demand across all open orders, in usage units
    pub required_quantity: Decimal,
    pub current_stock: Decimal,
    pub need_to_buy: Decimal,
}

/// Compute the shortfall list for all open (Pending or InProgress) orders
///
/// Demand accumulates per ingredient across every open order. Only
/// ingredients whose demand exceeds stock are reported, sorted descending by
/// the quantity to buy; an ingredient in no open order never appears, even
/// when its stock sits below the alert threshold.
pub fn plan_purchases(
    orders: &[Order],
    products: &ProductIndex<'_>,
    ingredients: &[Ingredient],
) -> Vec<ShortfallLine> {
    let index = IngredientIndex::new(ingredients);
    let mut required: HashMap<Uuid, Decimal> = HashMap::new();

    for order in orders.iter().filter(|o| o.status.is_open()) {
        for item in &order.items {
            let Some(product) = products.get(item.product_id) else {
                continue;
            };
            for line in &product.recipe {
                if index.get(line.ingredient_id).is_none() {
                    continue;
                }
                *required.entry(line.ingredient_id).or_default() +=
                    line.quantity * item.quantity;
            }
        }
    }

    let mut shortfalls: Vec<ShortfallLine> = required
        .into_iter()
        .filter_map(|(ingredient_id, required_quantity)| {
            let ingredient = index.get(ingredient_id)?;
            if required_quantity <= ingredient.current_stock {
                return None;
            }
            Some(ShortfallLine {
                ingredient_id,
                ingredient_name: ingredient.name.clone(),
                unit: ingredient.usage_unit,
                required_quantity,
                current_stock: ingredient.current_stock,
                need_to_buy: required_quantity - ingredient.current_stock,
            })
        })
        .collect();

    shortfalls.sort_by(|a, b| b.need_to_buy.cmp(&a.need_to_buy));
    shortfalls
}
