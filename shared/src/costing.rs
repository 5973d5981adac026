//! Recipe-based product costing
//!
//! Every downstream figure (dashboard profit, revenue reports, purchase
//! planning) derives from these functions, so they stay pure over an
//! ingredient snapshot and degrade to zero instead of failing: a recipe
//! line whose ingredient was deleted contributes nothing, and a zero
//! purchase quantity yields a zero unit cost.

use rust_decimal::Decimal;

use crate::models::{Ingredient, Product};
use crate::snapshot::IngredientIndex;
use crate::units::conversion_factor;

/// Cost of one purchase unit of an ingredient
///
/// Zero when `purchase_quantity` is not positive (degenerate record, not an
/// error).
pub fn unit_cost_in_purchase_unit(ingredient: &Ingredient) -> Decimal {
    if ingredient.purchase_quantity > Decimal::ZERO {
        ingredient.purchase_price / ingredient.purchase_quantity
    } else {
        Decimal::ZERO
    }
}

/// Cost of one usage unit of an ingredient
pub fn unit_cost_in_usage_unit(ingredient: &Ingredient) -> Decimal {
    let factor = conversion_factor(ingredient.purchase_unit, ingredient.usage_unit);
    if factor.is_zero() {
        return Decimal::ZERO;
    }
    unit_cost_in_purchase_unit(ingredient) / factor
}

/// Total ingredient cost of one unit of a product
///
/// Lines referencing a missing ingredient contribute zero.
pub fn product_cost(product: &Product, ingredients: &IngredientIndex<'_>) -> Decimal {
    product
        .recipe
        .iter()
        .map(|line| match ingredients.get(line.ingredient_id) {
            Some(ingredient) => unit_cost_in_usage_unit(ingredient) * line.quantity,
            None => {
                tracing::debug!(
                    product = %product.name,
                    ingredient_id = %line.ingredient_id,
                    "recipe line references a missing ingredient, counted as zero cost"
                );
                Decimal::ZERO
            }
        })
        .sum()
}

/// Profit margin as a fraction of the selling price
///
/// `None` when the selling price is zero (margin is undefined).
pub fn margin(product: &Product, ingredients: &IngredientIndex<'_>) -> Option<Decimal> {
    if product.selling_price.is_zero() {
        return None;
    }
    let cost = product_cost(product, ingredients);
    Some((product.selling_price - cost) / product.selling_price)
}

/// Absolute profit for one unit of a product
pub fn product_profit(product: &Product, ingredients: &IngredientIndex<'_>) -> Decimal {
    product.selling_price - product_cost(product, ingredients)
}
