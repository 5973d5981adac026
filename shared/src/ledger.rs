//! Inventory ledger
//!
//! Locally-mutating operations over an ingredient snapshot. Two distinct
//! stock-movement paths with deliberately different floors:
//!
//! - order deduction may drive stock negative, which is the visible signal
//!   of unfulfillable demand;
//! - manual transactions clamp at zero so an entry mistake cannot produce a
//!   confusing negative display.

use rust_decimal::Decimal;

use crate::models::{Ingredient, Order, StockTransaction, StockTransactionKind};
use crate::snapshot::ProductIndex;

fn find_mut(ingredients: &mut [Ingredient], id: uuid::Uuid) -> Option<&mut Ingredient> {
    ingredients.iter_mut().find(|i| i.id == id)
}

/// Deduct the ingredients an order consumes from stock
///
/// For every line item, each recipe line subtracts
/// `recipe quantity * ordered quantity` from the ingredient's stock, with no
/// floor at zero. Missing products or ingredients are skipped and logged.
///
/// Must run exactly once per order transition into Completed; the caller
/// guards against re-entry by checking the previous status.
pub fn deduct_for_order(
    ingredients: &mut [Ingredient],
    order: &Order,
    products: &ProductIndex<'_>,
) {
    for item in &order.items {
        let Some(product) = products.get(item.product_id) else {
            tracing::debug!(
                order_id = %order.id,
                product_id = %item.product_id,
                "order line references a missing product, skipping deduction"
            );
            continue;
        };

        for line in &product.recipe {
            match find_mut(ingredients, line.ingredient_id) {
                Some(ingredient) => {
                    ingredient.current_stock -= line.quantity * item.quantity;
                }
                None => {
                    tracing::debug!(
                        product = %product.name,
                        ingredient_id = %line.ingredient_id,
                        "recipe line references a missing ingredient, skipping deduction"
                    );
                }
            }
        }
    }
}

/// Apply a manual stock transaction to the snapshot
///
/// IN adds, OUT subtracts; the result is clamped at zero. Returns false when
/// the ingredient no longer exists.
pub fn apply_transaction(ingredients: &mut [Ingredient], tx: &StockTransaction) -> bool {
    let Some(ingredient) = find_mut(ingredients, tx.ingredient_id) else {
        tracing::warn!(
            transaction_id = %tx.id,
            ingredient_id = %tx.ingredient_id,
            "stock transaction references a missing ingredient"
        );
        return false;
    };

    let new_stock = match tx.kind {
        StockTransactionKind::In => ingredient.current_stock + tx.quantity,
        StockTransactionKind::Out => ingredient.current_stock - tx.quantity,
    };
    ingredient.current_stock = new_stock.max(Decimal::ZERO);
    true
}

/// Undo a previously applied stock transaction
///
/// Called when a transaction record is deleted, to keep the ledger from
/// drifting. The inverse movement is clamped at zero like the original
/// application.
pub fn reverse_transaction(ingredients: &mut [Ingredient], tx: &StockTransaction) -> bool {
    let Some(ingredient) = find_mut(ingredients, tx.ingredient_id) else {
        tracing::warn!(
            transaction_id = %tx.id,
            ingredient_id = %tx.ingredient_id,
            "cannot reverse stock transaction, ingredient is missing"
        );
        return false;
    };

    let new_stock = match tx.kind {
        StockTransactionKind::In => ingredient.current_stock - tx.quantity,
        StockTransactionKind::Out => ingredient.current_stock + tx.quantity,
    };
    ingredient.current_stock = new_stock.max(Decimal::ZERO);
    true
}
