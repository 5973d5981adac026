//! Inventory ledger tests
//!
//! The two stock-movement paths have different floors: order deduction may
//! go negative, manual transactions clamp at zero in both directions.

use std::str::FromStr;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::ledger::{apply_transaction, deduct_for_order, reverse_transaction};
use shared::{
    Ingredient, Order, OrderLineItem, OrderStatus, Product, ProductIndex, RecipeLine,
    StockTransaction, StockTransactionKind, Unit,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ingredient_with_stock(name: &str, stock: &str) -> Ingredient {
    let now = Utc::now();
    Ingredient {
        id: Uuid::new_v4(),
        name: name.into(),
        purchase_unit: Unit::Kilogram,
        usage_unit: Unit::Gram,
        purchase_price: dec("20000"),
        purchase_quantity: Decimal::ONE,
        current_stock: dec(stock),
        min_threshold: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

fn product_using(ingredient_id: Uuid, quantity: &str) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        name: "Cake".into(),
        description: String::new(),
        selling_price: dec("50000"),
        category: "cake".into(),
        recipe: vec![RecipeLine {
            ingredient_id,
            quantity: dec(quantity),
        }],
        created_at: now,
        updated_at: now,
    }
}

fn order_of(product_id: Uuid, quantity: &str) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4(),
        customer_name: "Linh".into(),
        customer_phone: "0901234567".into(),
        deadline: now,
        items: vec![OrderLineItem {
            product_id,
            quantity: dec(quantity),
        }],
        status: OrderStatus::InProgress,
        payment: None,
        notes: None,
        created_at: now,
    }
}

fn transaction(
    ingredient_id: Uuid,
    kind: StockTransactionKind,
    quantity: &str,
) -> StockTransaction {
    let now = Utc::now();
    StockTransaction {
        id: Uuid::new_v4(),
        ingredient_id,
        kind,
        quantity: dec(quantity),
        reason: "adjustment".into(),
        notes: None,
        transaction_date: now,
        created_at: now,
    }
}

// ============================================================================
// Order deduction
// ============================================================================

#[test]
fn deduction_subtracts_recipe_times_order_quantity() {
    let mut ingredients = vec![ingredient_with_stock("Flour", "1000")];
    let product = product_using(ingredients[0].id, "50");
    let order = order_of(product.id, "3");

    let products = vec![product];
    deduct_for_order(&mut ingredients, &order, &ProductIndex::new(&products));

    // 1000 - 50 * 3
    assert_eq!(ingredients[0].current_stock, dec("850"));
}

#[test]
fn deduction_may_go_negative() {
    let mut ingredients = vec![ingredient_with_stock("Flour", "100")];
    let product = product_using(ingredients[0].id, "80");
    let order = order_of(product.id, "2");

    let products = vec![product];
    deduct_for_order(&mut ingredients, &order, &ProductIndex::new(&products));

    // Negative stock is the signal of unfulfillable demand
    assert_eq!(ingredients[0].current_stock, dec("-60"));
}

#[test]
fn deduction_skips_missing_product_and_ingredient() {
    let mut ingredients = vec![ingredient_with_stock("Flour", "500")];
    let product = product_using(Uuid::new_v4(), "50"); // ingredient not in snapshot
    let mut order = order_of(product.id, "1");
    order.items.push(OrderLineItem {
        product_id: Uuid::new_v4(), // product not in snapshot
        quantity: Decimal::ONE,
    });

    let products = vec![product];
    deduct_for_order(&mut ingredients, &order, &ProductIndex::new(&products));

    assert_eq!(ingredients[0].current_stock, dec("500"));
}

// ============================================================================
// Manual transactions
// ============================================================================

#[test]
fn apply_in_adds_stock() {
    let mut ingredients = vec![ingredient_with_stock("Sugar", "200")];
    let tx = transaction(ingredients[0].id, StockTransactionKind::In, "300");

    assert!(apply_transaction(&mut ingredients, &tx));
    assert_eq!(ingredients[0].current_stock, dec("500"));
}

#[test]
fn apply_out_clamps_at_zero() {
    let mut ingredients = vec![ingredient_with_stock("Sugar", "100")];
    let tx = transaction(ingredients[0].id, StockTransactionKind::Out, "250");

    assert!(apply_transaction(&mut ingredients, &tx));
    assert_eq!(ingredients[0].current_stock, Decimal::ZERO);
}

#[test]
fn reverse_restores_stock_exactly() {
    let mut ingredients = vec![ingredient_with_stock("Sugar", "400")];
    let tx = transaction(ingredients[0].id, StockTransactionKind::Out, "150");

    apply_transaction(&mut ingredients, &tx);
    assert_eq!(ingredients[0].current_stock, dec("250"));

    reverse_transaction(&mut ingredients, &tx);
    assert_eq!(ingredients[0].current_stock, dec("400"));
}

#[test]
fn reverse_of_in_clamps_at_zero() {
    // Stock was consumed after the IN; reversing cannot go negative
    let mut ingredients = vec![ingredient_with_stock("Sugar", "50")];
    let tx = transaction(ingredients[0].id, StockTransactionKind::In, "200");

    reverse_transaction(&mut ingredients, &tx);
    assert_eq!(ingredients[0].current_stock, Decimal::ZERO);
}

#[test]
fn missing_ingredient_is_reported() {
    let mut ingredients = vec![ingredient_with_stock("Sugar", "50")];
    let tx = transaction(Uuid::new_v4(), StockTransactionKind::In, "10");

    assert!(!apply_transaction(&mut ingredients, &tx));
    assert!(!reverse_transaction(&mut ingredients, &tx));
    assert_eq!(ingredients[0].current_stock, dec("50"));
}

proptest! {
    #[test]
    fn in_transaction_round_trips(stock in 0i64..1_000_000, qty in 1i64..1_000_000) {
        let mut ingredients = vec![ingredient_with_stock("Sugar", "0")];
        ingredients[0].current_stock = Decimal::from(stock);
        let tx = transaction(ingredients[0].id, StockTransactionKind::In, "1");
        let tx = StockTransaction { quantity: Decimal::from(qty), ..tx };

        apply_transaction(&mut ingredients, &tx);
        reverse_transaction(&mut ingredients, &tx);
        prop_assert_eq!(ingredients[0].current_stock, Decimal::from(stock));
    }

    #[test]
    fn out_transaction_round_trips_when_covered(
        qty in 1i64..1_000,
        headroom in 0i64..1_000,
    ) {
        // OUT only round-trips when the stock covers the quantity;
        // otherwise the clamp absorbs part of the movement
        let stock = qty + headroom;
        let mut ingredients = vec![ingredient_with_stock("Sugar", "0")];
        ingredients[0].current_stock = Decimal::from(stock);
        let tx = transaction(ingredients[0].id, StockTransactionKind::Out, "1");
        let tx = StockTransaction { quantity: Decimal::from(qty), ..tx };

        apply_transaction(&mut ingredients, &tx);
        reverse_transaction(&mut ingredients, &tx);
        prop_assert_eq!(ingredients[0].current_stock, Decimal::from(stock));
    }
}
