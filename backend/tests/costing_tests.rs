//! Recipe costing and unit conversion tests
//!
//! Covers the purchase-to-usage conversion table, the unit-cost identities,
//! and the linearity of product costing over recipe quantities.

use std::str::FromStr;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::costing::{
    margin, product_cost, product_profit, unit_cost_in_purchase_unit, unit_cost_in_usage_unit,
};
use shared::units::{conversion_factor, to_purchase_unit, to_usage_unit};
use shared::{Ingredient, IngredientIndex, Product, RecipeLine, Unit};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ingredient(name: &str, purchase: Unit, usage: Unit, price: &str, qty: &str) -> Ingredient {
    let now = Utc::now();
    Ingredient {
        id: Uuid::new_v4(),
        name: name.into(),
        purchase_unit: purchase,
        usage_unit: usage,
        purchase_price: dec(price),
        purchase_quantity: dec(qty),
        current_stock: Decimal::ZERO,
        min_threshold: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

fn product(name: &str, selling_price: &str, recipe: Vec<RecipeLine>) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: String::new(),
        selling_price: dec(selling_price),
        category: "cake".into(),
        recipe,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Unit conversion
// ============================================================================

#[test]
fn weight_and_volume_factors() {
    assert_eq!(conversion_factor(Unit::Kilogram, Unit::Gram), dec("1000"));
    assert_eq!(conversion_factor(Unit::Gram, Unit::Kilogram), dec("0.001"));
    assert_eq!(conversion_factor(Unit::Liter, Unit::Milliliter), dec("1000"));
    assert_eq!(conversion_factor(Unit::Milliliter, Unit::Liter), dec("0.001"));
}

#[test]
fn same_unit_factor_is_one() {
    for unit in [
        Unit::Kilogram,
        Unit::Gram,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Piece,
        Unit::Fruit,
        Unit::Box,
    ] {
        assert_eq!(conversion_factor(unit, unit), Decimal::ONE);
    }
}

#[test]
fn count_units_are_interchangeable() {
    assert_eq!(conversion_factor(Unit::Piece, Unit::Fruit), Decimal::ONE);
    assert_eq!(conversion_factor(Unit::Box, Unit::Piece), Decimal::ONE);
    assert_eq!(conversion_factor(Unit::Fruit, Unit::Box), Decimal::ONE);
}

#[test]
fn opposite_factors_are_inverse() {
    for (a, b) in [
        (Unit::Kilogram, Unit::Gram),
        (Unit::Liter, Unit::Milliliter),
        (Unit::Piece, Unit::Box),
    ] {
        assert_eq!(
            conversion_factor(a, b) * conversion_factor(b, a),
            Decimal::ONE
        );
    }
}

#[test]
fn unmapped_pair_falls_back_to_one() {
    // Weight to volume has no defined conversion; the engine degrades to 1
    assert_eq!(conversion_factor(Unit::Kilogram, Unit::Milliliter), Decimal::ONE);
    assert_eq!(conversion_factor(Unit::Liter, Unit::Gram), Decimal::ONE);
    assert_eq!(conversion_factor(Unit::Kilogram, Unit::Piece), Decimal::ONE);
}

proptest! {
    #[test]
    fn conversion_round_trips_exactly(
        units in 0i64..1_000_000,
        scale in 0u32..3,
        pair in prop_oneof![
            Just((Unit::Kilogram, Unit::Gram)),
            Just((Unit::Gram, Unit::Kilogram)),
            Just((Unit::Liter, Unit::Milliliter)),
            Just((Unit::Milliliter, Unit::Liter)),
            Just((Unit::Piece, Unit::Piece)),
        ],
    ) {
        let quantity = Decimal::new(units, scale);
        let (purchase, usage) = pair;
        let there = to_usage_unit(quantity, purchase, usage);
        let back = to_purchase_unit(there, purchase, usage);
        prop_assert_eq!(back, quantity);
    }
}

// ============================================================================
// Unit costs
// ============================================================================

#[test]
fn flour_costing_scenario() {
    // 1 kg of flour for 20000, used by the gram: 20 per gram,
    // so a recipe using 50 g costs 1000
    let flour = ingredient("Flour", Unit::Kilogram, Unit::Gram, "20000", "1");
    assert_eq!(unit_cost_in_purchase_unit(&flour), dec("20000"));
    assert_eq!(unit_cost_in_usage_unit(&flour), dec("20"));

    let cake = product(
        "Sponge cake",
        "50000",
        vec![RecipeLine {
            ingredient_id: flour.id,
            quantity: dec("50"),
        }],
    );
    let ingredients = vec![flour];
    let index = IngredientIndex::new(&ingredients);
    assert_eq!(product_cost(&cake, &index), dec("1000"));
}

#[test]
fn zero_purchase_quantity_costs_zero() {
    let broken = ingredient("Broken", Unit::Kilogram, Unit::Gram, "20000", "0");
    assert_eq!(unit_cost_in_purchase_unit(&broken), Decimal::ZERO);
    assert_eq!(unit_cost_in_usage_unit(&broken), Decimal::ZERO);
}

#[test]
fn unit_cost_is_price_over_quantity() {
    let butter = ingredient("Butter", Unit::Kilogram, Unit::Gram, "150000", "2");
    assert_eq!(unit_cost_in_purchase_unit(&butter), dec("75000"));
    assert_eq!(unit_cost_in_usage_unit(&butter), dec("75"));
}

// ============================================================================
// Product costing
// ============================================================================

#[test]
fn missing_ingredient_contributes_zero() {
    let flour = ingredient("Flour", Unit::Kilogram, Unit::Gram, "20000", "1");
    let cake = product(
        "Cake",
        "80000",
        vec![
            RecipeLine {
                ingredient_id: flour.id,
                quantity: dec("100"),
            },
            RecipeLine {
                ingredient_id: Uuid::new_v4(), // deleted ingredient
                quantity: dec("500"),
            },
        ],
    );
    let ingredients = vec![flour];
    let index = IngredientIndex::new(&ingredients);
    // Only the flour line counts: 100 * 20
    assert_eq!(product_cost(&cake, &index), dec("2000"));
}

#[test]
fn empty_recipe_costs_zero() {
    let bare = product("Plain", "10000", vec![]);
    let ingredients: Vec<Ingredient> = vec![];
    let index = IngredientIndex::new(&ingredients);
    assert_eq!(product_cost(&bare, &index), Decimal::ZERO);
    assert_eq!(product_profit(&bare, &index), dec("10000"));
}

proptest! {
    #[test]
    fn product_cost_is_linear_in_recipe_quantity(
        qty in 1i64..10_000,
        factor in 1i64..20,
    ) {
        let flour = ingredient("Flour", Unit::Kilogram, Unit::Gram, "20000", "1");
        let base_line = RecipeLine {
            ingredient_id: flour.id,
            quantity: Decimal::from(qty),
        };
        let scaled_line = RecipeLine {
            ingredient_id: flour.id,
            quantity: Decimal::from(qty * factor),
        };
        let base = product("Base", "0", vec![base_line]);
        let scaled = product("Scaled", "0", vec![scaled_line]);

        let ingredients = vec![flour];
        let index = IngredientIndex::new(&ingredients);
        prop_assert_eq!(
            product_cost(&scaled, &index),
            product_cost(&base, &index) * Decimal::from(factor)
        );
    }
}

// ============================================================================
// Margin
// ============================================================================

#[test]
fn margin_is_undefined_at_zero_price() {
    let flour = ingredient("Flour", Unit::Kilogram, Unit::Gram, "20000", "1");
    let free = product(
        "Sample",
        "0",
        vec![RecipeLine {
            ingredient_id: flour.id,
            quantity: dec("10"),
        }],
    );
    let ingredients = vec![flour];
    let index = IngredientIndex::new(&ingredients);
    assert_eq!(margin(&free, &index), None);
}

#[test]
fn margin_identity() {
    let flour = ingredient("Flour", Unit::Kilogram, Unit::Gram, "20000", "1");
    let cake = product(
        "Cake",
        "4000",
        vec![RecipeLine {
            ingredient_id: flour.id,
            quantity: dec("50"),
        }],
    );
    let ingredients = vec![flour];
    let index = IngredientIndex::new(&ingredients);

    // cost 1000, price 4000: margin 0.75, profit 3000
    assert_eq!(margin(&cake, &index), Some(dec("0.75")));
    assert_eq!(product_profit(&cake, &index), dec("3000"));
}
