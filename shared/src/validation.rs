//! Validation utilities for the bakery management core

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::models::{IngredientInput, RecipeLine};

/// Validate an ingredient definition before it enters the catalog
pub fn validate_ingredient(input: &IngredientInput) -> Result<(), &'static str> {
    if input.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty");
    }
    if input.purchase_price < Decimal::ZERO {
        return Err("Purchase price cannot be negative");
    }
    if input.purchase_quantity < Decimal::ZERO {
        return Err("Purchase quantity cannot be negative");
    }
    if input.min_threshold < Decimal::ZERO {
        return Err("Minimum threshold cannot be negative");
    }
    Ok(())
}

/// Reject recipes that reference the same ingredient twice
///
/// The costing engine itself tolerates any recipe; uniqueness is enforced
/// here, at the editing boundary.
pub fn validate_recipe(recipe: &[RecipeLine]) -> Result<(), &'static str> {
    let mut seen = HashSet::new();
    for line in recipe {
        if !seen.insert(line.ingredient_id) {
            return Err("Recipe lists the same ingredient more than once");
        }
        if line.quantity <= Decimal::ZERO {
            return Err("Recipe quantities must be positive");
        }
    }
    Ok(())
}

/// Validate a manual stock movement or purchase quantity
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a phone number (digits, at least 8 of them)
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 8 {
        return Err("Phone number must contain at least 8 digits");
    }
    Ok(())
}
