//! Unit conversion between purchase and usage units

use rust_decimal::Decimal;

use crate::types::Unit;

/// Conversion factor from a purchase unit to a usage unit
///
/// `1 purchase_unit == factor * usage_unit`. Unmapped pairs fall back to 1
/// with a warning rather than failing; callers must not rely on correctness
/// for pairs outside the modeled weight/volume/count families.
pub fn conversion_factor(purchase_unit: Unit, usage_unit: Unit) -> Decimal {
    if purchase_unit == usage_unit {
        return Decimal::ONE;
    }

    match (purchase_unit, usage_unit) {
        (Unit::Kilogram, Unit::Gram) => Decimal::from(1000),
        (Unit::Gram, Unit::Kilogram) => Decimal::new(1, 3),
        (Unit::Liter, Unit::Milliliter) => Decimal::from(1000),
        (Unit::Milliliter, Unit::Liter) => Decimal::new(1, 3),
        (p, u) if p.is_countable() && u.is_countable() => Decimal::ONE,
        (p, u) => {
            tracing::warn!("no conversion defined from {} to {}, assuming 1", p, u);
            Decimal::ONE
        }
    }
}

/// Convert a quantity expressed in the purchase unit into usage units
pub fn to_usage_unit(quantity: Decimal, purchase_unit: Unit, usage_unit: Unit) -> Decimal {
    quantity * conversion_factor(purchase_unit, usage_unit)
}

/// Convert a quantity expressed in the usage unit into purchase units
pub fn to_purchase_unit(quantity: Decimal, purchase_unit: Unit, usage_unit: Unit) -> Decimal {
    quantity / conversion_factor(purchase_unit, usage_unit)
}
