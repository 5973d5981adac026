//! Ingredient purchase records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only log entry for an ingredient purchase
///
/// Purchase records track cash outflow only; they never drive
/// `Ingredient::current_stock`, which is adjusted through stock
/// transactions and order deductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    /// Quantity bought, in the ingredient's purchase unit
    pub quantity: Decimal,
    /// Total price paid for `quantity`
    pub price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecordInput {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}
