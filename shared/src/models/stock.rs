//! Manual stock adjustment models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a manual stock adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StockTransactionKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl StockTransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockTransactionKind::In => "IN",
            StockTransactionKind::Out => "OUT",
        }
    }
}

impl std::str::FromStr for StockTransactionKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(StockTransactionKind::In),
            "OUT" => Ok(StockTransactionKind::Out),
            _ => Err("unknown stock transaction kind"),
        }
    }
}

/// A manual stock movement outside the order flow
///
/// Applying one mutates `current_stock`; deleting one must apply the exact
/// inverse so the ledger does not drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub kind: StockTransactionKind,
    /// Quantity in the ingredient's usage unit
    pub quantity: Decimal,
    pub reason: String,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a manual stock movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransactionInput {
    pub ingredient_id: Uuid,
    pub kind: StockTransactionKind,
    pub quantity: Decimal,
    pub reason: String,
    pub notes: Option<String>,
}
