//! Non-ingredient operating expenses

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A miscellaneous expense (utilities, shipping, tools, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherExpense {
    pub id: Uuid,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherExpenseInput {
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub expense_date: DateTime<Utc>,
}
