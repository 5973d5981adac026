//! Customer order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{OrderStatus, PaymentMethod};

/// One product line on an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// Payment state attached to an order
///
/// `remaining_amount` is derived from `total_amount - paid_amount` and is
/// recomputed on every mutation; it is never an independent source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

impl PaymentInfo {
    /// Zero-paid payment for a fresh order
    pub fn unpaid(method: PaymentMethod, total_amount: Decimal) -> Self {
        Self {
            method,
            total_amount,
            paid_amount: Decimal::ZERO,
            remaining_amount: total_amount,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount <= Decimal::ZERO
    }
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub deadline: DateTime<Utc>,
    pub items: Vec<OrderLineItem>,
    pub status: OrderStatus,
    pub payment: Option<PaymentInfo>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub deadline: DateTime<Utc>,
    pub items: Vec<OrderLineItem>,
    pub payment_method: PaymentMethod,
    pub paid_amount: Decimal,
    pub notes: Option<String>,
}
