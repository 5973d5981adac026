//! Common types used across the bakery management core

use serde::{Deserialize, Serialize};

/// Measurement units for ingredients
///
/// Weight and volume units convert within their family; the count units
/// (piece, fruit, box) are treated as interchangeable one-to-one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "cái")]
    Piece,
    #[serde(rename = "quả")]
    Fruit,
    #[serde(rename = "hộp")]
    Box,
}

impl Unit {
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Liter => "l",
            Unit::Milliliter => "ml",
            Unit::Piece => "cái",
            Unit::Fruit => "quả",
            Unit::Box => "hộp",
        }
    }

    /// Discrete count units (no fractional conversion between them)
    pub fn is_countable(&self) -> bool {
        matches!(self, Unit::Piece | Unit::Fruit | Unit::Box)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Unit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Unit::Kilogram),
            "g" => Ok(Unit::Gram),
            "l" => Ok(Unit::Liter),
            "ml" => Ok(Unit::Milliliter),
            "cái" => Ok(Unit::Piece),
            "quả" => Ok(Unit::Fruit),
            "hộp" => Ok(Unit::Box),
            _ => Err("unknown unit code"),
        }
    }
}

/// Order lifecycle status
///
/// Strict forward progression Pending -> InProgress -> Completed ->
/// Delivered. Cancelled is reachable from Pending or InProgress only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (Completed, Delivered)
                | (Pending, Cancelled)
                | (InProgress, Cancelled)
        )
    }

    /// Statuses still waiting on production (feed the purchase planner)
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProgress)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err("unknown order status"),
        }
    }
}

/// Payment methods accepted by the shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err("unknown payment method"),
        }
    }
}

/// Status filter for order listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

/// Time window for report queries, evaluated against an injected "now"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeFilter {
    Today,
    Last7Days,
    Last30Days,
    #[default]
    All,
}
