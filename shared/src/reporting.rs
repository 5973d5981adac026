//! Revenue, profit, and cash-flow aggregation
//!
//! Which lifecycle stages count as recognized revenue is an open product
//! question (the historical dashboard counted Completed but not Delivered),
//! so every aggregation takes an explicit status inclusion set instead of
//! hard-coding one.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::product_cost;
use crate::models::{Order, OtherExpense, PurchaseRecord};
use crate::snapshot::{IngredientIndex, ProductIndex};
use crate::types::OrderStatus;

/// Default inclusion set of the historical dashboard
pub const REVENUE_STATUSES: &[OrderStatus] = &[OrderStatus::Completed];

/// Inclusion set used for cash-flow, which also counts delivered orders
pub const CASH_FLOW_STATUSES: &[OrderStatus] = &[OrderStatus::Completed, OrderStatus::Delivered];

/// Aggregate revenue figures over a set of orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueStats {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Profit as a percentage of revenue; zero when there is no revenue
    pub profit_margin_percent: Decimal,
    pub orders_count: usize,
}

/// One calendar day of revenue, cost, and profit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

/// Revenue contribution of a single product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRevenue {
    pub product_id: Uuid,
    pub name: String,
    pub revenue: Decimal,
    pub quantity_sold: Decimal,
    pub percent_of_total: Decimal,
}

/// Money in versus money out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowSummary {
    pub revenue: Decimal,
    pub purchase_spend: Decimal,
    pub other_expenses: Decimal,
    pub available_cash: Decimal,
}

fn order_revenue_and_cost(
    order: &Order,
    products: &ProductIndex<'_>,
    ingredients: &IngredientIndex<'_>,
) -> (Decimal, Decimal) {
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    for item in &order.items {
        // Missing products contribute nothing to either side
        if let Some(product) = products.get(item.product_id) {
            revenue += product.selling_price * item.quantity;
            cost += product_cost(product, ingredients) * item.quantity;
        }
    }
    (revenue, cost)
}

/// Totals over all orders whose status is in the inclusion set
pub fn revenue_stats(
    orders: &[Order],
    products: &ProductIndex<'_>,
    ingredients: &IngredientIndex<'_>,
    included: &[OrderStatus],
) -> RevenueStats {
    let mut revenue = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    let mut orders_count = 0;

    for order in orders.iter().filter(|o| included.contains(&o.status)) {
        let (r, c) = order_revenue_and_cost(order, products, ingredients);
        revenue += r;
        cost += c;
        orders_count += 1;
    }

    let profit = revenue - cost;
    let profit_margin_percent = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        profit / revenue * Decimal::from(100)
    };

    RevenueStats {
        revenue,
        cost,
        profit,
        profit_margin_percent,
        orders_count,
    }
}

/// Revenue, cost, and profit bucketed by calendar day of order creation
pub fn daily_series(
    orders: &[Order],
    products: &ProductIndex<'_>,
    ingredients: &IngredientIndex<'_>,
    included: &[OrderStatus],
) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();

    for order in orders.iter().filter(|o| included.contains(&o.status)) {
        let (revenue, cost) = order_revenue_and_cost(order, products, ingredients);
        let entry = by_day.entry(order.created_at.date_naive()).or_default();
        entry.0 += revenue;
        entry.1 += cost;
    }

    let mut series: Vec<DailyPoint> = by_day
        .into_iter()
        .map(|(date, (revenue, cost))| DailyPoint {
            date,
            revenue,
            cost,
            profit: revenue - cost,
        })
        .collect();
    series.sort_by_key(|p| p.date);
    series
}

/// Top `limit` products by revenue, with their share of the total
pub fn top_products(
    orders: &[Order],
    products: &ProductIndex<'_>,
    included: &[OrderStatus],
    limit: usize,
) -> Vec<ProductRevenue> {
    let mut by_product: HashMap<Uuid, (String, Decimal, Decimal)> = HashMap::new();
    let mut total_revenue = Decimal::ZERO;

    for order in orders.iter().filter(|o| included.contains(&o.status)) {
        for item in &order.items {
            if let Some(product) = products.get(item.product_id) {
                let revenue = product.selling_price * item.quantity;
                total_revenue += revenue;
                let entry = by_product
                    .entry(product.id)
                    .or_insert_with(|| (product.name.clone(), Decimal::ZERO, Decimal::ZERO));
                entry.1 += revenue;
                entry.2 += item.quantity;
            }
        }
    }

    let mut ranking: Vec<ProductRevenue> = by_product
        .into_iter()
        .map(|(product_id, (name, revenue, quantity_sold))| ProductRevenue {
            product_id,
            name,
            revenue,
            quantity_sold,
            percent_of_total: if total_revenue.is_zero() {
                Decimal::ZERO
            } else {
                revenue / total_revenue * Decimal::from(100)
            },
        })
        .collect();

    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}

/// Cash position: recognized revenue minus ingredient purchases and other
/// operating expenses
pub fn cash_flow_summary(
    orders: &[Order],
    products: &ProductIndex<'_>,
    purchases: &[PurchaseRecord],
    expenses: &[OtherExpense],
    included: &[OrderStatus],
) -> CashFlowSummary {
    let revenue: Decimal = orders
        .iter()
        .filter(|o| included.contains(&o.status))
        .map(|o| {
            o.items
                .iter()
                .filter_map(|item| {
                    products
                        .get(item.product_id)
                        .map(|p| p.selling_price * item.quantity)
                })
                .sum::<Decimal>()
        })
        .sum();

    let purchase_spend: Decimal = purchases.iter().map(|r| r.price).sum();
    let other_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();

    CashFlowSummary {
        revenue,
        purchase_spend,
        other_expenses,
        available_cash: revenue - purchase_spend - other_expenses,
    }
}
