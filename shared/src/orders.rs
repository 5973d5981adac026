//! Order aggregation: totals, payments, and listing filters

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Order, OrderLineItem, PaymentInfo};
use crate::snapshot::ProductIndex;
use crate::types::{DateRangeFilter, StatusFilter};

/// Selling-price total over a set of order line items
///
/// Line items referencing a missing product contribute zero.
pub fn line_items_total(items: &[OrderLineItem], products: &ProductIndex<'_>) -> Decimal {
    items
        .iter()
        .map(|item| match products.get(item.product_id) {
            Some(product) => product.selling_price * item.quantity,
            None => Decimal::ZERO,
        })
        .sum()
}

/// Selling-price total of an order
pub fn order_total(order: &Order, products: &ProductIndex<'_>) -> Decimal {
    line_items_total(&order.items, products)
}

/// Re-derive payment state after the order total changed
///
/// `paid_amount` is clamped to zero or above; `remaining_amount` is always
/// `new_total - paid_amount`.
pub fn recompute_payment(payment: &PaymentInfo, new_total: Decimal) -> PaymentInfo {
    let paid_amount = payment.paid_amount.max(Decimal::ZERO);
    PaymentInfo {
        method: payment.method,
        total_amount: new_total,
        paid_amount,
        remaining_amount: new_total - paid_amount,
    }
}

/// Filter orders by status, preserving insertion order
pub fn filter_by_status<'a>(orders: &'a [Order], filter: StatusFilter) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => o.status == status,
        })
        .collect()
}

/// Inclusive lower bound for a date-range filter, `None` for All
///
/// `now` is passed in rather than read from the system so reports are
/// reproducible in tests.
pub fn range_cutoff(range: DateRangeFilter, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match range {
        DateRangeFilter::All => None,
        DateRangeFilter::Today => Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()),
        DateRangeFilter::Last7Days => Some(now - Duration::days(7)),
        DateRangeFilter::Last30Days => Some(now - Duration::days(30)),
    }
}

/// Filter orders by creation time against an injected clock
pub fn filter_by_date_range<'a>(
    orders: &'a [Order],
    range: DateRangeFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Order> {
    let cutoff = range_cutoff(range, now);

    orders
        .iter()
        .filter(|o| cutoff.map_or(true, |c| o.created_at >= c))
        .collect()
}
