//! Order lifecycle service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use shared::orders::{filter_by_status, line_items_total, recompute_payment};
use shared::{
    ledger, CreateOrderInput, Order, OrderLineItem, OrderStatus, PaymentInfo, ProductIndex,
    StatusFilter,
};

use crate::debounce::{DebouncedWriter, SavePayload};
use crate::error::{AppError, AppResult};
use crate::state::SessionState;

/// Service for creating orders and walking them through their lifecycle
#[derive(Clone)]
pub struct OrderService {
    state: Arc<SessionState>,
    writer: DebouncedWriter,
}

impl OrderService {
    pub fn new(state: Arc<SessionState>, writer: DebouncedWriter) -> Self {
        Self { state, writer }
    }

    /// List orders, optionally restricted to one status
    pub async fn list(&self, filter: StatusFilter) -> AppResult<Vec<Order>> {
        let orders = self.state.orders.read().await;
        Ok(filter_by_status(&orders, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Order> {
        let orders = self.state.orders.read().await;
        orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))
    }

    /// Create an order in Pending state
    ///
    /// The payment total is derived from the line items at creation time;
    /// lines referencing a missing product price at zero.
    pub async fn create(&self, input: CreateOrderInput) -> AppResult<Order> {
        if input.customer_name.trim().is_empty() {
            return Err(AppError::validation(
                "customer_name",
                "Customer name cannot be empty",
            ));
        }
        if input.items.is_empty() {
            return Err(AppError::validation(
                "items",
                "An order needs at least one line item",
            ));
        }
        shared::validation::validate_phone(&input.customer_phone)
            .map_err(|e| AppError::validation("customer_phone", e))?;
        for item in &input.items {
            shared::validation::validate_positive_quantity(item.quantity)
                .map_err(|e| AppError::validation("items", e))?;
        }

        let total = {
            let products = self.state.products.read().await;
            line_items_total(&input.items, &ProductIndex::new(&products))
        };
        let payment = recompute_payment(
            &PaymentInfo {
                method: input.payment_method,
                total_amount: total,
                paid_amount: input.paid_amount,
                remaining_amount: Decimal::ZERO,
            },
            total,
        );

        let order = Order {
            id: Uuid::new_v4(),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            deadline: input.deadline,
            items: input.items,
            status: OrderStatus::Pending,
            payment: Some(payment),
            notes: input.notes,
            created_at: Utc::now(),
        };

        let mut orders = self.state.orders.write().await;
        orders.push(order.clone());
        self.writer.schedule(SavePayload::Orders(orders.clone()));

        info!(order_id = %order.id, customer = %order.customer_name, "order created");
        Ok(order)
    }

    /// Move an order to the next lifecycle status
    ///
    /// The transition into Completed deducts recipe ingredients from stock.
    /// The previous-status check makes the deduction fire exactly once even
    /// if a Completed order is submitted again.
    pub async fn set_status(&self, id: Uuid, next: OrderStatus) -> AppResult<Order> {
        let mut orders = self.state.orders.write().await;
        let position = orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;

        let previous = orders[position].status;
        if !previous.can_transition_to(next) {
            return Err(AppError::InvalidStateTransition(format!(
                "order cannot move from {previous} to {next}"
            )));
        }

        if next == OrderStatus::Completed && previous != OrderStatus::Completed {
            let products = self.state.products.read().await;
            let mut ingredients = self.state.ingredients.write().await;
            ledger::deduct_for_order(
                &mut ingredients,
                &orders[position],
                &ProductIndex::new(&products),
            );
            self.writer
                .schedule(SavePayload::Ingredients(ingredients.clone()));
        }

        orders[position].status = next;
        let updated = orders[position].clone();
        self.writer.schedule(SavePayload::Orders(orders.clone()));

        info!(order_id = %id, from = %previous, to = %next, "order status changed");
        Ok(updated)
    }

    /// Replace an order's line items and re-derive its payment state
    pub async fn update_items(&self, id: Uuid, items: Vec<OrderLineItem>) -> AppResult<Order> {
        if items.is_empty() {
            return Err(AppError::validation(
                "items",
                "An order needs at least one line item",
            ));
        }
        for item in &items {
            shared::validation::validate_positive_quantity(item.quantity)
                .map_err(|e| AppError::validation("items", e))?;
        }

        let total = {
            let products = self.state.products.read().await;
            line_items_total(&items, &ProductIndex::new(&products))
        };

        let mut orders = self.state.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;

        order.items = items;
        order.payment = Some(match &order.payment {
            Some(payment) => recompute_payment(payment, total),
            None => PaymentInfo::unpaid(Default::default(), total),
        });

        let updated = order.clone();
        self.writer.schedule(SavePayload::Orders(orders.clone()));
        Ok(updated)
    }

    /// Record a payment amount against an order
    pub async fn set_paid_amount(&self, id: Uuid, paid_amount: Decimal) -> AppResult<Order> {
        let total_from_items = {
            let orders = self.state.orders.read().await;
            let order = orders
                .iter()
                .find(|o| o.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
            match &order.payment {
                Some(payment) => payment.total_amount,
                None => {
                    let products = self.state.products.read().await;
                    line_items_total(&order.items, &ProductIndex::new(&products))
                }
            }
        };

        let mut orders = self.state.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;

        let base = order
            .payment
            .clone()
            .unwrap_or_else(|| PaymentInfo::unpaid(Default::default(), total_from_items));
        order.payment = Some(recompute_payment(
            &PaymentInfo {
                paid_amount,
                ..base
            },
            total_from_items,
        ));

        let updated = order.clone();
        self.writer.schedule(SavePayload::Orders(orders.clone()));
        Ok(updated)
    }

    /// Delete an order
    ///
    /// Stock deducted when the order completed is NOT returned; correcting
    /// stock after deleting a completed order takes a manual IN transaction.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut orders = self.state.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        if orders.len() == before {
            return Err(AppError::NotFound(format!("Order {id}")));
        }

        self.writer.schedule(SavePayload::Orders(orders.clone()));
        info!(order_id = %id, "order deleted");
        Ok(())
    }
}
