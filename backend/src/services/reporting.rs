//! Revenue and cash-flow reporting

use std::sync::Arc;

use chrono::{DateTime, Utc};

use shared::orders::{filter_by_date_range, range_cutoff};
use shared::reporting::{
    cash_flow_summary, daily_series, revenue_stats, top_products, CashFlowSummary, DailyPoint,
    ProductRevenue, RevenueStats, CASH_FLOW_STATUSES, REVENUE_STATUSES,
};
use shared::{DateRangeFilter, IngredientIndex, Order, OrderStatus, ProductIndex};

use crate::error::AppResult;
use crate::state::SessionState;
use crate::store::SnapshotStore;

/// Read-only reporting over the session state
///
/// Every query takes `now` from the caller so results are reproducible;
/// which statuses count as revenue is an explicit parameter with the
/// historical dashboard's defaults.
#[derive(Clone)]
pub struct ReportingService {
    state: Arc<SessionState>,
    store: Arc<dyn SnapshotStore>,
}

impl ReportingService {
    pub fn new(state: Arc<SessionState>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { state, store }
    }

    async fn orders_in_range(
        &self,
        range: DateRangeFilter,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        let orders = self.state.orders.read().await;
        filter_by_date_range(&orders, range, now)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Revenue, cost, and profit totals for the window
    pub async fn revenue_report(
        &self,
        range: DateRangeFilter,
        now: DateTime<Utc>,
        included: Option<&[OrderStatus]>,
    ) -> AppResult<RevenueStats> {
        let orders = self.orders_in_range(range, now).await;
        let products = self.state.products.read().await;
        let ingredients = self.state.ingredients.read().await;

        Ok(revenue_stats(
            &orders,
            &ProductIndex::new(&products),
            &IngredientIndex::new(&ingredients),
            included.unwrap_or(REVENUE_STATUSES),
        ))
    }

    /// Per-day revenue series for the window
    pub async fn daily_revenue(
        &self,
        range: DateRangeFilter,
        now: DateTime<Utc>,
        included: Option<&[OrderStatus]>,
    ) -> AppResult<Vec<DailyPoint>> {
        let orders = self.orders_in_range(range, now).await;
        let products = self.state.products.read().await;
        let ingredients = self.state.ingredients.read().await;

        Ok(daily_series(
            &orders,
            &ProductIndex::new(&products),
            &IngredientIndex::new(&ingredients),
            included.unwrap_or(REVENUE_STATUSES),
        ))
    }

    /// Best-selling products by revenue for the window
    pub async fn top_products(
        &self,
        range: DateRangeFilter,
        now: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<ProductRevenue>> {
        let orders = self.orders_in_range(range, now).await;
        let products = self.state.products.read().await;

        Ok(top_products(
            &orders,
            &ProductIndex::new(&products),
            REVENUE_STATUSES,
            limit,
        ))
    }

    /// Cash position for the window: completed and delivered order revenue
    /// minus purchase spend and other expenses
    pub async fn cash_flow(
        &self,
        range: DateRangeFilter,
        now: DateTime<Utc>,
    ) -> AppResult<CashFlowSummary> {
        let orders = self.orders_in_range(range, now).await;
        let products = self.state.products.read().await;

        let cutoff = range_cutoff(range, now);
        let purchases: Vec<_> = self
            .store
            .load_purchase_records()
            .await?
            .into_iter()
            .filter(|r| cutoff.map_or(true, |c| r.purchase_date >= c))
            .collect();
        let expenses: Vec<_> = self
            .store
            .load_other_expenses()
            .await?
            .into_iter()
            .filter(|e| cutoff.map_or(true, |c| e.expense_date >= c))
            .collect();

        Ok(cash_flow_summary(
            &orders,
            &ProductIndex::new(&products),
            &purchases,
            &expenses,
            CASH_FLOW_STATUSES,
        ))
    }
}
