//! PostgreSQL-backed `SnapshotStore`
//!
//! Snapshot saves run in a transaction: upsert every row in the snapshot,
//! then delete the rows whose ids are absent from it. Recipe lines and
//! order items are child tables rewritten alongside their parents, the same
//! shape the hosted-database schema used.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use uuid::Uuid;

use shared::{
    Customer, Ingredient, Order, OrderLineItem, OtherExpense, PaymentInfo, Product,
    PurchaseRecord, RecipeLine, StockTransaction,
};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

use super::SnapshotStore;

/// A `SnapshotStore` backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect a pool using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;
        Ok(Self::new(db))
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

fn parse_field<T: std::str::FromStr<Err = &'static str>>(
    field: &'static str,
    value: &str,
) -> AppResult<T> {
    value
        .parse()
        .map_err(|e: &'static str| AppError::validation(field, e))
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    purchase_unit: String,
    usage_unit: String,
    purchase_price: Decimal,
    purchase_quantity: Decimal,
    current_stock: Decimal,
    min_threshold: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IngredientRow {
    fn into_model(self) -> AppResult<Ingredient> {
        Ok(Ingredient {
            id: self.id,
            name: self.name,
            purchase_unit: parse_field("purchase_unit", &self.purchase_unit)?,
            usage_unit: parse_field("usage_unit", &self.usage_unit)?,
            purchase_price: self.purchase_price,
            purchase_quantity: self.purchase_quantity,
            current_stock: self.current_stock,
            min_threshold: self.min_threshold,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    selling_price: Decimal,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RecipeLineRow {
    product_id: Uuid,
    ingredient_id: Uuid,
    quantity: Decimal,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    customer_name: String,
    customer_phone: String,
    deadline: DateTime<Utc>,
    status: String,
    payment_method: Option<String>,
    total_amount: Option<Decimal>,
    paid_amount: Option<Decimal>,
    remaining_amount: Option<Decimal>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_model(self, items: Vec<OrderLineItem>) -> AppResult<Order> {
        let payment = match (
            self.payment_method,
            self.total_amount,
            self.paid_amount,
            self.remaining_amount,
        ) {
            (Some(method), Some(total_amount), Some(paid_amount), Some(remaining_amount)) => {
                Some(PaymentInfo {
                    method: parse_field("payment_method", &method)?,
                    total_amount,
                    paid_amount,
                    remaining_amount,
                })
            }
            _ => None,
        };

        Ok(Order {
            id: self.id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            deadline: self.deadline,
            items,
            status: parse_field("status", &self.status)?,
            payment,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: String,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PurchaseRecordRow {
    id: Uuid,
    ingredient_id: Uuid,
    quantity: Decimal,
    price: Decimal,
    purchase_date: DateTime<Utc>,
    supplier: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PurchaseRecordRow> for PurchaseRecord {
    fn from(row: PurchaseRecordRow) -> Self {
        PurchaseRecord {
            id: row.id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
            price: row.price,
            purchase_date: row.purchase_date,
            supplier: row.supplier,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OtherExpenseRow {
    id: Uuid,
    category: String,
    amount: Decimal,
    description: String,
    expense_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<OtherExpenseRow> for OtherExpense {
    fn from(row: OtherExpenseRow) -> Self {
        OtherExpense {
            id: row.id,
            category: row.category,
            amount: row.amount,
            description: row.description,
            expense_date: row.expense_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct StockTransactionRow {
    id: Uuid,
    ingredient_id: Uuid,
    kind: String,
    quantity: Decimal,
    reason: String,
    notes: Option<String>,
    transaction_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl StockTransactionRow {
    fn into_model(self) -> AppResult<StockTransaction> {
        Ok(StockTransaction {
            id: self.id,
            ingredient_id: self.ingredient_id,
            kind: parse_field("kind", &self.kind)?,
            quantity: self.quantity,
            reason: self.reason,
            notes: self.notes,
            transaction_date: self.transaction_date,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl SnapshotStore for PgStore {
    async fn load_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, purchase_unit, usage_unit, purchase_price, purchase_quantity,
                    current_stock, min_threshold, created_at, updated_at
             FROM ingredients
             ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(IngredientRow::into_model).collect()
    }

    async fn save_ingredients(&self, ingredients: &[Ingredient]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        for ing in ingredients {
            sqlx::query(
                "INSERT INTO ingredients (id, name, purchase_unit, usage_unit, purchase_price,
                                          purchase_quantity, current_stock, min_threshold,
                                          created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 ON CONFLICT (id) DO UPDATE SET
                     name = EXCLUDED.name,
                     purchase_unit = EXCLUDED.purchase_unit,
                     usage_unit = EXCLUDED.usage_unit,
                     purchase_price = EXCLUDED.purchase_price,
                     purchase_quantity = EXCLUDED.purchase_quantity,
                     current_stock = EXCLUDED.current_stock,
                     min_threshold = EXCLUDED.min_threshold,
                     updated_at = EXCLUDED.updated_at",
            )
            .bind(ing.id)
            .bind(&ing.name)
            .bind(ing.purchase_unit.code())
            .bind(ing.usage_unit.code())
            .bind(ing.purchase_price)
            .bind(ing.purchase_quantity)
            .bind(ing.current_stock)
            .bind(ing.min_threshold)
            .bind(ing.created_at)
            .bind(ing.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        // Full-snapshot semantics: rows not in the snapshot are gone
        let ids: Vec<Uuid> = ingredients.iter().map(|i| i.id).collect();
        sqlx::query("DELETE FROM ingredients WHERE id <> ALL($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, selling_price, category, created_at, updated_at
             FROM products
             ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        let lines = sqlx::query_as::<_, RecipeLineRow>(
            "SELECT product_id, ingredient_id, quantity FROM recipe_lines",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products
            .into_iter()
            .map(|p| {
                let recipe = lines
                    .iter()
                    .filter(|l| l.product_id == p.id)
                    .map(|l| RecipeLine {
                        ingredient_id: l.ingredient_id,
                        quantity: l.quantity,
                    })
                    .collect();
                Product {
                    id: p.id,
                    name: p.name,
                    description: p.description,
                    selling_price: p.selling_price,
                    category: p.category,
                    recipe,
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                }
            })
            .collect())
    }

    async fn save_products(&self, products: &[Product]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

        for product in products {
            sqlx::query(
                "INSERT INTO products (id, name, description, selling_price, category,
                                       created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (id) DO UPDATE SET
                     name = EXCLUDED.name,
                     description = EXCLUDED.description,
                     selling_price = EXCLUDED.selling_price,
                     category = EXCLUDED.category,
                     updated_at = EXCLUDED.updated_at",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.selling_price)
            .bind(&product.category)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        // Rewrite all recipe lines: clear for kept and removed products alike
        sqlx::query("DELETE FROM recipe_lines")
            .execute(&mut *tx)
            .await?;
        for product in products {
            for line in &product.recipe {
                sqlx::query(
                    "INSERT INTO recipe_lines (product_id, ingredient_id, quantity)
                     VALUES ($1, $2, $3)",
                )
                .bind(product.id)
                .bind(line.ingredient_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query("DELETE FROM products WHERE id <> ALL($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_orders(&self) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_name, customer_phone, deadline, status, payment_method,
                    total_amount, paid_amount, remaining_amount, notes, created_at
             FROM orders
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, quantity FROM order_items",
        )
        .fetch_all(&self.db)
        .await?;

        orders
            .into_iter()
            .map(|o| {
                let order_items = items
                    .iter()
                    .filter(|i| i.order_id == o.id)
                    .map(|i| OrderLineItem {
                        product_id: i.product_id,
                        quantity: i.quantity,
                    })
                    .collect();
                o.into_model(order_items)
            })
            .collect()
    }

    async fn save_orders(&self, orders: &[Order]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        for order in orders {
            let (method, total, paid, remaining) = match &order.payment {
                Some(p) => (
                    Some(p.method.as_str()),
                    Some(p.total_amount),
                    Some(p.paid_amount),
                    Some(p.remaining_amount),
                ),
                None => (None, None, None, None),
            };

            sqlx::query(
                "INSERT INTO orders (id, customer_name, customer_phone, deadline, status,
                                     payment_method, total_amount, paid_amount,
                                     remaining_amount, notes, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                 ON CONFLICT (id) DO UPDATE SET
                     customer_name = EXCLUDED.customer_name,
                     customer_phone = EXCLUDED.customer_phone,
                     deadline = EXCLUDED.deadline,
                     status = EXCLUDED.status,
                     payment_method = EXCLUDED.payment_method,
                     total_amount = EXCLUDED.total_amount,
                     paid_amount = EXCLUDED.paid_amount,
                     remaining_amount = EXCLUDED.remaining_amount,
                     notes = EXCLUDED.notes",
            )
            .bind(order.id)
            .bind(&order.customer_name)
            .bind(&order.customer_phone)
            .bind(order.deadline)
            .bind(order.status.as_str())
            .bind(method)
            .bind(total)
            .bind(paid)
            .bind(remaining)
            .bind(&order.notes)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM order_items")
            .execute(&mut *tx)
            .await?;
        for order in orders {
            for item in &order.items {
                sqlx::query(
                    "INSERT INTO order_items (order_id, product_id, quantity)
                     VALUES ($1, $2, $3)",
                )
                .bind(order.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query("DELETE FROM orders WHERE id <> ALL($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, address, notes, created_at FROM customers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn save_customers(&self, customers: &[Customer]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        for customer in customers {
            sqlx::query(
                "INSERT INTO customers (id, name, phone, address, notes, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (id) DO UPDATE SET
                     name = EXCLUDED.name,
                     phone = EXCLUDED.phone,
                     address = EXCLUDED.address,
                     notes = EXCLUDED.notes",
            )
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.address)
            .bind(&customer.notes)
            .bind(customer.created_at)
            .execute(&mut *tx)
            .await?;
        }

        let ids: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
        sqlx::query("DELETE FROM customers WHERE id <> ALL($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load_purchase_records(&self) -> AppResult<Vec<PurchaseRecord>> {
        let rows = sqlx::query_as::<_, PurchaseRecordRow>(
            "SELECT id, ingredient_id, quantity, price, purchase_date, supplier, notes,
                    created_at
             FROM purchase_records
             ORDER BY purchase_date DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(PurchaseRecord::from).collect())
    }

    async fn upsert_purchase_record(&self, record: &PurchaseRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO purchase_records (id, ingredient_id, quantity, price, purchase_date,
                                           supplier, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                 ingredient_id = EXCLUDED.ingredient_id,
                 quantity = EXCLUDED.quantity,
                 price = EXCLUDED.price,
                 purchase_date = EXCLUDED.purchase_date,
                 supplier = EXCLUDED.supplier,
                 notes = EXCLUDED.notes",
        )
        .bind(record.id)
        .bind(record.ingredient_id)
        .bind(record.quantity)
        .bind(record.price)
        .bind(record.purchase_date)
        .bind(&record.supplier)
        .bind(&record.notes)
        .bind(record.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_purchase_record(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM purchase_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn load_stock_transactions(&self) -> AppResult<Vec<StockTransaction>> {
        let rows = sqlx::query_as::<_, StockTransactionRow>(
            "SELECT id, ingredient_id, kind, quantity, reason, notes, transaction_date,
                    created_at
             FROM stock_transactions
             ORDER BY transaction_date DESC",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockTransactionRow::into_model).collect()
    }

    async fn append_stock_transaction(&self, tx: &StockTransaction) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO stock_transactions (id, ingredient_id, kind, quantity, reason, notes,
                                             transaction_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(tx.id)
        .bind(tx.ingredient_id)
        .bind(tx.kind.as_str())
        .bind(tx.quantity)
        .bind(&tx.reason)
        .bind(&tx.notes)
        .bind(tx.transaction_date)
        .bind(tx.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_stock_transaction(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM stock_transactions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn load_other_expenses(&self) -> AppResult<Vec<OtherExpense>> {
        let rows = sqlx::query_as::<_, OtherExpenseRow>(
            "SELECT id, category, amount, description, expense_date, created_at
             FROM other_expenses
             ORDER BY expense_date DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(OtherExpense::from).collect())
    }

    async fn upsert_other_expense(&self, expense: &OtherExpense) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO other_expenses (id, category, amount, description, expense_date,
                                         created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                 category = EXCLUDED.category,
                 amount = EXCLUDED.amount,
                 description = EXCLUDED.description,
                 expense_date = EXCLUDED.expense_date",
        )
        .bind(expense.id)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.expense_date)
        .bind(expense.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_other_expense(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM other_expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
