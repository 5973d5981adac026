//! Inventory and purchase service tests over an in-memory session

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use bakery_management_backend::config::{Config, DatabaseConfig, PersistenceConfig};
use bakery_management_backend::store::{MemoryStore, SnapshotStore};
use bakery_management_backend::{AppError, Session};
use shared::{
    IngredientInput, OtherExpenseInput, ProductInput, PurchaseRecordInput, RecipeLine,
    StockTransactionInput, StockTransactionKind, Unit,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn test_config() -> Config {
    Config {
        environment: "test".into(),
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
        },
        persistence: PersistenceConfig { debounce_ms: 10 },
    }
}

async fn empty_session() -> (Arc<MemoryStore>, Session) {
    let store = Arc::new(MemoryStore::new());
    let session = Session::open(store.clone(), test_config()).await.unwrap();
    (store, session)
}

fn flour_input(stock: &str, threshold: &str) -> IngredientInput {
    IngredientInput {
        name: "Flour".into(),
        purchase_unit: Unit::Kilogram,
        usage_unit: Unit::Gram,
        purchase_price: dec("20000"),
        purchase_quantity: Decimal::ONE,
        current_stock: dec(stock),
        min_threshold: dec(threshold),
    }
}

#[tokio::test]
async fn ingredient_lifecycle_round_trips_through_store() {
    let (store, session) = empty_session().await;

    let flour = session
        .inventory
        .create_ingredient(flour_input("500", "100"))
        .await
        .unwrap();

    let mut update = flour_input("800", "100");
    update.name = "Bread flour".into();
    let updated = session
        .inventory
        .update_ingredient(flour.id, update)
        .await
        .unwrap();
    assert_eq!(updated.name, "Bread flour");
    assert_eq!(updated.current_stock, dec("800"));

    session.flush().await.unwrap();
    let persisted = store.load_ingredients().await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].name, "Bread flour");

    session.inventory.delete_ingredient(flour.id).await.unwrap();
    session.flush().await.unwrap();
    assert!(store.load_ingredients().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_ingredient_is_rejected() {
    let (_store, session) = empty_session().await;

    let mut nameless = flour_input("0", "0");
    nameless.name = "  ".into();
    assert!(matches!(
        session.inventory.create_ingredient(nameless).await,
        Err(AppError::Validation { .. })
    ));

    let mut negative = flour_input("0", "0");
    negative.purchase_price = dec("-1");
    assert!(matches!(
        session.inventory.create_ingredient(negative).await,
        Err(AppError::Validation { .. })
    ));
}

#[tokio::test]
async fn stock_transaction_applies_and_reverses() {
    let (store, session) = empty_session().await;
    let flour = session
        .inventory
        .create_ingredient(flour_input("200", "0"))
        .await
        .unwrap();

    let tx = session
        .inventory
        .record_stock_transaction(StockTransactionInput {
            ingredient_id: flour.id,
            kind: StockTransactionKind::In,
            quantity: dec("300"),
            reason: "restock".into(),
            notes: None,
        })
        .await
        .unwrap();

    let stock = session.inventory.list_ingredients().await.unwrap()[0].current_stock;
    assert_eq!(stock, dec("500"));
    // The log entry is written through immediately, no flush needed
    assert_eq!(store.load_stock_transactions().await.unwrap().len(), 1);

    session.inventory.delete_stock_transaction(tx.id).await.unwrap();
    let stock = session.inventory.list_ingredients().await.unwrap()[0].current_stock;
    assert_eq!(stock, dec("200"));
    assert!(store.load_stock_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_transaction_clamps_at_zero() {
    let (_store, session) = empty_session().await;
    let flour = session
        .inventory
        .create_ingredient(flour_input("100", "0"))
        .await
        .unwrap();

    session
        .inventory
        .record_stock_transaction(StockTransactionInput {
            ingredient_id: flour.id,
            kind: StockTransactionKind::Out,
            quantity: dec("250"),
            reason: "spoilage".into(),
            notes: None,
        })
        .await
        .unwrap();

    let stock = session.inventory.list_ingredients().await.unwrap()[0].current_stock;
    assert_eq!(stock, Decimal::ZERO);
}

#[tokio::test]
async fn stock_transaction_needs_existing_ingredient_and_positive_quantity() {
    let (_store, session) = empty_session().await;

    let missing = session
        .inventory
        .record_stock_transaction(StockTransactionInput {
            ingredient_id: Uuid::new_v4(),
            kind: StockTransactionKind::In,
            quantity: Decimal::ONE,
            reason: "restock".into(),
            notes: None,
        })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let flour = session
        .inventory
        .create_ingredient(flour_input("0", "0"))
        .await
        .unwrap();
    let zero = session
        .inventory
        .record_stock_transaction(StockTransactionInput {
            ingredient_id: flour.id,
            kind: StockTransactionKind::In,
            quantity: Decimal::ZERO,
            reason: "restock".into(),
            notes: None,
        })
        .await;
    assert!(matches!(zero, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn low_stock_lists_only_below_threshold() {
    let (_store, session) = empty_session().await;
    session
        .inventory
        .create_ingredient(flour_input("50", "100"))
        .await
        .unwrap();
    let mut sugar = flour_input("500", "100");
    sugar.name = "Sugar".into();
    session.inventory.create_ingredient(sugar).await.unwrap();

    let low = session.inventory.low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Flour");
}

#[tokio::test]
async fn product_costing_through_catalog() {
    let (_store, session) = empty_session().await;
    let flour = session
        .inventory
        .create_ingredient(flour_input("1000", "0"))
        .await
        .unwrap();

    let cake = session
        .catalog
        .create_product(ProductInput {
            name: "Cake".into(),
            description: String::new(),
            selling_price: dec("4000"),
            category: "cake".into(),
            recipe: vec![RecipeLine {
                ingredient_id: flour.id,
                quantity: dec("50"),
            }],
        })
        .await
        .unwrap();

    let costing = session.catalog.product_costing(cake.id).await.unwrap();
    assert_eq!(costing.cost, dec("1000"));
    assert_eq!(costing.profit, dec("3000"));
    assert_eq!(costing.margin, Some(dec("0.75")));
}

#[tokio::test]
async fn duplicate_recipe_lines_are_rejected() {
    let (_store, session) = empty_session().await;
    let id = Uuid::new_v4();

    let result = session
        .catalog
        .create_product(ProductInput {
            name: "Cake".into(),
            description: String::new(),
            selling_price: dec("4000"),
            category: "cake".into(),
            recipe: vec![
                RecipeLine {
                    ingredient_id: id,
                    quantity: dec("50"),
                },
                RecipeLine {
                    ingredient_id: id,
                    quantity: dec("30"),
                },
            ],
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn purchases_log_without_touching_stock() {
    let (store, session) = empty_session().await;
    let flour = session
        .inventory
        .create_ingredient(flour_input("500", "0"))
        .await
        .unwrap();

    let record = session
        .purchases
        .record_purchase(PurchaseRecordInput {
            ingredient_id: flour.id,
            quantity: dec("2"),
            price: dec("40000"),
            purchase_date: Utc::now(),
            supplier: Some("Market".into()),
            notes: None,
        })
        .await
        .unwrap();

    // Purchases are a cash log; stock is untouched
    let stock = session.inventory.list_ingredients().await.unwrap()[0].current_stock;
    assert_eq!(stock, dec("500"));
    assert_eq!(store.load_purchase_records().await.unwrap().len(), 1);

    session.purchases.delete_purchase_record(record.id).await.unwrap();
    assert!(store.load_purchase_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn expenses_log_round_trips() {
    let (store, session) = empty_session().await;

    let expense = session
        .purchases
        .record_expense(OtherExpenseInput {
            category: "utilities".into(),
            amount: dec("15000"),
            description: "electricity".into(),
            expense_date: Utc::now(),
        })
        .await
        .unwrap();
    assert_eq!(store.load_other_expenses().await.unwrap().len(), 1);

    session.purchases.delete_expense(expense.id).await.unwrap();
    assert!(store.load_other_expenses().await.unwrap().is_empty());
}
