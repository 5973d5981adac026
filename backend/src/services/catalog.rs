//! Product catalog service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use shared::costing::{margin, product_cost, product_profit};
use shared::validation::validate_recipe;
use shared::{IngredientIndex, Product, ProductInput};

use crate::debounce::{DebouncedWriter, SavePayload};
use crate::error::{AppError, AppResult};
use crate::state::SessionState;

/// Cost breakdown of one product at current ingredient prices
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCosting {
    pub product_id: Uuid,
    pub selling_price: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Profit as a fraction of the selling price; `None` when the selling
    /// price is zero
    pub margin: Option<Decimal>,
}

/// Service for the sellable product catalog
#[derive(Clone)]
pub struct CatalogService {
    state: Arc<SessionState>,
    writer: DebouncedWriter,
}

impl CatalogService {
    pub fn new(state: Arc<SessionState>, writer: DebouncedWriter) -> Self {
        Self { state, writer }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.state.products.read().await.clone())
    }

    pub async fn create_product(&self, input: ProductInput) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("name", "Product name cannot be empty"));
        }
        validate_recipe(&input.recipe).map_err(|e| AppError::validation("recipe", e))?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            selling_price: input.selling_price,
            category: input.category,
            recipe: input.recipe,
            created_at: now,
            updated_at: now,
        };

        let mut products = self.state.products.write().await;
        products.push(product.clone());
        self.writer.schedule(SavePayload::Products(products.clone()));

        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        validate_recipe(&input.recipe).map_err(|e| AppError::validation("recipe", e))?;

        let mut products = self.state.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

        product.name = input.name;
        product.description = input.description;
        product.selling_price = input.selling_price;
        product.category = input.category;
        product.recipe = input.recipe;
        product.updated_at = Utc::now();

        let updated = product.clone();
        self.writer.schedule(SavePayload::Products(products.clone()));
        Ok(updated)
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let mut products = self.state.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(AppError::NotFound(format!("Product {id}")));
        }

        self.writer.schedule(SavePayload::Products(products.clone()));
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Cost, profit, and margin of one product at current ingredient prices
    pub async fn product_costing(&self, id: Uuid) -> AppResult<ProductCosting> {
        let products = self.state.products.read().await;
        let product = products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

        let ingredients = self.state.ingredients.read().await;
        let index = IngredientIndex::new(&ingredients);

        Ok(ProductCosting {
            product_id: product.id,
            selling_price: product.selling_price,
            cost: product_cost(product, &index),
            profit: product_profit(product, &index),
            margin: margin(product, &index),
        })
    }
}
