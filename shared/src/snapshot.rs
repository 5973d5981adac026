//! Id-keyed views over in-memory entity snapshots
//!
//! Every computation in this crate works on value snapshots supplied by the
//! persistence collaborator. The indexes make the silent-degrade lookup
//! policy explicit: `get` returns `None` for a dangling reference and each
//! aggregation documents that a miss contributes zero.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Ingredient, Product};

/// Lookup view over an ingredient snapshot
pub struct IngredientIndex<'a> {
    by_id: HashMap<Uuid, &'a Ingredient>,
}

impl<'a> IngredientIndex<'a> {
    pub fn new(ingredients: &'a [Ingredient]) -> Self {
        Self {
            by_id: ingredients.iter().map(|i| (i.id, i)).collect(),
        }
    }

    /// `None` means the referencing record points at a deleted ingredient
    pub fn get(&self, id: Uuid) -> Option<&'a Ingredient> {
        self.by_id.get(&id).copied()
    }
}

/// Lookup view over a product snapshot
pub struct ProductIndex<'a> {
    by_id: HashMap<Uuid, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        Self {
            by_id: products.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&'a Product> {
        self.by_id.get(&id).copied()
    }
}
