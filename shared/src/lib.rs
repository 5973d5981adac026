//! Shared domain models and computations for the bakery management system
//!
//! This crate holds everything that is pure: the entity models, unit
//! conversion, recipe costing, the inventory ledger, order aggregation,
//! purchase planning, and revenue reporting. All functions operate on
//! in-memory snapshots supplied by the persistence layer in the backend
//! crate and never perform I/O themselves.

pub mod costing;
pub mod ledger;
pub mod models;
pub mod orders;
pub mod planner;
pub mod reporting;
pub mod snapshot;
pub mod types;
pub mod units;
pub mod validation;

pub use models::*;
pub use snapshot::{IngredientIndex, ProductIndex};
pub use types::*;
