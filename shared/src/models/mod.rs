//! Domain models for the bakery management core

mod customer;
mod expense;
mod ingredient;
mod order;
mod product;
mod purchase;
mod stock;

pub use customer::*;
pub use expense::*;
pub use ingredient::*;
pub use order::*;
pub use product::*;
pub use purchase::*;
pub use stock::*;
