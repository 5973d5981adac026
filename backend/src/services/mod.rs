//! Business logic services for the bakery management core

pub mod catalog;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod purchases;
pub mod reporting;

pub use catalog::CatalogService;
pub use customers::CustomerService;
pub use inventory::InventoryService;
pub use orders::OrderService;
pub use purchases::PurchaseService;
pub use reporting::ReportingService;
