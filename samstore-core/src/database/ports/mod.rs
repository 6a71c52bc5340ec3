//! Repository ports consumed by the services.
//!
//! Each port is a `Send + Sync` async trait so the unit of work can hold it
//! behind `Arc<dyn ...>`; adapters live under `database::infrastructure`.

pub mod attributes;
pub mod catalog;
pub mod categories;
pub mod product_lines;
pub mod product_types;
pub mod products;
