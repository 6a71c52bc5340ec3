//! Validation and orchestration over the repository ports.
//!
//! Services check input fields, existence of the rows they operate on and
//! then delegate to a port; catalog-wide rules (ordering, bindings, trees)
//! are enforced by the adapters inside their write transactions.

pub mod attributes;
pub mod catalog;
pub mod categories;
pub mod products;

pub use attributes::AttributeService;
pub use catalog::CatalogService;
pub use categories::CategoryService;
pub use products::ProductService;
