pub mod attributes;
pub mod catalog;
pub mod categories;
pub mod product_lines;
pub mod product_types;
pub mod products;
pub(crate) mod rows;
