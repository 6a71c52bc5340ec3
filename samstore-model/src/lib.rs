//! Core data model definitions shared across SamStore crates.
//!
//! Records mirror the relational layout of the catalog: a category tree,
//! products with their lines and images, and the attribute/value tables
//! that back product specifications. Read-side view types live in
//! [`views`] and are what the HTTP layer serializes.

pub mod attribute;
pub mod category;
pub mod error;
pub mod ids;
pub mod product;
pub mod product_line;
pub mod validation;
pub mod views;

pub use attribute::{
    AttributeValue, AttributeValueDetail, NewAttributeValue,
    NewProductAttribute, NewProductType, ProductAttribute,
    ProductAttributeValue, ProductLineAttributeValue, ProductType,
    ProductTypeAttribute,
};
pub use category::{Category, CategoryUpdate, NewCategory};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{
    AttributeValueId, BindingId, CategoryId, ProductAttributeId, ProductId,
    ProductImageId, ProductLineId, ProductTypeId,
};
pub use product::{NewProduct, Product, ProductUpdate};
pub use product_line::{
    NewProductImage, NewProductLine, ProductImage, ProductLine,
    ProductLineUpdate,
};
pub use views::{
    CategoryView, ProductImageView, ProductLineView, ProductSummary,
    ProductView,
};
