//! Axum handlers, one module per resource.

pub mod attributes;
pub mod categories;
pub mod health;
pub mod product_lines;
pub mod product_types;
pub mod products;

use samstore_model::AttributeValueId;
use serde::Deserialize;

/// Body of every `.../attribute-values/` POST.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BindValueRequest {
    pub attribute_value: AttributeValueId,
}
