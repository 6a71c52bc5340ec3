//! Response shapes produced by the catalog aggregate.
//!
//! These never expose join rows: attribute bindings surface as plain maps
//! keyed by attribute-kind id.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::ids::{CategoryId, ProductAttributeId};
use crate::product_line::ProductImage;

/// Flat projection of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub name: String,
    pub slug: String,
    pub parent: Option<CategoryId>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            parent: category.parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImageView {
    pub image_url: String,
    pub alt_text: String,
    pub order: i32,
}

impl From<&ProductImage> for ProductImageView {
    fn from(image: &ProductImage) -> Self {
        Self {
            image_url: image.image_url.clone(),
            alt_text: image.alt_text.clone(),
            order: image.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLineView {
    pub price: Decimal,
    pub sku: String,
    pub stock_qty: i32,
    pub order: i32,
    pub images: Vec<ProductImageView>,
    /// Attribute-kind id to the value bound on this line.
    pub specification: BTreeMap<ProductAttributeId, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_name: Option<String>,
    pub product_line: Vec<ProductLineView>,
    /// Attribute-kind id to attribute name, as declared by the product's
    /// type. Carries no values.
    #[serde(rename = "type specification")]
    pub type_specification: BTreeMap<ProductAttributeId, String>,
}

/// Category listing card: the product plus price and lead image of its
/// first line. Products without lines omit both keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub slug: String,
    pub uuid: Uuid,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<ProductImageView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_specification_uses_spaced_key() {
        let mut type_specification = BTreeMap::new();
        type_specification.insert(ProductAttributeId(1), "color".to_string());
        let view = ProductView {
            name: "Boot".into(),
            slug: "boot".into(),
            description: String::new(),
            category_name: Some("Shoes".into()),
            product_line: vec![],
            type_specification,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type specification"]["1"], "color");
        assert!(json.get("type_specification").is_none());
    }

    #[test]
    fn summary_without_line_omits_price_and_image() {
        let summary = ProductSummary {
            name: "Boot".into(),
            slug: "boot".into(),
            uuid: Uuid::new_v4(),
            created: Utc::now(),
            price: None,
            image: None,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("price").is_none());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn price_serializes_as_decimal_string() {
        let summary = ProductSummary {
            name: "Boot".into(),
            slug: "boot".into(),
            uuid: Uuid::new_v4(),
            created: Utc::now(),
            price: Some(Decimal::new(1050, 2)),
            image: Some(vec![]),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["price"], "10.50");
        assert_eq!(json["image"], serde_json::json!([]));
    }
}
