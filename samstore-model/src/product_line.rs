use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{ProductId, ProductImageId, ProductLineId, ProductTypeId};
use crate::validation;

pub const SKU_MAX: usize = 100;
pub const IMAGE_URL_MAX: usize = 100;
pub const ALT_TEXT_MAX: usize = 100;

/// A sellable variant of a product. `order` is unique among the lines of
/// the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub id: ProductLineId,
    pub product_id: ProductId,
    pub price: Decimal,
    pub sku: String,
    pub stock_qty: i32,
    pub active: bool,
    pub order: i32,
    pub weight: Option<f64>,
    pub product_type_id: Option<ProductTypeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sku)
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductLine {
    pub price: Decimal,
    pub sku: String,
    pub stock_qty: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Leave unset to append after the product's current last line.
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub product_type: Option<ProductTypeId>,
}

impl NewProductLine {
    pub fn new(price: Decimal, sku: impl Into<String>, stock_qty: i32) -> Self {
        Self {
            price,
            sku: sku.into(),
            stock_qty,
            active: true,
            order: None,
            weight: None,
            product_type: None,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::price("price", &self.price)?;
        validation::text("sku", &self.sku, SKU_MAX)?;
        validation::non_negative("stock_qty", self.stock_qty)?;
        if let Some(order) = self.order {
            validation::order("order", order)?;
        }
        Ok(())
    }
}

/// Full replacement of a line's editable fields. An absent `order` keeps
/// the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLineUpdate {
    pub price: Decimal,
    pub sku: String,
    pub stock_qty: i32,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub product_type: Option<ProductTypeId>,
}

impl ProductLineUpdate {
    pub fn validate(&self) -> Result<()> {
        validation::price("price", &self.price)?;
        validation::text("sku", &self.sku, SKU_MAX)?;
        validation::non_negative("stock_qty", self.stock_qty)?;
        if let Some(order) = self.order {
            validation::order("order", order)?;
        }
        Ok(())
    }
}

/// An image attached to a product line. `order` is unique among the
/// images of the same line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_line_id: ProductLineId,
    pub image_url: String,
    pub alt_text: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for ProductImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductImage {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub order: Option<i32>,
}

impl NewProductImage {
    pub fn new(image_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            alt_text: alt_text.into(),
            order: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::max_chars("image_url", &self.image_url, IMAGE_URL_MAX)?;
        validation::max_chars("alt_text", &self.alt_text, ALT_TEXT_MAX)?;
        if let Some(order) = self.order {
            validation::order("order", order)?;
        }
        Ok(())
    }
}
