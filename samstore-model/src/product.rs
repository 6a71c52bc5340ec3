use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::ids::{CategoryId, ProductId, ProductTypeId};
use crate::validation;

pub const PRODUCT_NAME_MAX: usize = 200;
pub const PRODUCT_SLUG_MAX: usize = 200;

/// A catalog product. The `uuid` is assigned once at creation and never
/// changes; slugs are not unique across products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub uuid: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub active: bool,
    pub category_id: Option<CategoryId>,
    pub product_type_id: Option<ProductTypeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub product_type: Option<ProductTypeId>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            active: true,
            category: None,
            product_type: None,
        }
    }

    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn of_type(mut self, product_type: ProductTypeId) -> Self {
        self.product_type = Some(product_type);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, PRODUCT_NAME_MAX)?;
        validation::slug("slug", &self.slug, PRODUCT_SLUG_MAX)
    }
}

/// Full replacement of a product's editable fields. The uuid is not
/// editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub product_type: Option<ProductTypeId>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, PRODUCT_NAME_MAX)?;
        validation::slug("slug", &self.slug, PRODUCT_SLUG_MAX)
    }
}
