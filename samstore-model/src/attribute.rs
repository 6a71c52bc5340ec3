//! Attribute kinds, their values, product types and the join rows that
//! tie them to products and lines.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{
    AttributeValueId, BindingId, ProductAttributeId, ProductId, ProductLineId,
    ProductTypeId,
};
use crate::validation;

pub const ATTRIBUTE_NAME_MAX: usize = 120;
pub const ATTRIBUTE_VALUE_MAX: usize = 100;
pub const PRODUCT_TYPE_NAME_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: ProductAttributeId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for ProductAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductAttribute {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewProductAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, ATTRIBUTE_NAME_MAX)
    }
}

/// A concrete value ("red") of an attribute kind ("color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: AttributeValueId,
    pub value: String,
    pub attribute_id: ProductAttributeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttributeValue {
    pub value: String,
}

impl NewAttributeValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::text("value", &self.value, ATTRIBUTE_VALUE_MAX)
    }
}

/// An attribute value joined with the name of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValueDetail {
    pub id: AttributeValueId,
    pub value: String,
    pub attribute_id: ProductAttributeId,
    pub attribute_name: String,
}

impl fmt::Display for AttributeValueDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.attribute_name, self.value)
    }
}

/// Classification that decides which attribute kinds apply to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
    pub parent_id: Option<ProductTypeId>,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductType {
    pub name: String,
    #[serde(default)]
    pub parent: Option<ProductTypeId>,
}

impl NewProductType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validation::text("name", &self.name, PRODUCT_TYPE_NAME_MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributeValue {
    pub id: BindingId,
    pub product_id: ProductId,
    pub attribute_value_id: AttributeValueId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineAttributeValue {
    pub id: BindingId,
    pub product_line_id: ProductLineId,
    pub attribute_value_id: AttributeValueId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTypeAttribute {
    pub id: BindingId,
    pub product_type_id: ProductTypeId,
    pub attribute_id: ProductAttributeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_value_displays_kind_and_value() {
        let detail = AttributeValueDetail {
            id: AttributeValueId(1),
            value: "red".into(),
            attribute_id: ProductAttributeId(2),
            attribute_name: "color".into(),
        };
        assert_eq!(detail.to_string(), "color-red");
    }

    #[test]
    fn blank_attribute_value_is_rejected() {
        assert!(NewAttributeValue::new("").validate().is_err());
        assert!(NewAttributeValue::new("red").validate().is_ok());
    }
}
