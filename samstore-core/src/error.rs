use samstore_model::{ModelError, ProductAttributeId, ProductLineId};
use thiserror::Error;

use crate::catalog::ordering::OrderGroup;

/// Rejections raised at the write boundary before anything is committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate value: order {order} is already taken in {group}")]
    DuplicateOrder { group: OrderGroup, order: i32 },

    #[error("No order left after the last sibling in {group}; give an explicit order")]
    NoFreeOrder { group: OrderGroup },

    #[error(
        "Duplicate attribute exists: product line {product_line} already has a value for attribute {attribute}"
    )]
    DuplicateAttribute {
        product_line: ProductLineId,
        attribute: ProductAttributeId,
    },

    #[error("{entity} with this {field} already exists")]
    DuplicateValue {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{field}: referenced {entity} does not exist")]
    UnknownReference {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{0}")]
    Field(#[from] ModelError),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("cannot delete {entity} {key}: still referenced by {referenced_by}")]
    ReferentialIntegrity {
        entity: &'static str,
        key: String,
        referenced_by: &'static str,
    },

    #[error("{entity} {node} cannot be placed under {parent}: it would become its own ancestor")]
    Cycle {
        entity: &'static str,
        node: String,
        parent: String,
    },

    #[error("could not assign an order in {group} after {attempts} attempts")]
    OrderContention { group: OrderGroup, attempts: u32 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CatalogError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        CatalogError::Validation(ValidationError::Field(err))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
