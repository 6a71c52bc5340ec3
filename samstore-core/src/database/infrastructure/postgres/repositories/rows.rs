//! Row shapes returned by the catalog queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, BindingId, Category, CategoryId,
    Product, ProductAttribute, ProductAttributeId, ProductId, ProductImage, ProductImageId,
    ProductLine, ProductLineId, ProductType, ProductTypeId,
};
use uuid::Uuid;

use crate::catalog::aggregate::{LineAttributeValue, ProductWithCategory, TypeAttribute};

pub(crate) const CATEGORY_COLUMNS: &str =
    "id, name, slug, parent_id, active, created_at, updated_at";

pub(crate) const PRODUCT_COLUMNS: &str = "id, uuid, name, slug, description, active, \
     category_id, product_type_id, created_at, updated_at";

pub(crate) const PRODUCT_LINE_COLUMNS: &str = "id, product_id, price, sku, stock_qty, active, \
     \"order\", weight, product_type_id, created_at, updated_at";

pub(crate) const PRODUCT_IMAGE_COLUMNS: &str =
    "id, product_line_id, image_url, alt_text, \"order\", created_at, updated_at";

pub(crate) const ATTRIBUTE_COLUMNS: &str = "id, name, description, created_at, updated_at";

pub(crate) const ATTRIBUTE_VALUE_COLUMNS: &str =
    "id, value, attribute_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    parent_id: Option<i64>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId(row.id),
            name: row.name,
            slug: row.slug,
            parent_id: row.parent_id.map(CategoryId),
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    uuid: Uuid,
    name: String,
    slug: String,
    description: String,
    active: bool,
    category_id: Option<i64>,
    product_type_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            uuid: row.uuid,
            name: row.name,
            slug: row.slug,
            description: row.description,
            active: row.active,
            category_id: row.category_id.map(CategoryId),
            product_type_id: row.product_type_id.map(ProductTypeId),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductWithCategoryRow {
    #[sqlx(flatten)]
    product: ProductRow,
    category_name: Option<String>,
}

impl From<ProductWithCategoryRow> for ProductWithCategory {
    fn from(row: ProductWithCategoryRow) -> Self {
        ProductWithCategory {
            product: row.product.into(),
            category_name: row.category_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductLineRow {
    id: i64,
    product_id: i64,
    price: Decimal,
    sku: String,
    stock_qty: i32,
    active: bool,
    order: i32,
    weight: Option<f64>,
    product_type_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductLineRow> for ProductLine {
    fn from(row: ProductLineRow) -> Self {
        ProductLine {
            id: ProductLineId(row.id),
            product_id: ProductId(row.product_id),
            price: row.price,
            sku: row.sku,
            stock_qty: row.stock_qty,
            active: row.active,
            order: row.order,
            weight: row.weight,
            product_type_id: row.product_type_id.map(ProductTypeId),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductImageRow {
    id: i64,
    product_line_id: i64,
    image_url: String,
    alt_text: String,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        ProductImage {
            id: ProductImageId(row.id),
            product_line_id: ProductLineId(row.product_line_id),
            image_url: row.image_url,
            alt_text: row.alt_text,
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductAttributeRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductAttributeRow> for ProductAttribute {
    fn from(row: ProductAttributeRow) -> Self {
        ProductAttribute {
            id: ProductAttributeId(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AttributeValueRow {
    id: i64,
    value: String,
    attribute_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AttributeValueRow> for AttributeValue {
    fn from(row: AttributeValueRow) -> Self {
        AttributeValue {
            id: AttributeValueId(row.id),
            value: row.value,
            attribute_id: ProductAttributeId(row.attribute_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `attribute_values` joined with `product_attributes.name`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AttributeValueDetailRow {
    id: i64,
    value: String,
    attribute_id: i64,
    attribute_name: String,
}

impl From<AttributeValueDetailRow> for AttributeValueDetail {
    fn from(row: AttributeValueDetailRow) -> Self {
        AttributeValueDetail {
            id: AttributeValueId(row.id),
            value: row.value,
            attribute_id: ProductAttributeId(row.attribute_id),
            attribute_name: row.attribute_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LineAttributeValueRow {
    product_line_id: i64,
    #[sqlx(flatten)]
    value: AttributeValueDetailRow,
}

impl From<LineAttributeValueRow> for LineAttributeValue {
    fn from(row: LineAttributeValueRow) -> Self {
        LineAttributeValue {
            product_line_id: ProductLineId(row.product_line_id),
            value: row.value.into(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TypeAttributeRow {
    product_type_id: i64,
    #[sqlx(flatten)]
    attribute: ProductAttributeRow,
}

impl From<TypeAttributeRow> for TypeAttribute {
    fn from(row: TypeAttributeRow) -> Self {
        TypeAttribute {
            product_type_id: ProductTypeId(row.product_type_id),
            attribute: row.attribute.into(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductTypeRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
}

impl From<ProductTypeRow> for ProductType {
    fn from(row: ProductTypeRow) -> Self {
        ProductType {
            id: ProductTypeId(row.id),
            name: row.name,
            parent_id: row.parent_id.map(ProductTypeId),
        }
    }
}

/// Row of any of the two-column join tables.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BindingRow {
    pub(crate) id: i64,
    pub(crate) owner_id: i64,
    pub(crate) target_id: i64,
}

impl BindingRow {
    pub(crate) fn binding_id(&self) -> BindingId {
        BindingId(self.id)
    }
}
