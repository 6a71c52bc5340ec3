use async_trait::async_trait;
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, NewAttributeValue,
    NewProductAttribute, ProductAttribute, ProductAttributeId,
};
use sqlx::PgPool;
use tracing::info;

use super::rows::{
    ATTRIBUTE_COLUMNS, ATTRIBUTE_VALUE_COLUMNS, AttributeValueDetailRow, AttributeValueRow,
    ProductAttributeRow,
};
use crate::database::infrastructure::postgres::errors::{storage_error, write_error};
use crate::database::ports::attributes::AttributesRepository;
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone)]
pub struct PostgresAttributesRepository {
    pool: PgPool,
}

impl PostgresAttributesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AttributesRepository for PostgresAttributesRepository {
    async fn create_attribute(&self, attribute: NewProductAttribute) -> Result<ProductAttribute> {
        let row: ProductAttributeRow = sqlx::query_as(&format!(
            "INSERT INTO product_attributes (name, description) \
             VALUES ($1, $2) RETURNING {ATTRIBUTE_COLUMNS}"
        ))
        .bind(&attribute.name)
        .bind(&attribute.description)
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error(e, "insert product attribute"))?;

        let created = ProductAttribute::from(row);
        info!(attribute = %created.id, name = %created.name, "created product attribute");
        Ok(created)
    }

    async fn get_attribute(&self, id: ProductAttributeId) -> Result<Option<ProductAttribute>> {
        let row: Option<ProductAttributeRow> = sqlx::query_as(&format!(
            "SELECT {ATTRIBUTE_COLUMNS} FROM product_attributes WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product attribute"))?;

        Ok(row.map(ProductAttribute::from))
    }

    async fn list_attributes(&self) -> Result<Vec<ProductAttribute>> {
        let rows: Vec<ProductAttributeRow> = sqlx::query_as(&format!(
            "SELECT {ATTRIBUTE_COLUMNS} FROM product_attributes ORDER BY name, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list product attributes"))?;

        Ok(rows.into_iter().map(ProductAttribute::from).collect())
    }

    async fn delete_attribute(&self, id: ProductAttributeId) -> Result<()> {
        let result = sqlx::query("DELETE FROM product_attributes WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "delete product attribute"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("attribute", id));
        }
        info!(attribute = %id, "deleted product attribute");
        Ok(())
    }

    async fn create_value(
        &self,
        attribute: ProductAttributeId,
        value: NewAttributeValue,
    ) -> Result<AttributeValue> {
        let row: AttributeValueRow = sqlx::query_as(&format!(
            "INSERT INTO attribute_values (value, attribute_id) \
             VALUES ($1, $2) RETURNING {ATTRIBUTE_VALUE_COLUMNS}"
        ))
        .bind(&value.value)
        .bind(attribute.get())
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error(e, "insert attribute value"))?;

        let created = AttributeValue::from(row);
        info!(%attribute, value = %created.id, "created attribute value");
        Ok(created)
    }

    async fn get_value(&self, id: AttributeValueId) -> Result<Option<AttributeValueDetail>> {
        let row: Option<AttributeValueDetailRow> = sqlx::query_as(
            r#"
            SELECT av.id, av.value, av.attribute_id, pa.name AS attribute_name
            FROM attribute_values av
            JOIN product_attributes pa ON pa.id = av.attribute_id
            WHERE av.id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load attribute value"))?;

        Ok(row.map(AttributeValueDetail::from))
    }

    async fn values_for_attribute(
        &self,
        attribute: ProductAttributeId,
    ) -> Result<Vec<AttributeValue>> {
        let rows: Vec<AttributeValueRow> = sqlx::query_as(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values \
             WHERE attribute_id = $1 ORDER BY value, id"
        ))
        .bind(attribute.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list attribute values"))?;

        Ok(rows.into_iter().map(AttributeValue::from).collect())
    }
}
